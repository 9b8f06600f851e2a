//! Building blocks for create/edit forms on top of a [`ResourceStore`].
//!
//! A form is opened either in [`FormMode::New`] or [`FormMode::Edit`], checks
//! the submitted field bag, and writes through the store exactly once per
//! submission. [`SubmissionState`] guards against a second submission while
//! one is in flight.

use api_types::{Amount, Category, Entry, EntryKind, Resource, ResourceId, entry::DATE_FORMAT};
use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use crate::{error::ClientError, resource::ResourceStore};

const NAME_MIN_CHARS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    New,
    Edit(ResourceId),
}

impl FormMode {
    /// `"new"` opens a blank form, a numeric segment edits that record.
    pub fn from_route(segment: &str) -> Option<Self> {
        match segment.trim() {
            "new" => Some(Self::New),
            other => other.parse().ok().map(Self::Edit),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("a submission is already in flight")]
pub struct AlreadySubmitting;

impl SubmissionState {
    /// `Idle -> Submitting`.
    pub fn begin(&mut self) -> Result<(), AlreadySubmitting> {
        match self {
            Self::Idle => {
                *self = Self::Submitting;
                Ok(())
            }
            Self::Submitting => Err(AlreadySubmitting),
        }
    }

    /// `Submitting -> Idle`, after success and failure alike.
    pub fn settle(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_submitting(self) -> bool {
        self == Self::Submitting
    }
}

/// Holds a [`SubmissionState`] in `Submitting` and settles it when dropped,
/// including when the submitting future is abandoned mid-flight.
struct InFlight<'a>(&'a mut SubmissionState);

impl<'a> InFlight<'a> {
    fn begin(state: &'a mut SubmissionState) -> Result<Self, AlreadySubmitting> {
        state.begin()?;
        Ok(Self(state))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.settle();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Field-level checks run on a submitted field bag before anything is sent.
pub trait Validate {
    fn validate(fields: &Value) -> Vec<FieldError>;
}

fn filled<'a>(fields: &'a Value, key: &str) -> Option<&'a Value> {
    fields
        .get(key)
        .filter(|value| !value.is_null() && value.as_str().is_none_or(|s| !s.trim().is_empty()))
}

fn check_name(fields: &Value, errors: &mut Vec<FieldError>) {
    match filled(fields, "name") {
        None => errors.push(FieldError::new("name", "name is required")),
        Some(Value::String(name)) if name.trim().chars().count() < NAME_MIN_CHARS => {
            errors.push(FieldError::new(
                "name",
                format!("name must have at least {NAME_MIN_CHARS} characters"),
            ));
        }
        Some(Value::String(_)) => {}
        Some(_) => errors.push(FieldError::new("name", "name must be text")),
    }
}

impl Validate for Category {
    fn validate(fields: &Value) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name(fields, &mut errors);
        errors
    }
}

impl Validate for Entry {
    fn validate(fields: &Value) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name(fields, &mut errors);

        match filled(fields, "type").map(|kind| kind.as_str().map(str::parse::<EntryKind>)) {
            None => errors.push(FieldError::new("type", "type is required")),
            Some(Some(Ok(_))) => {}
            Some(_) => errors.push(FieldError::new("type", "type must be income or expense")),
        }

        match filled(fields, "amount").map(Amount::from_json) {
            None => errors.push(FieldError::new("amount", "amount is required")),
            Some(Some(_)) => {}
            Some(None) => errors.push(FieldError::new("amount", "amount is not a valid amount")),
        }

        match filled(fields, "date").map(|date| {
            date.as_str()
                .and_then(|date| NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok())
        }) {
            None => errors.push(FieldError::new("date", "date is required")),
            Some(Some(_)) => {}
            Some(None) => errors.push(FieldError::new("date", "date must be DD/MM/YYYY")),
        }

        match filled(fields, "paid") {
            None => errors.push(FieldError::new("paid", "paid is required")),
            Some(Value::Bool(_)) => {}
            Some(Value::String(text)) if matches!(text.trim(), "true" | "false") => {}
            Some(_) => errors.push(FieldError::new("paid", "paid must be true or false")),
        }

        if filled(fields, "categoryId").is_none() {
            errors.push(FieldError::new("categoryId", "category is required"));
        } else if Entry::from_json(fields).category_id.is_none() {
            errors.push(FieldError::new("categoryId", "category is not a valid id"));
        }

        errors
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid fields: {}", .0.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join(", "))]
    Invalid(Vec<FieldError>),
    #[error(transparent)]
    AlreadySubmitting(#[from] AlreadySubmitting),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl FormError {
    /// Messages to render next to the form.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Invalid(errors) => errors.iter().map(|e| e.message.clone()).collect(),
            Self::AlreadySubmitting(err) => vec![err.to_string()],
            Self::Client(err) => err.user_messages(),
        }
    }
}

/// Create/edit form state for one resource.
pub struct ResourceForm<T, S> {
    store: S,
    mode: FormMode,
    resource: T,
    submission: SubmissionState,
    server_errors: Vec<String>,
}

impl<T, S> ResourceForm<T, S>
where
    T: Resource + Validate,
    S: ResourceStore<T>,
{
    pub fn new(store: S, mode: FormMode) -> Self {
        Self {
            store,
            mode,
            resource: T::default(),
            submission: SubmissionState::Idle,
            server_errors: Vec::new(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn resource(&self) -> &T {
        &self.resource
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn server_errors(&self) -> &[String] {
        &self.server_errors
    }

    pub fn page_title(&self) -> String {
        match self.mode {
            FormMode::New => format!("New {}", T::LABEL),
            FormMode::Edit(_) => format!(
                "Editing {}: {}",
                T::LABEL,
                self.resource.name().unwrap_or_default()
            ),
        }
    }

    /// In edit mode, replaces the blank resource with the stored one.
    pub async fn load(&mut self) -> Result<&T, ClientError> {
        if let FormMode::Edit(id) = self.mode {
            self.resource = self.store.get_by_id(id).await?;
        }
        Ok(&self.resource)
    }

    /// Validates `fields`, then creates or updates through the store.
    ///
    /// After a successful create the form switches to editing the new record.
    pub async fn submit(&mut self, fields: &Value) -> Result<&T, FormError> {
        let errors = T::validate(fields);
        if !errors.is_empty() {
            return Err(FormError::Invalid(errors));
        }

        let mut bag = fields.clone();
        if let (FormMode::Edit(id), Some(map)) = (self.mode, bag.as_object_mut()) {
            if map.get("id").is_none_or(Value::is_null) {
                map.insert("id".to_string(), Value::from(id));
            }
        }
        let resource = T::from_json(&bag);

        let outcome = {
            let _in_flight = InFlight::begin(&mut self.submission)?;
            match self.mode {
                FormMode::New => self.store.create(resource).await,
                FormMode::Edit(_) => self.store.update(resource).await,
            }
        };

        match outcome {
            Ok(saved) => {
                tracing::info!("{} saved", T::LABEL);
                if let Some(id) = saved.id() {
                    self.mode = FormMode::Edit(id);
                }
                self.server_errors.clear();
                self.resource = saved;
                Ok(&self.resource)
            }
            Err(err) => {
                tracing::warn!("{} not saved: {err}", T::LABEL);
                self.server_errors = err.user_messages();
                Err(err.into())
            }
        }
    }
}
