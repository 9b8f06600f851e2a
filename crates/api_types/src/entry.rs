//! Entries are the financial transactions recorded by the user.
//!
//! An entry references its category through `category_id`. The embedded
//! `category` is a cached copy: it is only there because the backing store
//! cannot join on its own, and it is refreshed from `category_id` before every
//! write (see `client::EntryService`).

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Amount, Category, Resource, ResourceId, fields};

/// Wire format of [`Entry::date`].
pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    #[default]
    Expense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// `(value, label)` pairs for a select widget.
    pub fn options() -> [(&'static str, &'static str); 2] {
        [Self::Expense, Self::Income].map(|kind| (kind.as_str(), kind.label()))
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown entry type \"{other}\"")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Option<ResourceId>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub amount: Option<Amount>,
    /// `DD/MM/YYYY`, kept verbatim as received.
    pub date: Option<String>,
    pub paid: bool,
    pub category_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            description: None,
            kind: EntryKind::Expense,
            amount: None,
            date: None,
            paid: true,
            category_id: None,
            category: None,
        }
    }
}

impl Entry {
    pub fn paid_text(&self) -> &'static str {
        if self.paid { "Paid" } else { "Pending" }
    }

    /// The entry date, or `None` when it is missing or not `DD/MM/YYYY`.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let date = self.date.as_deref()?;
        NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()
    }
}

impl Resource for Entry {
    const COLLECTION: &'static str = "api/entries";
    const LABEL: &'static str = "entry";

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn from_json(raw: &Value) -> Self {
        let defaults = Self::default();
        Self {
            id: fields::id(raw, "id"),
            name: fields::string(raw, "name"),
            description: fields::string(raw, "description"),
            kind: fields::string(raw, "type")
                .and_then(|kind| kind.parse().ok())
                .unwrap_or(defaults.kind),
            amount: fields::value(raw, "amount").and_then(Amount::from_json),
            date: fields::string(raw, "date"),
            paid: fields::boolean(raw, "paid").unwrap_or(defaults.paid),
            category_id: fields::id(raw, "categoryId"),
            category: fields::object(raw, "category").map(Category::from_json),
        }
    }

    fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
