//! Errors surfaced by the transport and by the resource clients.
//!
//! - [`TransportError`] is what the wire reports: connection failures, non-2xx
//!   statuses (with the raw body), unusable URLs or bodies.
//! - [`ClientError`] is what a CRUD call reports, classified from the
//!   transport failure and the operation that hit it.

use serde::Deserialize;
use thiserror::Error;

/// Status the backing store answers with when it rejects a write on field
/// validation.
pub const VALIDATION_STATUS: u16 = 422;

const NOT_FOUND_STATUS: u16 = 404;

const GENERIC_FAILURE: &str = "Failed to communicate with the server. Please try again later.";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|status| status.as_u16()),
            Self::InvalidUrl(_) | Self::Decode(_) => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// The CRUD call a transport failure happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("\"{path}\" not found")]
    NotFound { path: String },
    #[error("rejected by the server ({status}): {}", .messages.join("; "))]
    ValidationRejected { status: u16, messages: Vec<String> },
    #[error("request failed: {0}")]
    RequestFailed(#[from] TransportError),
    #[error("missing {field}")]
    MissingReference { field: &'static str },
}

impl ClientError {
    pub(crate) fn classify(err: TransportError, operation: Operation, path: &str) -> Self {
        match (operation, err.status()) {
            (Operation::Get, Some(NOT_FOUND_STATUS)) => Self::NotFound {
                path: path.to_string(),
            },
            (Operation::Create | Operation::Update, Some(VALIDATION_STATUS)) => {
                let messages = validation_messages(err.body().unwrap_or_default());
                Self::ValidationRejected {
                    status: VALIDATION_STATUS,
                    messages,
                }
            }
            _ => Self::RequestFailed(err),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Messages a form should show for this failure.
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            Self::ValidationRejected { messages, .. } if !messages.is_empty() => messages.clone(),
            _ => vec![GENERIC_FAILURE.to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Many { errors: Vec<String> },
    One { error: String },
}

fn validation_messages(body: &str) -> Vec<String> {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody::Many { errors }) => errors,
        Ok(ErrorBody::One { error }) => vec![error],
        Err(_) if body.trim().is_empty() => Vec::new(),
        Err(_) => vec![body.trim().to_string()],
    }
}
