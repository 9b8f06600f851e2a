use client::{ClientError, TransportError, form::FormError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Lines to print for the user.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Form(err) => err.messages(),
            Self::Client(err) => err.user_messages(),
            other => vec![other.to_string()],
        }
    }
}
