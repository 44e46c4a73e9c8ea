use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body the backend attaches to failed responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ServerErrorBody {
    /// The message meant for the user: `message` first, then `error`.
    pub fn user_message(&self) -> Option<&str> {
        [self.message.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    #[error("field `{field}` must not be empty")]
    Empty { field: &'static str },
    #[error("field `{field}` must be an integer, got {raw:?}")]
    NotAnInteger { field: &'static str, raw: String },
}

impl RequestValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::NotAnInteger { field, .. } => field,
        }
    }
}
