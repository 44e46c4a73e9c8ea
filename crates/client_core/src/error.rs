use std::time::Duration;

use shared::error::ServerErrorBody;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    Timeout,
    Cancelled,
    Status,
    Network,
    Decode,
    Config,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {endpoint} timed out after {after:?}")]
    Timeout {
        endpoint: &'static str,
        after: Duration,
    },
    #[error("request to {endpoint} was cancelled")]
    Cancelled { endpoint: &'static str },
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: u16,
        reason: Option<String>,
        body: Option<ServerErrorBody>,
    },
    #[error("network error calling {endpoint}: {source}")]
    Network {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        source: serde_json::Error,
    },
    #[error("invalid server url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

impl ClientError {
    pub fn kind(&self) -> ClientErrorKind {
        match self {
            Self::Timeout { .. } => ClientErrorKind::Timeout,
            Self::Cancelled { .. } => ClientErrorKind::Cancelled,
            Self::Status { .. } => ClientErrorKind::Status,
            Self::Network { .. } => ClientErrorKind::Network,
            Self::Decode { .. } => ClientErrorKind::Decode,
            Self::InvalidUrl { .. } => ClientErrorKind::Config,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message the server put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                body: Some(body), ..
            } => body.user_message(),
            _ => None,
        }
    }
}
