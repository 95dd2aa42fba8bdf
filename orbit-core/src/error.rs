//! Error taxonomy for the interview API.
//!
//! Every transport failure is classified into one of three kinds before it
//! leaves the client: the server could not be reached, the server answered
//! with a non-success status, or a success response did not match the
//! protocol.

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The three API operations, used to pick a fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    StartSession,
    SubmitResponse,
    FetchResult,
}

impl ApiOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartSession => "start_session",
            Self::SubmitResponse => "submit_response",
            Self::FetchResult => "fetch_result",
        }
    }

    /// Message shown when neither the server nor the transport said anything useful.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::StartSession => {
                "Failed to connect to server. Please check if the backend is running."
            }
            Self::SubmitResponse => "Failed to submit answer. Please try again.",
            Self::FetchResult => "Failed to fetch your results.",
        }
    }
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connectivity,
    Server,
    ProtocolViolation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server could not be reached (network failure, timeout, bad base URL).
    #[error("{message}")]
    Connectivity { message: String },

    /// The server answered with a non-success status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A success response whose shape matches no case of the protocol.
    #[error("protocol violation: {detail}")]
    ProtocolViolation { detail: String },
}

impl ApiError {
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity {
            message: message.into(),
        }
    }

    pub fn protocol_violation(detail: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connectivity { .. } => ErrorKind::Connectivity,
            Self::Server { .. } => ErrorKind::Server,
            Self::ProtocolViolation { .. } => ErrorKind::ProtocolViolation,
        }
    }

    /// Classify a failure that happened before any response arrived.
    pub fn from_transport(err: &reqwest_middleware::Error) -> Self {
        let message = match err {
            reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => {
                format!("request timed out: {}", e)
            }
            other => other.to_string(),
        };
        Self::Connectivity { message }
    }

    /// Classify a non-success response.
    ///
    /// The server's `detail` field wins; otherwise the status line is used.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_detail(body)
            .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
        Self::Server {
            status: status.as_u16(),
            message,
        }
    }

    /// The best human-readable string for this failure.
    pub fn user_message(&self, operation: ApiOperation) -> String {
        match self {
            Self::Connectivity { message } | Self::Server { message, .. } => {
                if message.trim().is_empty() {
                    operation.fallback_message().to_string()
                } else {
                    message.clone()
                }
            }
            Self::ProtocolViolation { detail } => {
                format!("Unexpected response from server ({})", detail)
            }
        }
    }
}

/// Pull a human-readable `detail` out of an error body.
///
/// Accepts a plain string detail, or a validation-error list whose entries
/// carry a `msg` field (only the first is used).
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail")?;

    let message = match detail {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .first()?
            .get("msg")?
            .as_str()?
            .to_string(),
        _ => return None,
    };

    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}
