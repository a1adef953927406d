//! API error taxonomy
//!
//! Every failure of a remote call is one of:
//! - transport (timeout, connection refused, TLS)
//! - a non-2xx status with the server's explanation
//! - a response body that doesn't match the expected shape
//!
//! Errors carry human-readable messages only; callers show them as-is.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the API client and repositories
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body couldn't be parsed
    #[error("Invalid response from server: {details}")]
    Decode { details: String },

    /// A URL couldn't be built from the configured base
    #[error("Invalid API URL '{url}': {details}")]
    InvalidUrl { url: String, details: String },
}

/// FastAPI-style error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationItem>),
}

#[derive(Debug, Deserialize)]
struct ValidationItem {
    msg: String,
}

impl ApiError {
    /// Classify a reqwest error raised before a response was read
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return ApiError::Decode {
                details: error.to_string(),
            };
        }

        let message = if error.is_timeout() {
            "Request timed out. Check your connection and try again.".to_string()
        } else if error.is_connect() {
            "Could not connect to the server. Check your connection and try again.".to_string()
        } else {
            format!("Network error: {}", error)
        };

        ApiError::Transport {
            message,
            source: error,
        }
    }

    /// Build an error from a non-success status and its body
    ///
    /// Uses the server's `detail` field when present, otherwise the status
    /// reason phrase, otherwise a generic message.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = detail_message(body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the server rejected the credentials
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Check if the requested resource doesn't exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if the failure happened below HTTP
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }

    /// Message for display, falling back when the description is blank
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

/// Extract the server's explanation from an error body
fn detail_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed.detail {
        ErrorDetail::Message(m) => m,
        ErrorDetail::Validation(items) => items
            .into_iter()
            .map(|i| i.msg)
            .collect::<Vec<_>>()
            .join("; "),
    };

    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
