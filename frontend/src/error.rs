//! Error types shared by the loaders and the forms.

use serde_json::Value;
use thiserror::Error;

/// Failure of a call to the REST backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No response within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Network or transport failure, no response was received.
    #[error("Connection failed: {0}")]
    Transport(String),

    /// Non-2xx response. `detail` is the human readable part of the body, if any.
    #[error("Server returned status {status}")]
    Http { status: u16, detail: Option<String> },

    /// The body of a successful response could not be decoded.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn from_response(status: u16, body: &str) -> Self {
        ApiError::Http {
            status,
            detail: extract_detail(body),
        }
    }

    /// Text shown to the user: the server's `detail` when it sent one.
    pub fn message(&self) -> String {
        match self {
            ApiError::Http {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

/// Failure of a form submission, either before or after reaching the server.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must be a number")]
    NotANumber(&'static str),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl FormError {
    pub fn message(&self) -> String {
        match self {
            FormError::Api(err) => err.message(),
            other => other.to_string(),
        }
    }
}

/// Pulls a displayable message out of an error body.
///
/// Uses the `detail` field when present, otherwise flattens a field error object
/// such as `{"email": ["Enter a valid email address."]}` into `email: Enter a valid email address.`
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let fields = value.as_object()?;

    if let Some(detail) = fields.get("detail").and_then(Value::as_str) {
        return Some(detail.to_owned());
    }

    let messages: Vec<String> = fields
        .iter()
        .filter_map(|(field, errors)| {
            let texts: Vec<&str> = match errors {
                Value::String(text) => vec![text.as_str()],
                Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
                _ => vec![],
            };
            (!texts.is_empty()).then(|| format!("{field}: {}", texts.join(" ")))
        })
        .collect();

    (!messages.is_empty()).then(|| messages.join("; "))
}
