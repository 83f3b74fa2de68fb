use serde_json::Value;
use thiserror::Error;

/// Failure talking to the radiation API. Nothing is retried.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// A response arrived with a non-2xx status.
    #[error("PVGIS API Error: {status} - {reason}")]
    Status { status: u16, reason: String, body: Value },

    /// No response arrived (connect error, timeout, broken body).
    #[error("No response received from PVGIS API: {0}")]
    Transport(String),

    #[error("Invalid radiation data received from API: {0}")]
    Decode(String),

    #[error("Invalid radiation request: {0}")]
    InvalidOptions(String),
}

impl UpstreamError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        UpstreamError::Transport(err.to_string())
    }

    /// One-line summary, with the upstream body appended when there is one.
    pub fn summary(&self) -> String {
        match self {
            UpstreamError::Status { body, .. } if !body.is_null() => format!("{self} - {body}"),
            _ => self.to_string(),
        }
    }

    /// The upstream body when a response arrived, else the error message.
    pub fn details(&self) -> Value {
        match self {
            UpstreamError::Status { body, .. } if !body.is_null() => body.clone(),
            _ => Value::String(self.to_string()),
        }
    }
}
