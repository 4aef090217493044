use serde::Serialize;
use thiserror::Error;

use crate::circuit_breaker::OperationKind;

/// Failures from the key-value store backing device, rate-limit and breaker state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("corrupt value under {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Classified failures reported by the persistence backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistError {
    #[error("network request failed: {0}")]
    Network(String),

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("{0} not found")]
    NotFound(String),

    #[error("write rejected: {0}")]
    Rejected(String),
}

/// One violated validation rule, addressed to a payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Terminal errors surfaced by [`crate::WriteGateway`].
#[derive(Debug, Error)]
pub enum WriteError {
    /// The payload broke one or more rules; nothing was attempted.
    #[error("validation failed with {} problem(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// This device submitted too recently.
    #[error("rate limited; retry in {remaining_secs}s")]
    RateLimited { remaining_secs: u64 },

    /// The breaker for this operation is open; the backend was not called.
    #[error("circuit open for {operation}")]
    CircuitOpen { operation: OperationKind },

    /// A single attempt exceeded the configured deadline.
    #[error("write timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    /// The backend reported that its own deadline expired.
    #[error("backend deadline exceeded")]
    DeadlineExceeded,

    #[error("transient network failure: {0}")]
    TransientNetwork(String),

    /// The referenced entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl WriteError {
    /// Allow-list of failure classes worth another attempt.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WriteError::Timeout { .. } | WriteError::DeadlineExceeded | WriteError::TransientNetwork(_)
        )
    }

    /// Text safe to show the submitting user; internal detail is never included.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WriteError::Validation(errors) => errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            WriteError::RateLimited { remaining_secs } => {
                format!("Please wait {remaining_secs} seconds before submitting again.")
            }
            WriteError::NotFound(_) => "This location could not be found.".to_owned(),
            WriteError::CircuitOpen { .. }
            | WriteError::Timeout { .. }
            | WriteError::DeadlineExceeded
            | WriteError::TransientNetwork(_)
            | WriteError::Backend(_)
            | WriteError::Store(_) => "Submission failed. Please try again later.".to_owned(),
        }
    }
}

impl From<PersistError> for WriteError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::Network(msg) => WriteError::TransientNetwork(msg),
            PersistError::DeadlineExceeded => WriteError::DeadlineExceeded,
            PersistError::NotFound(what) => WriteError::NotFound(what),
            PersistError::Rejected(msg) => WriteError::Backend(msg),
        }
    }
}
