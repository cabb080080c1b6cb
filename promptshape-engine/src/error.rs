use promptshape_core::error::ValidationError;
use thiserror::Error;

/// Shown when the backend could not be reached at all.
pub const UNEXPECTED_ERROR: &str = "unexpected error";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn unexpected() -> Self {
        Self::new(UNEXPECTED_ERROR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("No JSON data to download")]
    NoData,

    #[error("a transformation is already in progress")]
    Busy,

    // Detail goes to the log; the user sees the fixed message.
    #[error("Failed to download JSON file")]
    Download(String),
}
