use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a prompt to transform.")]
    EmptyPrompt,

    #[error("unknown include key: {0}")]
    UnknownKey(String),
}
