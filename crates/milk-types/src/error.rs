use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unknown processing type: {0}")]
    UnknownProcessingType(String),

    #[error("unknown ledger function: {0}")]
    UnknownFunction(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl TypeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
