use milk_gateway::GatewayError;
use milk_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Rejected before any ledger contact.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The ledger returned data this layer cannot trust.
    #[error("malformed ledger payload: {0}")]
    MalformedLedgerPayload(String),
}

impl LifecycleError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_not_found())
    }
}

impl From<TypeError> for LifecycleError {
    fn from(e: TypeError) -> Self {
        match e {
            TypeError::Validation(message) => Self::ValidationFailed(message),
            other => Self::ValidationFailed(other.to_string()),
        }
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// What an unauthenticated caller is allowed to learn about a failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PublicViewError {
    #[error("batch {0} not found")]
    NotFound(String),

    #[error("internal error")]
    Internal,
}
