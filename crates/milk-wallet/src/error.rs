use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("identity '{0}' not found in wallet")]
    IdentityNotFound(String),

    #[error("invalid identity name: {0:?}")]
    InvalidName(String),

    #[error("malformed wallet entry '{name}': {reason}")]
    Malformed { name: String, reason: String },

    #[error("unsupported identity type '{kind}' for '{name}'")]
    UnsupportedType { name: String, kind: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WalletError {
    /// Returns `true` when the name simply has no credential.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IdentityNotFound(_))
    }
}

pub type WalletResult<T> = Result<T, WalletError>;
