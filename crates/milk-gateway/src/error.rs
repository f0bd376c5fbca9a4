use std::time::Duration;

use milk_wallet::WalletError;
use thiserror::Error;

use crate::connection::LedgerFault;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("identity '{0}' not found in wallet")]
    IdentityNotFound(String),

    #[error("identity '{0}' is read-only and cannot submit transactions")]
    ForbiddenIdentity(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Chaincode rejection. Displays the ledger message verbatim.
    #[error("{message}")]
    InvocationFailed { function: String, message: String },

    /// No answer within the deadline. For a submit the transaction may or
    /// may not have committed.
    #[error("{function} timed out after {after:?}")]
    Timeout { function: String, after: Duration },

    #[error("credential store error: {0}")]
    Wallet(WalletError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Map a platform fault raised while invoking `function`.
    pub fn from_fault(function: &str, after: Duration, fault: LedgerFault) -> Self {
        match fault {
            LedgerFault::Connection(message) => Self::ConnectionFailed(message),
            LedgerFault::Chaincode(message) => Self::InvocationFailed {
                function: function.to_string(),
                message,
            },
            LedgerFault::Timeout(_) => Self::Timeout {
                function: function.to_string(),
                after,
            },
        }
    }

    /// Faults worth another attempt for a read-only call.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::Timeout { .. })
    }

    /// Whether the ledger reported that the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::InvocationFailed { message, .. } => {
                let message = message.to_ascii_lowercase();
                message.contains("does not exist") || message.contains("not found")
            }
            _ => false,
        }
    }
}

impl From<WalletError> for GatewayError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::IdentityNotFound(name) => Self::IdentityNotFound(name),
            other => Self::Wallet(other),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_message_is_verbatim() {
        let err = GatewayError::from_fault(
            "ApproveBatch",
            Duration::from_secs(1),
            LedgerFault::Chaincode("the batch B9 does not exist".into()),
        );
        assert_eq!(err.to_string(), "the batch B9 does not exist");
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }

    #[test]
    fn platform_timeout_maps_to_timeout() {
        let err = GatewayError::from_fault(
            "CreateBatch",
            Duration::from_secs(30),
            LedgerFault::Timeout("commit event not received".into()),
        );
        assert!(matches!(err, GatewayError::Timeout { ref function, .. } if function == "CreateBatch"));
        assert!(err.is_transient());
    }

    #[test]
    fn business_rejections_are_not_not_found() {
        let err = GatewayError::InvocationFailed {
            function: "ProcessBatch".into(),
            message: "batch B1 is not approved".into(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn wallet_not_found_becomes_identity_not_found() {
        let err: GatewayError = WalletError::IdentityNotFound("bob".into()).into();
        assert!(matches!(err, GatewayError::IdentityNotFound(n) if n == "bob"));
    }
}
