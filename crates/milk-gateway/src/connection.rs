use async_trait::async_trait;
use milk_wallet::SigningContext;
use thiserror::Error;

/// Failure reported by the ledger platform.
///
/// Messages are platform-defined and travel upward unchanged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LedgerFault {
    /// Network or session setup failed; nothing reached the chaincode.
    #[error("{0}")]
    Connection(String),

    /// The chaincode ran and rejected the call.
    #[error("{0}")]
    Chaincode(String),

    /// The platform gave up waiting. For submissions the outcome is unknown.
    #[error("{0}")]
    Timeout(String),
}

/// Result of a committed submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub tx_id: String,
    pub payload: Vec<u8>,
}

/// Entry point to a ledger network.
#[async_trait]
pub trait LedgerNetwork: Send + Sync {
    /// Open a session bound to exactly one identity.
    async fn connect(&self, identity: &SigningContext) -> Result<Box<dyn LedgerSession>, LedgerFault>;
}

/// A live, identity-scoped connection.
#[async_trait]
pub trait LedgerSession: Send + Sync {
    /// Name of the identity this session signs as.
    fn identity(&self) -> &str;

    async fn channel(&self, name: &str) -> Result<Box<dyn ChannelHandle>, LedgerFault>;

    /// Release all network resources. Called exactly once by [`crate::SessionGuard`].
    fn close(&mut self);
}

/// A joined channel; yields contract handles by chaincode name.
pub trait ChannelHandle: Send + Sync {
    fn contract(&self, chaincode: &str) -> Box<dyn ContractHandle>;
}

/// A deployed chaincode reachable over a session.
#[async_trait]
pub trait ContractHandle: Send + Sync {
    /// Run a query without committing.
    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, LedgerFault>;

    /// Endorse, order and commit a transaction.
    async fn submit(&self, function: &str, args: &[String]) -> Result<SubmitReceipt, LedgerFault>;
}
