use async_trait::async_trait;

use crate::context::SigningContext;
use crate::error::WalletResult;

/// Read boundary for caller credentials.
///
/// Implementations must return [`crate::WalletError::IdentityNotFound`] for
/// unknown names and must never substitute a different identity.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn resolve(&self, name: &str) -> WalletResult<SigningContext>;

    /// Names of every identity held, sorted.
    async fn list(&self) -> WalletResult<Vec<String>>;
}
