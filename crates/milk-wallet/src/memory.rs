use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::context::SigningContext;
use crate::error::{WalletError, WalletResult};
use crate::traits::CredentialStore;

/// Map-backed credential store.
#[derive(Default)]
pub struct InMemoryWallet {
    entries: RwLock<BTreeMap<String, SigningContext>>,
}

impl InMemoryWallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A wallet holding placeholder credentials for each name.
    pub fn with_identities<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let wallet = Self::new();
        for name in names {
            let name = name.into();
            wallet.insert(SigningContext::new(
                name.clone(),
                "Org1MSP",
                format!("cert:{name}"),
                format!("key:{name}"),
            ));
        }
        wallet
    }

    pub fn insert(&self, context: SigningContext) {
        self.entries
            .write()
            .expect("wallet lock poisoned")
            .insert(context.name.clone(), context);
    }
}

#[async_trait]
impl CredentialStore for InMemoryWallet {
    async fn resolve(&self, name: &str) -> WalletResult<SigningContext> {
        self.entries
            .read()
            .expect("wallet lock poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| WalletError::IdentityNotFound(name.to_string()))
    }

    async fn list(&self) -> WalletResult<Vec<String>> {
        Ok(self
            .entries
            .read()
            .expect("wallet lock poisoned")
            .keys()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_inserted_identity() {
        let wallet = InMemoryWallet::with_identities(["appUser"]);
        let ctx = wallet.resolve("appUser").await.unwrap();
        assert_eq!(ctx.msp_id, "Org1MSP");
    }

    #[tokio::test]
    async fn unknown_identity_never_falls_back() {
        let wallet = InMemoryWallet::with_identities(["appUser"]);
        let err = wallet.resolve("admin").await.unwrap_err();
        assert!(matches!(err, WalletError::IdentityNotFound(n) if n == "admin"));
    }

    #[tokio::test]
    async fn list_is_sorted() {
        let wallet = InMemoryWallet::with_identities(["zed", "alice"]);
        assert_eq!(wallet.list().await.unwrap(), vec!["alice", "zed"]);
    }
}
