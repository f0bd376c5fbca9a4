use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use milk_types::LedgerFunction;
use milk_wallet::SigningContext;
use tracing::debug;

use crate::chaincode::LedgerState;
use crate::connection::{
    ChannelHandle, ContractHandle, LedgerFault, LedgerNetwork, LedgerSession, SubmitReceipt,
};

/// Open/close counters for sessions handed out by a network.
#[derive(Debug, Default)]
pub struct SessionStats {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl SessionStats {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Sessions opened but not yet closed.
    pub fn live(&self) -> usize {
        self.opened().saturating_sub(self.closed())
    }
}

struct Shared {
    channel: String,
    chaincode: String,
    state: RwLock<LedgerState>,
    stats: SessionStats,
}

/// In-process network hosting one channel with the batch contract.
///
/// Cloning yields another handle to the same world state.
#[derive(Clone)]
pub struct InMemoryNetwork {
    shared: Arc<Shared>,
}

impl InMemoryNetwork {
    pub fn new(channel: impl Into<String>, chaincode: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(Shared {
                channel: channel.into(),
                chaincode: chaincode.into(),
                state: RwLock::new(LedgerState::default()),
                stats: SessionStats::default(),
            }),
        }
    }

    pub fn stats(&self) -> &SessionStats {
        &self.shared.stats
    }

    pub fn batch_count(&self) -> usize {
        self.shared
            .state
            .read()
            .expect("ledger state lock poisoned")
            .batch_count()
    }
}

impl Default for InMemoryNetwork {
    fn default() -> Self {
        Self::new("mychannel", "milkcc")
    }
}

#[async_trait]
impl LedgerNetwork for InMemoryNetwork {
    async fn connect(
        &self,
        identity: &SigningContext,
    ) -> Result<Box<dyn LedgerSession>, LedgerFault> {
        if identity.msp_id.trim().is_empty() {
            return Err(LedgerFault::Connection(format!(
                "identity '{}' has no MSP id",
                identity.name
            )));
        }
        self.shared.stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            shared: Arc::clone(&self.shared),
            identity: identity.name.clone(),
            open: true,
        }))
    }
}

struct MemorySession {
    shared: Arc<Shared>,
    identity: String,
    open: bool,
}

#[async_trait]
impl LedgerSession for MemorySession {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn channel(&self, name: &str) -> Result<Box<dyn ChannelHandle>, LedgerFault> {
        if !self.open {
            return Err(LedgerFault::Connection("session is closed".into()));
        }
        if name != self.shared.channel {
            return Err(LedgerFault::Connection(format!("channel '{name}' not found")));
        }
        Ok(Box::new(MemoryChannel {
            shared: Arc::clone(&self.shared),
            identity: self.identity.clone(),
        }))
    }

    fn close(&mut self) {
        if std::mem::replace(&mut self.open, false) {
            self.shared.stats.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

struct MemoryChannel {
    shared: Arc<Shared>,
    identity: String,
}

impl ChannelHandle for MemoryChannel {
    fn contract(&self, chaincode: &str) -> Box<dyn ContractHandle> {
        Box::new(MemoryContract {
            shared: Arc::clone(&self.shared),
            identity: self.identity.clone(),
            chaincode: chaincode.to_string(),
        })
    }
}

struct MemoryContract {
    shared: Arc<Shared>,
    identity: String,
    chaincode: String,
}

impl MemoryContract {
    fn function(&self, name: &str) -> Result<LedgerFunction, LedgerFault> {
        if self.chaincode != self.shared.chaincode {
            return Err(LedgerFault::Chaincode(format!(
                "chaincode {} is not installed on channel {}",
                self.chaincode, self.shared.channel
            )));
        }
        name.parse()
            .map_err(|_| LedgerFault::Chaincode(format!("function {name} not found in contract")))
    }

    fn next_tx_id(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(uuid::Uuid::now_v7().as_bytes());
        hasher.update(self.identity.as_bytes());
        hex::encode(hasher.finalize().as_bytes())
    }
}

#[async_trait]
impl ContractHandle for MemoryContract {
    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, LedgerFault> {
        let function = self.function(function)?;
        let state = self.shared.state.read().expect("ledger state lock poisoned");
        state.query(function, args).map_err(LedgerFault::Chaincode)
    }

    async fn submit(&self, function: &str, args: &[String]) -> Result<SubmitReceipt, LedgerFault> {
        let function = self.function(function)?;
        let tx_id = self.next_tx_id();
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let payload = self
            .shared
            .state
            .write()
            .expect("ledger state lock poisoned")
            .execute(function, args, &tx_id, &timestamp)
            .map_err(LedgerFault::Chaincode)?;
        debug!(identity = %self.identity, %function, %tx_id, "committed");
        Ok(SubmitReceipt { tx_id, payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionGuard;

    fn ctx(name: &str) -> SigningContext {
        SigningContext::new(name, "Org1MSP", "cert", "key")
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    async fn contract(network: &InMemoryNetwork, chaincode: &str) -> (SessionGuard, Box<dyn ContractHandle>) {
        let guard = SessionGuard::open(network, &ctx("farmer")).await.unwrap();
        let channel = guard.session().channel("mychannel").await.unwrap();
        let contract = channel.contract(chaincode);
        (guard, contract)
    }

    #[tokio::test]
    async fn submit_then_evaluate_sees_state() {
        let network = InMemoryNetwork::default();
        let (guard, contract) = contract(&network, "milkcc").await;

        let receipt = contract
            .submit("CreateBatch", &args(&["B1", "F1", "100"]))
            .await
            .unwrap();
        assert_eq!(receipt.tx_id.len(), 64);

        let raw = contract.evaluate("ReadBatch", &args(&["B1"])).await.unwrap();
        assert!(std::str::from_utf8(&raw).unwrap().contains("\"batchId\":\"B1\""));
        guard.close();

        assert_eq!(network.batch_count(), 1);
        assert_eq!(network.stats().opened(), 1);
        assert_eq!(network.stats().live(), 0);
    }

    #[tokio::test]
    async fn transaction_ids_are_unique() {
        let network = InMemoryNetwork::default();
        let (_guard, contract) = contract(&network, "milkcc").await;
        let a = contract.submit("CreateBatch", &args(&["B1", "F1", "1"])).await.unwrap();
        let b = contract.submit("CreateBatch", &args(&["B2", "F1", "1"])).await.unwrap();
        assert_ne!(a.tx_id, b.tx_id);
    }

    #[tokio::test]
    async fn unknown_chaincode_is_reported_by_contract() {
        let network = InMemoryNetwork::default();
        let (_guard, contract) = contract(&network, "othercc").await;
        let err = contract.evaluate("GetAllBatches", &[]).await.unwrap_err();
        assert!(matches!(err, LedgerFault::Chaincode(m) if m.contains("not installed")));
    }

    #[tokio::test]
    async fn unknown_function_is_reported_by_contract() {
        let network = InMemoryNetwork::default();
        let (_guard, contract) = contract(&network, "milkcc").await;
        let err = contract.submit("DeleteBatch", &args(&["B1"])).await.unwrap_err();
        assert_eq!(err, LedgerFault::Chaincode("function DeleteBatch not found in contract".into()));
    }

    #[tokio::test]
    async fn unknown_channel_fails_to_resolve() {
        let network = InMemoryNetwork::default();
        let guard = SessionGuard::open(&network, &ctx("farmer")).await.unwrap();
        assert!(guard.session().channel("nochannel").await.is_err());
    }

    #[tokio::test]
    async fn identity_without_msp_cannot_connect() {
        let network = InMemoryNetwork::default();
        let anonymous = SigningContext::new("nobody", "", "", "");
        assert!(SessionGuard::open(&network, &anonymous).await.is_err());
        assert_eq!(network.stats().opened(), 0);
    }
}
