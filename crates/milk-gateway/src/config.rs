use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};

/// Which ledger the server talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    /// [`crate::InMemoryNetwork`]: chaincode rules enforced, nothing persisted.
    #[default]
    Simulated,
    /// A real peer network described by `network_profile`.
    Platform,
}

impl LedgerBackend {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Simulated => "simulated in-memory ledger, state is lost on restart",
            Self::Platform => "platform ledger network",
        }
    }
}

/// Where the ledger is and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub backend: LedgerBackend,
    /// Connection profile describing peers, orderers and channels.
    pub network_profile: Option<PathBuf>,
    /// Directory holding `<identity>.id` credential files.
    pub wallet_path: PathBuf,
    pub channel: String,
    pub chaincode: String,
    /// The only identity allowed for unauthenticated reads. Never submits.
    pub public_identity: String,
    /// Deadline for opening a session and resolving the channel. Expiry
    /// here is a connection failure: nothing was sent.
    pub connect_timeout_ms: u64,
    pub submit_timeout_ms: u64,
    pub evaluate_timeout_ms: u64,
    /// Extra attempts for read-only calls on transient faults.
    pub evaluate_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::Simulated,
            network_profile: None,
            wallet_path: PathBuf::from("./wallet"),
            channel: "mychannel".into(),
            chaincode: "milkcc".into(),
            public_identity: "appUser".into(),
            connect_timeout_ms: 5_000,
            submit_timeout_ms: 30_000,
            evaluate_timeout_ms: 10_000,
            evaluate_retries: 2,
            retry_backoff_ms: 250,
        }
    }
}

impl GatewayConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    pub fn evaluate_timeout(&self) -> Duration {
        Duration::from_millis(self.evaluate_timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Apply overrides from `CCP_PATH`, `WALLET_PATH`, `CHANNEL`,
    /// `CHAINCODE` and `PUBLIC_IDENTITY`.
    ///
    /// `lookup` is usually `|k| std::env::var(k).ok()`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("CCP_PATH") {
            self.network_profile = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("WALLET_PATH") {
            self.wallet_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("CHANNEL") {
            self.channel = v;
        }
        if let Some(v) = lookup("CHAINCODE") {
            self.chaincode = v;
        }
        if let Some(v) = lookup("PUBLIC_IDENTITY") {
            self.public_identity = v;
        }
    }

    pub fn validate(&self) -> GatewayResult<()> {
        for (field, value) in [
            ("channel", &self.channel),
            ("chaincode", &self.chaincode),
            ("public_identity", &self.public_identity),
        ] {
            if value.trim().is_empty() {
                return Err(GatewayError::Config(format!("{field} must not be empty")));
            }
        }
        if self.connect_timeout_ms == 0 || self.submit_timeout_ms == 0 || self.evaluate_timeout_ms == 0 {
            return Err(GatewayError::Config("timeouts must be greater than zero".into()));
        }
        if self.backend == LedgerBackend::Platform && self.network_profile.is_none() {
            return Err(GatewayError::Config(
                "the platform backend requires network_profile".into(),
            ));
        }
        Ok(())
    }
}
