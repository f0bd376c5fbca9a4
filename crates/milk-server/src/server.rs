use std::sync::Arc;

use axum::Router;
use milk_gateway::{
    InMemoryNetwork, LedgerBackend, LedgerNetwork, NetworkProfile, TransactionGateway,
};
use milk_lifecycle::BatchService;
use milk_wallet::{CredentialStore, FileSystemWallet};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::{AuthProvider, JwtAuth, StaticTokenAuth};
use crate::config::AppConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Milk Trace HTTP server.
pub struct MilkServer {
    config: AppConfig,
    state: AppState,
}

impl MilkServer {
    /// Wire the server from configuration: credentials from the wallet
    /// directory, batches on the ledger selected by `gateway.backend`.
    pub fn from_config(config: AppConfig) -> ServerResult<Self> {
        config.validate()?;
        if config.gateway.backend == LedgerBackend::Platform {
            return Err(ServerError::Config(
                "gateway.backend = \"platform\" has no client in this build; \
                 use \"simulated\" to run against the in-memory ledger"
                    .into(),
            ));
        }
        if let Some(path) = &config.gateway.network_profile {
            let profile =
                NetworkProfile::load(path).map_err(|e| ServerError::Config(e.to_string()))?;
            profile
                .ensure_channel(&config.gateway.channel)
                .map_err(|e| ServerError::Config(e.to_string()))?;
            tracing::warn!(
                profile = %profile.name,
                peers = profile.peers.len(),
                "network profile is configured but the simulated backend is selected; \
                 transactions will not reach these peers"
            );
        }
        let network = InMemoryNetwork::new(&config.gateway.channel, &config.gateway.chaincode);
        let wallet = FileSystemWallet::new(&config.gateway.wallet_path);
        Ok(Self::with_parts(config, Arc::new(network), Arc::new(wallet)))
    }

    /// Bearer tokens are JWTs when a secret is configured, otherwise they
    /// are looked up in the static token table.
    pub fn with_parts(
        config: AppConfig,
        network: Arc<dyn LedgerNetwork>,
        wallet: Arc<dyn CredentialStore>,
    ) -> Self {
        let gateway = TransactionGateway::new(network, wallet, config.gateway.clone());
        let service = BatchService::new(Arc::new(gateway));
        let auth: Arc<dyn AuthProvider> = match &config.auth.jwt_secret {
            Some(secret) => Arc::new(JwtAuth::new(secret)),
            None => Arc::new(StaticTokenAuth::new(config.auth.tokens.clone())),
        };
        Self {
            state: AppState::new(service, auth),
            config,
        }
    }

    /// Human-readable name of the ledger this server writes to.
    pub fn ledger_label(&self) -> &'static str {
        self.config.gateway.backend.describe()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> Router {
        let router = build_router(self.state.clone());
        if self.config.server.enable_cors {
            router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            router
        }
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.server.bind_addr).await?;
        tracing::info!(
            addr = %self.config.server.bind_addr,
            channel = %self.config.gateway.channel,
            chaincode = %self.config.gateway.chaincode,
            ledger = self.ledger_label(),
            "milk trace server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
