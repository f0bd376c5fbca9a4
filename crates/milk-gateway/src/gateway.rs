use std::sync::Arc;

use async_trait::async_trait;
use milk_types::LedgerFunction;
use milk_wallet::{CredentialStore, SigningContext};
use tracing::{debug, info, warn};

use crate::config::GatewayConfig;
use crate::connection::{ContractHandle, LedgerFault, LedgerNetwork};
use crate::error::{GatewayError, GatewayResult};
use crate::session::SessionGuard;

/// A committed submission: the ledger-assigned id and the raw result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submitted {
    pub tx_id: String,
    pub payload: Vec<u8>,
}

/// Evaluate/submit boundary the lifecycle service is written against.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Read-only invocation under `identity`.
    async fn evaluate(
        &self,
        identity: &str,
        function: LedgerFunction,
        args: &[String],
    ) -> GatewayResult<Vec<u8>>;

    /// State-changing invocation under `identity`. Never retried here.
    async fn submit(
        &self,
        identity: &str,
        function: LedgerFunction,
        args: &[String],
    ) -> GatewayResult<Submitted>;

    /// The identity reserved for unauthenticated reads.
    fn public_identity(&self) -> &str;
}

/// Gateway that opens one ledger session per call.
///
/// Holds no per-call state: the network handle, the credential store and
/// the configuration are all read-only, so one instance serves concurrent
/// callers.
pub struct TransactionGateway {
    network: Arc<dyn LedgerNetwork>,
    wallet: Arc<dyn CredentialStore>,
    config: GatewayConfig,
}

impl TransactionGateway {
    pub fn new(
        network: Arc<dyn LedgerNetwork>,
        wallet: Arc<dyn CredentialStore>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            network,
            wallet,
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Opens a session and resolves the contract under the connect deadline.
    /// Nothing has reached the ledger yet, so every failure here, expiry
    /// included, is a connection failure.
    async fn open_contract(
        &self,
        identity: &SigningContext,
        function: LedgerFunction,
    ) -> GatewayResult<(SessionGuard, Box<dyn ContractHandle>)> {
        let deadline = self.config.connect_timeout();
        let fault = |f: LedgerFault| GatewayError::from_fault(function.as_str(), deadline, f);
        let connect = async {
            let guard = SessionGuard::open(self.network.as_ref(), identity)
                .await
                .map_err(fault)?;
            // On error the guard drops here and closes the session.
            let channel = guard
                .session()
                .channel(&self.config.channel)
                .await
                .map_err(fault)?;
            let contract = channel.contract(&self.config.chaincode);
            Ok::<_, GatewayError>((guard, contract))
        };
        match tokio::time::timeout(deadline, connect).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::ConnectionFailed(format!(
                "connecting for {function} timed out after {}ms",
                deadline.as_millis()
            ))),
        }
    }

    async fn evaluate_once(
        &self,
        identity: &SigningContext,
        function: LedgerFunction,
        args: &[String],
    ) -> GatewayResult<Vec<u8>> {
        let (guard, contract) = self.open_contract(identity, function).await?;
        let deadline = self.config.evaluate_timeout();
        let outcome = tokio::time::timeout(deadline, contract.evaluate(function.as_str(), args)).await;
        guard.close();
        match outcome {
            Ok(result) => result.map_err(|f| GatewayError::from_fault(function.as_str(), deadline, f)),
            Err(_) => Err(GatewayError::Timeout {
                function: function.to_string(),
                after: deadline,
            }),
        }
    }
}

#[async_trait]
impl LedgerGateway for TransactionGateway {
    async fn evaluate(
        &self,
        identity: &str,
        function: LedgerFunction,
        args: &[String],
    ) -> GatewayResult<Vec<u8>> {
        let context = self.wallet.resolve(identity).await?;
        let mut retries = 0;
        loop {
            match self.evaluate_once(&context, function, args).await {
                Ok(payload) => {
                    debug!(identity, %function, bytes = payload.len(), "evaluated");
                    return Ok(payload);
                }
                Err(e) if e.is_transient() && retries < self.config.evaluate_retries => {
                    retries += 1;
                    warn!(identity, %function, retries, error = %e, "transient fault, retrying evaluation");
                    tokio::time::sleep(self.config.retry_backoff()).await;
                }
                Err(e) => {
                    warn!(identity, %function, error = %e, "evaluation failed");
                    return Err(e);
                }
            }
        }
    }

    async fn submit(
        &self,
        identity: &str,
        function: LedgerFunction,
        args: &[String],
    ) -> GatewayResult<Submitted> {
        if identity == self.config.public_identity {
            warn!(identity, %function, "public identity attempted a submission");
            return Err(GatewayError::ForbiddenIdentity(identity.to_string()));
        }
        let context = self.wallet.resolve(identity).await?;
        let outcome = match self.open_contract(&context, function).await {
            Ok((guard, contract)) => {
                let deadline = self.config.submit_timeout();
                let sent = tokio::time::timeout(deadline, contract.submit(function.as_str(), args)).await;
                guard.close();
                match sent {
                    Ok(result) => {
                        result.map_err(|f| GatewayError::from_fault(function.as_str(), deadline, f))
                    }
                    Err(_) => Err(GatewayError::Timeout {
                        function: function.to_string(),
                        after: deadline,
                    }),
                }
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(receipt) => {
                info!(identity, %function, tx_id = %receipt.tx_id, "submitted");
                Ok(Submitted {
                    tx_id: receipt.tx_id,
                    payload: receipt.payload,
                })
            }
            Err(e) => {
                warn!(identity, %function, error = %e, "submission failed");
                Err(e)
            }
        }
    }

    fn public_identity(&self) -> &str {
        &self.config.public_identity
    }
}
