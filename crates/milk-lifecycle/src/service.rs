use std::sync::Arc;

use milk_gateway::LedgerGateway;
use milk_types::{
    ApproveRequest, CreateBatchRequest, LabResultRequest, ProcessRequest, ShipRequest,
    TransportRequest,
};
use tracing::{debug, error};

use crate::catalog::LedgerCall;
use crate::error::{LifecycleError, LifecycleResult, PublicViewError};
use crate::view::{PublicView, PublicViewBuilder};

/// Result of a committed state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_id: String,
    pub payload: String,
}

/// Business-facing batch operations.
///
/// Every method validates its request, builds the positional call and
/// hands it to the injected gateway under the caller's identity.
#[derive(Clone)]
pub struct BatchService {
    gateway: Arc<dyn LedgerGateway>,
}

fn decode(bytes: Vec<u8>) -> LifecycleResult<String> {
    String::from_utf8(bytes)
        .map_err(|e| LifecycleError::MalformedLedgerPayload(format!("payload is not UTF-8: {e}")))
}

impl BatchService {
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        Self { gateway }
    }

    async fn evaluate(&self, identity: &str, call: LedgerCall) -> LifecycleResult<String> {
        debug!(identity, function = %call.function, "evaluate");
        let bytes = self
            .gateway
            .evaluate(identity, call.function, &call.args)
            .await?;
        decode(bytes)
    }

    async fn submit(&self, identity: &str, call: LedgerCall) -> LifecycleResult<TxOutcome> {
        debug!(identity, function = %call.function, args = call.args.len(), "submit");
        let submitted = self
            .gateway
            .submit(identity, call.function, &call.args)
            .await?;
        Ok(TxOutcome {
            tx_id: submitted.tx_id,
            payload: decode(submitted.payload)?,
        })
    }

    pub async fn create_batch(
        &self,
        identity: &str,
        req: &CreateBatchRequest,
    ) -> LifecycleResult<TxOutcome> {
        self.submit(identity, LedgerCall::create(req)?).await
    }

    pub async fn read_batch(&self, identity: &str, batch_id: &str) -> LifecycleResult<String> {
        self.evaluate(identity, LedgerCall::read(batch_id)?).await
    }

    pub async fn get_all_batches(&self, identity: &str) -> LifecycleResult<String> {
        self.evaluate(identity, LedgerCall::list_all()).await
    }

    pub async fn get_history(&self, identity: &str, batch_id: &str) -> LifecycleResult<String> {
        self.evaluate(identity, LedgerCall::history(batch_id)?).await
    }

    pub async fn add_transport_event(
        &self,
        identity: &str,
        req: &TransportRequest,
    ) -> LifecycleResult<TxOutcome> {
        self.submit(identity, LedgerCall::transport(req)?).await
    }

    pub async fn add_lab_result(
        &self,
        identity: &str,
        req: &LabResultRequest,
    ) -> LifecycleResult<TxOutcome> {
        self.submit(identity, LedgerCall::lab_result(req)?).await
    }

    pub async fn approve_batch(
        &self,
        identity: &str,
        req: &ApproveRequest,
    ) -> LifecycleResult<TxOutcome> {
        self.submit(identity, LedgerCall::approve(req)?).await
    }

    pub async fn process_batch(
        &self,
        identity: &str,
        req: &ProcessRequest,
    ) -> LifecycleResult<TxOutcome> {
        self.submit(identity, LedgerCall::process(req)?).await
    }

    pub async fn ship_to_retail(
        &self,
        identity: &str,
        req: &ShipRequest,
    ) -> LifecycleResult<TxOutcome> {
        self.submit(identity, LedgerCall::ship(req)?).await
    }

    pub async fn receive_at_retail(
        &self,
        identity: &str,
        batch_id: &str,
    ) -> LifecycleResult<TxOutcome> {
        self.submit(identity, LedgerCall::receive(batch_id)?).await
    }

    /// Read and history under the public identity, folded into the
    /// redacted view. Failures other than not-found are logged and
    /// reported as [`PublicViewError::Internal`].
    pub async fn public_view(&self, batch_id: &str) -> Result<PublicView, PublicViewError> {
        if batch_id.trim().is_empty() {
            return Err(PublicViewError::NotFound(batch_id.to_string()));
        }
        let identity = self.gateway.public_identity().to_string();
        let (batch, history) = tokio::join!(
            self.read_batch(&identity, batch_id),
            self.get_history(&identity, batch_id),
        );
        // A missing batch wins over whatever the other read reported.
        let missing = |r: &LifecycleResult<_>| matches!(r, Err(e) if e.is_not_found());
        if missing(&batch) || missing(&history) {
            return Err(PublicViewError::NotFound(batch_id.to_string()));
        }
        let result = batch.and_then(|batch| PublicViewBuilder::build(&batch, &history?));

        result.map_err(|e| {
            if e.is_not_found() {
                PublicViewError::NotFound(batch_id.to_string())
            } else {
                error!(batch_id, error = %e, "public view failed");
                PublicViewError::Internal
            }
        })
    }
}
