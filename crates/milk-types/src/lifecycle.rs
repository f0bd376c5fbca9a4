use std::fmt;

use serde::{Deserialize, Serialize};

use crate::function::LedgerFunction;

/// Where a batch stands in its life.
///
/// ```text
/// Collected ⇄ Approved ⇄ Rejected      (ApproveBatch, repeatable)
/// Approved  → Processed               (ProcessBatch)
/// Processed → Shipped                 (ShipToRetail)
/// Shipped   → Received                (ReceiveAtRetail)
/// ```
///
/// The gateway never gates calls on this table. It documents the ordering
/// the chaincode enforces, and the simulated network applies it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStage {
    Collected,
    Approved,
    Rejected,
    Processed,
    Shipped,
    Received,
}

impl LifecycleStage {
    /// Whether `function` may be applied to a batch at this stage.
    pub fn permits(&self, function: LedgerFunction) -> bool {
        use LedgerFunction::*;
        match function {
            CreateBatch => false,
            ReadBatch | GetAllBatches | GetHistory => true,
            AddTransportEvent | AddLabResult => *self != Self::Received,
            ApproveBatch => matches!(self, Self::Collected | Self::Approved | Self::Rejected),
            ProcessBatch => *self == Self::Approved,
            ShipToRetail => *self == Self::Processed,
            ReceiveAtRetail => *self == Self::Shipped,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collected => "COLLECTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Processed => "PROCESSED",
            Self::Shipped => "SHIPPED",
            Self::Received => "RECEIVED",
        }
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::LedgerFunction::*;

    #[test]
    fn approval_can_flip_before_processing() {
        for stage in [
            LifecycleStage::Collected,
            LifecycleStage::Approved,
            LifecycleStage::Rejected,
        ] {
            assert!(stage.permits(ApproveBatch), "{stage}");
        }
        assert!(!LifecycleStage::Processed.permits(ApproveBatch));
    }

    #[test]
    fn processing_requires_approval() {
        assert!(LifecycleStage::Approved.permits(ProcessBatch));
        assert!(!LifecycleStage::Collected.permits(ProcessBatch));
        assert!(!LifecycleStage::Rejected.permits(ProcessBatch));
    }

    #[test]
    fn retail_steps_are_sequential() {
        assert!(!LifecycleStage::Approved.permits(ShipToRetail));
        assert!(LifecycleStage::Processed.permits(ShipToRetail));
        assert!(!LifecycleStage::Processed.permits(ReceiveAtRetail));
        assert!(LifecycleStage::Shipped.permits(ReceiveAtRetail));
    }

    #[test]
    fn received_batches_accept_no_more_events() {
        assert!(!LifecycleStage::Received.permits(AddLabResult));
        assert!(!LifecycleStage::Received.permits(AddTransportEvent));
        assert!(LifecycleStage::Received.permits(GetHistory));
    }

    #[test]
    fn events_accumulate_in_any_earlier_stage() {
        for stage in [
            LifecycleStage::Collected,
            LifecycleStage::Approved,
            LifecycleStage::Processed,
            LifecycleStage::Shipped,
        ] {
            assert!(stage.permits(AddLabResult));
            assert!(stage.permits(AddTransportEvent));
        }
    }
}
