use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A chaincode function the gateway knows how to invoke.
///
/// The string form is the exact name the ledger dispatches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerFunction {
    CreateBatch,
    ReadBatch,
    GetAllBatches,
    GetHistory,
    AddTransportEvent,
    AddLabResult,
    ApproveBatch,
    ProcessBatch,
    ShipToRetail,
    ReceiveAtRetail,
}

impl LedgerFunction {
    /// Every function in catalog order.
    pub const ALL: [LedgerFunction; 10] = [
        Self::CreateBatch,
        Self::ReadBatch,
        Self::GetAllBatches,
        Self::GetHistory,
        Self::AddTransportEvent,
        Self::AddLabResult,
        Self::ApproveBatch,
        Self::ProcessBatch,
        Self::ShipToRetail,
        Self::ReceiveAtRetail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateBatch => "CreateBatch",
            Self::ReadBatch => "ReadBatch",
            Self::GetAllBatches => "GetAllBatches",
            Self::GetHistory => "GetHistory",
            Self::AddTransportEvent => "AddTransportEvent",
            Self::AddLabResult => "AddLabResult",
            Self::ApproveBatch => "ApproveBatch",
            Self::ProcessBatch => "ProcessBatch",
            Self::ShipToRetail => "ShipToRetail",
            Self::ReceiveAtRetail => "ReceiveAtRetail",
        }
    }

    /// Returns `true` for functions that change ledger state and must be
    /// submitted rather than evaluated.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::ReadBatch | Self::GetAllBatches | Self::GetHistory
        )
    }
}

impl fmt::Display for LedgerFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerFunction {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| TypeError::UnknownFunction(s.to_string()))
    }
}
