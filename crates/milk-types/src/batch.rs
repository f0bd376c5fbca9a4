use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::lab::LabResult;
use crate::lifecycle::LifecycleStage;
use crate::processing::ProcessingType;

/// Movement of a batch between two named locations. Append-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportEvent {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_liters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Industrial processing metadata recorded by `ProcessBatch`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingInfo {
    #[serde(rename = "type")]
    pub processing_type: ProcessingType,
    pub processed_at: String,
    pub expires_at: String,
}

/// Retail handoff metadata recorded by `ShipToRetail`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentInfo {
    pub retailer_id: String,
    pub shipped_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
}

/// Batch state as returned by `ReadBatch`.
///
/// The ledger owns this schema. Required fields must be present with the
/// right type or parsing fails; fields this crate does not know about are
/// ignored so the chaincode can grow the record without breaking readers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    pub batch_id: String,
    #[serde(alias = "producerId")]
    pub farm_id: String,
    pub volume_liters: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_farm_temp_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<String>,
    #[serde(default)]
    pub transport_events: Vec<TransportEvent>,
    #[serde(default)]
    pub lab_results: Vec<LabResult>,
    /// Tri-state: `None` until the first `ApproveBatch`.
    #[serde(default)]
    pub approved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing: Option<ProcessingInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment: Option<ShipmentInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<String>,
}

impl BatchRecord {
    /// Parse a raw `ReadBatch` payload.
    pub fn from_json(raw: &str) -> Result<Self, TypeError> {
        serde_json::from_str(raw).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// The most recent lab result in ledger-return order.
    pub fn latest_lab_result(&self) -> Option<&LabResult> {
        self.lab_results.last()
    }

    /// Stage derived from which lifecycle fields are populated.
    pub fn stage(&self) -> LifecycleStage {
        if self.received_at.is_some() {
            LifecycleStage::Received
        } else if self.shipment.is_some() {
            LifecycleStage::Shipped
        } else if self.processing.is_some() {
            LifecycleStage::Processed
        } else {
            match self.approved {
                Some(true) => LifecycleStage::Approved,
                Some(false) => LifecycleStage::Rejected,
                None => LifecycleStage::Collected,
            }
        }
    }
}
