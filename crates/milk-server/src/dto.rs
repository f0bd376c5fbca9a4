//! Request and response bodies. Path segments carry the batch id, so
//! bodies for per-batch routes omit it.

use milk_lifecycle::TxOutcome;
use milk_types::{
    ApproveRequest, LabResult, LabResultRequest, ProcessRequest, ShipRequest, TransportRequest,
    TypeError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportBody {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub volume_liters: Option<f64>,
}

impl TransportBody {
    pub fn into_request(self, batch_id: String) -> TransportRequest {
        TransportRequest {
            batch_id,
            from: self.from,
            to: self.to,
            temperature_c: self.temperature_c,
            volume_liters: self.volume_liters,
        }
    }
}

/// The lab result is the body itself.
pub fn lab_request(batch_id: String, result: LabResult) -> LabResultRequest {
    LabResultRequest { batch_id, result }
}

#[derive(Debug, Deserialize)]
pub struct ApproveBody {
    pub approved: bool,
}

impl ApproveBody {
    pub fn into_request(self, batch_id: String) -> ApproveRequest {
        ApproveRequest {
            batch_id,
            approved: self.approved,
        }
    }
}

/// `processingType` stays a string here so an unknown value is reported
/// as a validation failure rather than a body parse error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessBody {
    pub processing_type: String,
    #[serde(rename = "expiresAtISO")]
    pub expires_at_iso: String,
}

impl ProcessBody {
    pub fn into_request(self, batch_id: String) -> Result<ProcessRequest, TypeError> {
        Ok(ProcessRequest {
            batch_id,
            processing_type: self.processing_type.parse()?,
            expires_at_iso: self.expires_at_iso,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipBody {
    pub retailer_id: String,
    #[serde(default)]
    pub temperature_c: Option<f64>,
}

impl ShipBody {
    pub fn into_request(self, batch_id: String) -> ShipRequest {
        ShipRequest {
            batch_id,
            retailer_id: self.retailer_id,
            temperature_c: self.temperature_c,
        }
    }
}

/// Success envelope for every ledger-backed route.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    pub payload: Value,
}

/// JSON payloads are embedded as JSON; anything else as a string.
fn payload_value(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

impl LedgerResponse {
    pub fn read(raw: String) -> Self {
        Self {
            ok: true,
            tx_id: None,
            payload: payload_value(raw),
        }
    }

    pub fn tx(outcome: TxOutcome) -> Self {
        Self {
            ok: true,
            tx_id: Some(outcome.tx_id),
            payload: payload_value(outcome.payload),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
