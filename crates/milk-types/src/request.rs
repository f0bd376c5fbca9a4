//! Typed operation requests accepted by the lifecycle service.
//!
//! Each request validates itself before any ledger contact.

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::lab::LabResult;
use crate::processing::ProcessingType;

fn require_batch_id(batch_id: &str) -> Result<(), TypeError> {
    require_non_blank("batchId", batch_id)
}

fn require_non_blank(field: &str, value: &str) -> Result<(), TypeError> {
    if value.trim().is_empty() {
        return Err(TypeError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_positive(field: &str, value: f64) -> Result<(), TypeError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TypeError::validation(format!(
            "{field} must be a positive number"
        )));
    }
    Ok(())
}

fn require_finite(field: &str, value: Option<f64>) -> Result<(), TypeError> {
    match value {
        Some(v) if !v.is_finite() => Err(TypeError::validation(format!(
            "{field} must be a finite number"
        ))),
        _ => Ok(()),
    }
}

/// Register a newly collected batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchRequest {
    pub batch_id: String,
    pub farm_id: String,
    pub volume_liters: f64,
    #[serde(default)]
    pub last_farm_temp_c: Option<f64>,
}

impl CreateBatchRequest {
    pub fn validate(&self) -> Result<(), TypeError> {
        require_batch_id(&self.batch_id)?;
        require_non_blank("farmId", &self.farm_id)?;
        require_positive("volumeLiters", self.volume_liters)?;
        require_finite("lastFarmTempC", self.last_farm_temp_c)
    }
}

/// Record a movement between two locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRequest {
    pub batch_id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub volume_liters: Option<f64>,
}

impl TransportRequest {
    pub fn validate(&self) -> Result<(), TypeError> {
        require_batch_id(&self.batch_id)?;
        require_non_blank("from", &self.from)?;
        require_non_blank("to", &self.to)?;
        require_finite("temperatureC", self.temperature_c)?;
        if let Some(volume) = self.volume_liters {
            if self.temperature_c.is_none() {
                return Err(TypeError::validation(
                    "volumeLiters requires temperatureC on a transport event: ledger \
                     arguments are positional, so a volume sent alone would be \
                     recorded as the temperature",
                ));
            }
            require_positive("volumeLiters", volume)?;
        }
        Ok(())
    }
}

/// Append a lab result to a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResultRequest {
    pub batch_id: String,
    pub result: LabResult,
}

impl LabResultRequest {
    pub fn validate(&self) -> Result<(), TypeError> {
        require_batch_id(&self.batch_id)?;
        self.result.validate()
    }
}

/// Set or flip the approval flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub batch_id: String,
    pub approved: bool,
}

impl ApproveRequest {
    pub fn validate(&self) -> Result<(), TypeError> {
        require_batch_id(&self.batch_id)
    }
}

/// Record industrial processing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub batch_id: String,
    pub processing_type: ProcessingType,
    /// RFC 3339 expiry timestamp, forwarded verbatim.
    #[serde(rename = "expiresAtISO")]
    pub expires_at_iso: String,
}

impl ProcessRequest {
    pub fn validate(&self) -> Result<(), TypeError> {
        require_batch_id(&self.batch_id)?;
        chrono::DateTime::parse_from_rfc3339(&self.expires_at_iso).map_err(|e| {
            TypeError::validation(format!("expiresAtISO is not an RFC 3339 timestamp: {e}"))
        })?;
        Ok(())
    }
}

/// Hand a processed batch to a retailer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipRequest {
    pub batch_id: String,
    pub retailer_id: String,
    #[serde(default)]
    pub temperature_c: Option<f64>,
}

impl ShipRequest {
    pub fn validate(&self) -> Result<(), TypeError> {
        require_batch_id(&self.batch_id)?;
        require_non_blank("retailerId", &self.retailer_id)?;
        require_finite("temperatureC", self.temperature_c)
    }
}
