//! The operation catalog: one typed request in, one positional call out.
//!
//! Argument order is fixed per function. Optional values are appended only
//! when present and never padded, because the chaincode decodes arguments
//! by position.

use milk_types::{
    canonical_bool, canonical_decimal, ApproveRequest, CreateBatchRequest, LabResultRequest,
    LedgerFunction, ProcessRequest, ShipRequest, TransportRequest, TypeError,
};

/// A ledger function together with its rendered string arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerCall {
    pub function: LedgerFunction,
    pub args: Vec<String>,
}

fn batch_id(id: &str) -> Result<String, TypeError> {
    if id.trim().is_empty() {
        return Err(TypeError::validation("batchId must not be empty"));
    }
    Ok(id.to_string())
}

impl LedgerCall {
    fn new(function: LedgerFunction, args: Vec<String>) -> Self {
        Self { function, args }
    }

    pub fn create(req: &CreateBatchRequest) -> Result<Self, TypeError> {
        req.validate()?;
        let mut args = vec![
            req.batch_id.clone(),
            req.farm_id.clone(),
            canonical_decimal(req.volume_liters),
        ];
        if let Some(temp) = req.last_farm_temp_c {
            args.push(canonical_decimal(temp));
        }
        Ok(Self::new(LedgerFunction::CreateBatch, args))
    }

    pub fn read(id: &str) -> Result<Self, TypeError> {
        Ok(Self::new(LedgerFunction::ReadBatch, vec![batch_id(id)?]))
    }

    pub fn list_all() -> Self {
        Self::new(LedgerFunction::GetAllBatches, Vec::new())
    }

    pub fn history(id: &str) -> Result<Self, TypeError> {
        Ok(Self::new(LedgerFunction::GetHistory, vec![batch_id(id)?]))
    }

    pub fn transport(req: &TransportRequest) -> Result<Self, TypeError> {
        req.validate()?;
        let mut args = vec![req.batch_id.clone(), req.from.clone(), req.to.clone()];
        if let Some(temp) = req.temperature_c {
            args.push(canonical_decimal(temp));
        }
        if let Some(volume) = req.volume_liters {
            args.push(canonical_decimal(volume));
        }
        Ok(Self::new(LedgerFunction::AddTransportEvent, args))
    }

    pub fn lab_result(req: &LabResultRequest) -> Result<Self, TypeError> {
        req.validate()?;
        Ok(Self::new(
            LedgerFunction::AddLabResult,
            vec![req.batch_id.clone(), req.result.to_payload()?],
        ))
    }

    pub fn approve(req: &ApproveRequest) -> Result<Self, TypeError> {
        req.validate()?;
        Ok(Self::new(
            LedgerFunction::ApproveBatch,
            vec![req.batch_id.clone(), canonical_bool(req.approved)],
        ))
    }

    pub fn process(req: &ProcessRequest) -> Result<Self, TypeError> {
        req.validate()?;
        Ok(Self::new(
            LedgerFunction::ProcessBatch,
            vec![
                req.batch_id.clone(),
                req.processing_type.to_string(),
                req.expires_at_iso.clone(),
            ],
        ))
    }

    pub fn ship(req: &ShipRequest) -> Result<Self, TypeError> {
        req.validate()?;
        let mut args = vec![req.batch_id.clone(), req.retailer_id.clone()];
        if let Some(temp) = req.temperature_c {
            args.push(canonical_decimal(temp));
        }
        Ok(Self::new(LedgerFunction::ShipToRetail, args))
    }

    pub fn receive(id: &str) -> Result<Self, TypeError> {
        Ok(Self::new(LedgerFunction::ReceiveAtRetail, vec![batch_id(id)?]))
    }
}
