//! Batch contract logic for the simulated network.
//!
//! Mirrors the function catalog the real chaincode exposes, including its
//! lifecycle ordering rules and error wording, so the gateway can be
//! exercised end to end without a ledger.

use std::collections::BTreeMap;

use milk_types::{
    BatchRecord, HistoryEntry, LabResult, LedgerFunction, ProcessingInfo, ProcessingType,
    ShipmentInfo, TransportEvent,
};

type ContractResult = Result<Vec<u8>, String>;

fn arity(function: LedgerFunction, args: &[String], min: usize, max: usize) -> Result<(), String> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{min} to {max}")
        };
        return Err(format!(
            "incorrect number of arguments for {function}: expected {expected}, got {}",
            args.len()
        ));
    }
    Ok(())
}

fn number(field: &str, raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{field} must be a number, got {raw:?}"))
}

fn optional_number(field: &str, raw: Option<&String>) -> Result<Option<f64>, String> {
    raw.map(|r| number(field, r)).transpose()
}

fn encode<T: serde::Serialize>(value: &T) -> ContractResult {
    serde_json::to_vec(value).map_err(|e| format!("failed to encode state: {e}"))
}

/// World state plus per-key history, as the chaincode sees it.
#[derive(Default)]
pub(crate) struct LedgerState {
    batches: BTreeMap<String, BatchRecord>,
    history: BTreeMap<String, Vec<HistoryEntry>>,
}

impl LedgerState {
    pub(crate) fn batch_count(&self) -> usize {
        self.batches.len()
    }

    fn existing(&self, batch_id: &str) -> Result<&BatchRecord, String> {
        self.batches
            .get(batch_id)
            .ok_or_else(|| format!("the batch {batch_id} does not exist"))
    }

    /// Copy of a batch that `function` is allowed to modify.
    fn for_update(&self, function: LedgerFunction, batch_id: &str) -> Result<BatchRecord, String> {
        let batch = self.existing(batch_id)?;
        let stage = batch.stage();
        if !stage.permits(function) {
            return Err(format!(
                "{function} is not permitted for batch {batch_id} in stage {stage}"
            ));
        }
        Ok(batch.clone())
    }

    fn commit(&mut self, batch: BatchRecord, tx_id: &str, timestamp: &str) -> ContractResult {
        let value = serde_json::to_value(&batch).map_err(|e| format!("failed to encode state: {e}"))?;
        self.history
            .entry(batch.batch_id.clone())
            .or_default()
            .push(HistoryEntry {
                tx_id: tx_id.to_string(),
                timestamp: timestamp.to_string(),
                is_delete: false,
                value,
            });
        let payload = encode(&batch)?;
        self.batches.insert(batch.batch_id.clone(), batch);
        Ok(payload)
    }

    /// Run a read-only function.
    pub(crate) fn query(&self, function: LedgerFunction, args: &[String]) -> ContractResult {
        match function {
            LedgerFunction::ReadBatch => {
                arity(function, args, 1, 1)?;
                encode(self.existing(&args[0])?)
            }
            LedgerFunction::GetAllBatches => {
                arity(function, args, 0, 0)?;
                encode(&self.batches.values().collect::<Vec<_>>())
            }
            LedgerFunction::GetHistory => {
                arity(function, args, 1, 1)?;
                self.existing(&args[0])?;
                encode(&self.history.get(&args[0]).cloned().unwrap_or_default())
            }
            other => Err(format!("{other} changes state and must be submitted")),
        }
    }

    /// Run any function as a committed transaction.
    pub(crate) fn execute(
        &mut self,
        function: LedgerFunction,
        args: &[String],
        tx_id: &str,
        timestamp: &str,
    ) -> ContractResult {
        if !function.is_mutating() {
            return self.query(function, args);
        }
        match function {
            LedgerFunction::CreateBatch => {
                arity(function, args, 3, 4)?;
                let batch_id = &args[0];
                if self.batches.contains_key(batch_id) {
                    return Err(format!("the batch {batch_id} already exists"));
                }
                let batch = BatchRecord {
                    batch_id: batch_id.clone(),
                    farm_id: args[1].clone(),
                    volume_liters: number("volumeLiters", &args[2])?,
                    last_farm_temp_c: optional_number("lastFarmTempC", args.get(3))?,
                    collected_at: Some(timestamp.to_string()),
                    transport_events: Vec::new(),
                    lab_results: Vec::new(),
                    approved: None,
                    processing: None,
                    shipment: None,
                    received_at: None,
                };
                self.commit(batch, tx_id, timestamp)
            }
            LedgerFunction::AddTransportEvent => {
                arity(function, args, 3, 5)?;
                let mut batch = self.for_update(function, &args[0])?;
                batch.transport_events.push(TransportEvent {
                    from: args[1].clone(),
                    to: args[2].clone(),
                    temperature_c: optional_number("temperatureC", args.get(3))?,
                    volume_liters: optional_number("volumeLiters", args.get(4))?,
                    timestamp: Some(timestamp.to_string()),
                });
                self.commit(batch, tx_id, timestamp)
            }
            LedgerFunction::AddLabResult => {
                arity(function, args, 2, 2)?;
                let mut batch = self.for_update(function, &args[0])?;
                let result = LabResult::from_payload(&args[1])
                    .map_err(|e| format!("invalid lab result payload: {e}"))?;
                batch.lab_results.push(result);
                self.commit(batch, tx_id, timestamp)
            }
            LedgerFunction::ApproveBatch => {
                arity(function, args, 2, 2)?;
                let mut batch = self.for_update(function, &args[0])?;
                batch.approved = Some(match args[1].as_str() {
                    "true" => true,
                    "false" => false,
                    other => {
                        return Err(format!("approved must be \"true\" or \"false\", got {other:?}"))
                    }
                });
                self.commit(batch, tx_id, timestamp)
            }
            LedgerFunction::ProcessBatch => {
                arity(function, args, 3, 3)?;
                let processing_type: ProcessingType =
                    args[1].parse().map_err(|e: milk_types::TypeError| e.to_string())?;
                chrono::DateTime::parse_from_rfc3339(&args[2])
                    .map_err(|e| format!("expiresAt is not a valid timestamp: {e}"))?;
                let mut batch = self.for_update(function, &args[0])?;
                batch.processing = Some(ProcessingInfo {
                    processing_type,
                    processed_at: timestamp.to_string(),
                    expires_at: args[2].clone(),
                });
                self.commit(batch, tx_id, timestamp)
            }
            LedgerFunction::ShipToRetail => {
                arity(function, args, 2, 3)?;
                let mut batch = self.for_update(function, &args[0])?;
                batch.shipment = Some(ShipmentInfo {
                    retailer_id: args[1].clone(),
                    shipped_at: timestamp.to_string(),
                    temperature_c: optional_number("temperatureC", args.get(2))?,
                });
                self.commit(batch, tx_id, timestamp)
            }
            LedgerFunction::ReceiveAtRetail => {
                arity(function, args, 1, 1)?;
                let mut batch = self.for_update(function, &args[0])?;
                batch.received_at = Some(timestamp.to_string());
                self.commit(batch, tx_id, timestamp)
            }
            LedgerFunction::ReadBatch | LedgerFunction::GetAllBatches | LedgerFunction::GetHistory => {
                self.query(function, args)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milk_types::LifecycleStage;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    struct Harness {
        state: LedgerState,
        seq: u32,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                state: LedgerState::default(),
                seq: 0,
            }
        }

        fn submit(&mut self, function: LedgerFunction, a: &[&str]) -> Result<BatchRecord, String> {
            self.seq += 1;
            let ts = format!("2025-01-01T00:00:{:02}Z", self.seq);
            let bytes = self
                .state
                .execute(function, &args(a), &format!("tx{}", self.seq), &ts)?;
            Ok(serde_json::from_slice(&bytes).unwrap())
        }
    }

    #[test]
    fn create_then_read() {
        let mut h = Harness::new();
        let created = h.submit(LedgerFunction::CreateBatch, &["B1", "F1", "100"]).unwrap();
        assert_eq!(created.volume_liters, 100.0);
        assert_eq!(created.last_farm_temp_c, None);

        let raw = h.state.query(LedgerFunction::ReadBatch, &args(&["B1"])).unwrap();
        let read = BatchRecord::from_json(std::str::from_utf8(&raw).unwrap()).unwrap();
        assert_eq!(read, created);
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let mut h = Harness::new();
        h.submit(LedgerFunction::CreateBatch, &["B1", "F1", "100"]).unwrap();
        let err = h.submit(LedgerFunction::CreateBatch, &["B1", "F2", "5"]).unwrap_err();
        assert_eq!(err, "the batch B1 already exists");
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let mut h = Harness::new();
        let err = h.submit(LedgerFunction::CreateBatch, &["B1", "F1"]).unwrap_err();
        assert!(err.contains("expected 3 to 4, got 2"));
    }

    #[test]
    fn ordering_is_enforced() {
        let mut h = Harness::new();
        h.submit(LedgerFunction::CreateBatch, &["B1", "F1", "100"]).unwrap();

        let err = h.submit(LedgerFunction::ShipToRetail, &["B1", "R1"]).unwrap_err();
        assert!(err.contains("not permitted"), "{err}");

        let err = h
            .submit(LedgerFunction::ProcessBatch, &["B1", "UHT", "2026-01-01T00:00:00Z"])
            .unwrap_err();
        assert!(err.contains("stage COLLECTED"), "{err}");

        h.submit(LedgerFunction::ApproveBatch, &["B1", "true"]).unwrap();
        h.submit(LedgerFunction::ProcessBatch, &["B1", "UHT", "2026-01-01T00:00:00Z"])
            .unwrap();
        h.submit(LedgerFunction::ShipToRetail, &["B1", "R1", "4.5"]).unwrap();
        let done = h.submit(LedgerFunction::ReceiveAtRetail, &["B1"]).unwrap();
        assert_eq!(done.stage(), LifecycleStage::Received);
        assert_eq!(done.shipment.unwrap().temperature_c, Some(4.5));
    }

    #[test]
    fn approval_flag_must_be_literal() {
        let mut h = Harness::new();
        h.submit(LedgerFunction::CreateBatch, &["B1", "F1", "100"]).unwrap();
        assert!(h.submit(LedgerFunction::ApproveBatch, &["B1", "TRUE"]).is_err());
        let b = h.submit(LedgerFunction::ApproveBatch, &["B1", "false"]).unwrap();
        assert_eq!(b.approved, Some(false));
        let b = h.submit(LedgerFunction::ApproveBatch, &["B1", "true"]).unwrap();
        assert_eq!(b.approved, Some(true));
    }

    #[test]
    fn history_is_in_commit_order() {
        let mut h = Harness::new();
        h.submit(LedgerFunction::CreateBatch, &["B1", "F1", "100"]).unwrap();
        h.submit(LedgerFunction::AddTransportEvent, &["B1", "farm", "dairy", "3.5"])
            .unwrap();
        h.submit(
            LedgerFunction::AddLabResult,
            &["B1", r#"{"antibiotics":false,"fraudFlags":[]}"#],
        )
        .unwrap();

        let raw = h.state.query(LedgerFunction::GetHistory, &args(&["B1"])).unwrap();
        let entries = HistoryEntry::parse_list(std::str::from_utf8(&raw).unwrap()).unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.tx_id.as_str()).collect();
        assert_eq!(ids, vec!["tx1", "tx2", "tx3"]);
    }

    #[test]
    fn malformed_lab_payload_is_rejected() {
        let mut h = Harness::new();
        h.submit(LedgerFunction::CreateBatch, &["B1", "F1", "100"]).unwrap();
        let err = h
            .submit(LedgerFunction::AddLabResult, &["B1", r#"{"antibiotics":"maybe"}"#])
            .unwrap_err();
        assert!(err.starts_with("invalid lab result payload"));
    }

    #[test]
    fn missing_batch_reads_as_does_not_exist() {
        let h = Harness::new();
        let err = h.state.query(LedgerFunction::ReadBatch, &args(&["B9"])).unwrap_err();
        assert_eq!(err, "the batch B9 does not exist");
        let err = h.state.query(LedgerFunction::GetHistory, &args(&["B9"])).unwrap_err();
        assert_eq!(err, "the batch B9 does not exist");
    }

    #[test]
    fn mutating_function_cannot_be_queried() {
        let h = Harness::new();
        let err = h
            .state
            .query(LedgerFunction::ApproveBatch, &args(&["B1", "true"]))
            .unwrap_err();
        assert!(err.contains("must be submitted"));
    }
}
