//! Public view derivation.
//!
//! A pure transformation from the raw `ReadBatch` and `GetHistory` payloads
//! into the summary shown to anonymous consumers.

use milk_types::{BatchRecord, HistoryEntry, ProcessingInfo};
use serde::{Deserialize, Serialize};

use crate::error::{LifecycleError, LifecycleResult};

pub const NOTE_NO_ANALYSIS: &str = "Nenhuma análise laboratorial registrada.";
pub const NOTE_IRREGULAR: &str = "Irregularidades detectadas na última análise laboratorial.";
pub const NOTE_CLEAN: &str = "Nenhuma irregularidade detectada na última análise laboratorial.";

/// Consumer-facing quality status, derived from the approval flag alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityStatus {
    Aprovado,
    Reprovado,
    EmAnalise,
}

impl QualityStatus {
    pub fn from_approval(approved: Option<bool>) -> Self {
        match approved {
            Some(true) => Self::Aprovado,
            Some(false) => Self::Reprovado,
            None => Self::EmAnalise,
        }
    }
}

/// Redacted batch summary. Volumes, temperatures and lab measurements
/// never appear here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicView {
    pub batch_id: String,
    pub producer_id: String,
    pub collected_at: Option<String>,
    pub processing: Option<ProcessingInfo>,
    pub quality_status: QualityStatus,
    pub quality_note: String,
    pub history: Vec<HistoryEntry>,
}

pub struct PublicViewBuilder;

impl PublicViewBuilder {
    /// Parse both payloads and derive the view. Any shape mismatch fails
    /// with [`LifecycleError::MalformedLedgerPayload`].
    pub fn build(raw_batch: &str, raw_history: &str) -> LifecycleResult<PublicView> {
        let batch = BatchRecord::from_json(raw_batch)
            .map_err(|e| LifecycleError::MalformedLedgerPayload(format!("batch: {e}")))?;
        let history = HistoryEntry::parse_list(raw_history)
            .map_err(|e| LifecycleError::MalformedLedgerPayload(format!("history: {e}")))?;
        Ok(Self::from_parts(batch, history))
    }

    pub fn from_parts(batch: BatchRecord, history: Vec<HistoryEntry>) -> PublicView {
        let quality_note = match batch.latest_lab_result() {
            None => NOTE_NO_ANALYSIS,
            Some(latest) if latest.has_issue() => NOTE_IRREGULAR,
            Some(_) => NOTE_CLEAN,
        };
        PublicView {
            quality_status: QualityStatus::from_approval(batch.approved),
            quality_note: quality_note.to_string(),
            batch_id: batch.batch_id,
            producer_id: batch.farm_id,
            collected_at: batch.collected_at,
            processing: batch.processing,
            history,
        }
    }
}
