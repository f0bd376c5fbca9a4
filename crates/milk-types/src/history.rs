use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// One state transition record returned by `GetHistory`.
///
/// `value` is the batch as it stood after the transaction, or `null` for
/// deletions. It is kept opaque; the ledger decides its shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub tx_id: String,
    pub timestamp: String,
    #[serde(default)]
    pub is_delete: bool,
    #[serde(default)]
    pub value: Value,
}

impl HistoryEntry {
    /// Parse a raw `GetHistory` payload, preserving ledger commit order.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, TypeError> {
        serde_json::from_str(raw).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_in_ledger_order() {
        let raw = r#"[
            {"txId":"b","timestamp":"2025-01-02T00:00:00Z","isDelete":false,"value":{"batchId":"B1"}},
            {"txId":"a","timestamp":"2025-01-01T00:00:00Z","isDelete":false,"value":{"batchId":"B1"}}
        ]"#;
        let entries = HistoryEntry::parse_list(raw).unwrap();
        assert_eq!(entries.len(), 2);
        // Commit order, not timestamp order.
        assert_eq!(entries[0].tx_id, "b");
        assert_eq!(entries[1].tx_id, "a");
    }

    #[test]
    fn object_instead_of_list_fails() {
        assert!(HistoryEntry::parse_list(r#"{"txId":"a"}"#).is_err());
    }

    #[test]
    fn missing_value_is_null() {
        let entries =
            HistoryEntry::parse_list(r#"[{"txId":"a","timestamp":"t","isDelete":true}]"#).unwrap();
        assert!(entries[0].value.is_null());
        assert!(entries[0].is_delete);
    }
}
