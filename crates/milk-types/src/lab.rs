use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A quality measurement set produced by a lab for one batch.
///
/// Sent to the ledger as a single JSON string argument. Absent measurements
/// are omitted rather than written as `null`, so `to_payload` followed by
/// `from_payload` reproduces the value exactly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LabResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turbidity: Option<f64>,
    /// Somatic cells per millilitre.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub somatic_cell_count: Option<u64>,
    /// Titratable acidity in degrees Dornic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acidity: Option<f64>,
    /// Density in g/mL at 15 °C.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    pub antibiotics: bool,
    #[serde(default)]
    pub fraud_flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<String>,
}

impl LabResult {
    /// A clean result: no antibiotics, no fraud flags, no measurements.
    pub fn clean() -> Self {
        Self::default()
    }

    /// Returns `true` if this result should be surfaced as an irregularity.
    pub fn has_issue(&self) -> bool {
        self.antibiotics || !self.fraud_flags.is_empty()
    }

    /// Serialize to the single string argument `AddLabResult` expects.
    pub fn to_payload(&self) -> Result<String, TypeError> {
        serde_json::to_string(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Parse a payload previously produced by [`Self::to_payload`].
    pub fn from_payload(payload: &str) -> Result<Self, TypeError> {
        serde_json::from_str(payload).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Reject measurements that cannot be represented in JSON.
    pub fn validate(&self) -> Result<(), TypeError> {
        for (name, value) in [
            ("turbidity", self.turbidity),
            ("acidity", self.acidity),
            ("density", self.density),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(TypeError::validation(format!("{name} must be finite")));
                }
            }
        }
        if self.fraud_flags.iter().any(|f| f.trim().is_empty()) {
            return Err(TypeError::validation("fraud flags must not be blank"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clean_result_has_no_issue() {
        assert!(!LabResult::clean().has_issue());
    }

    #[test]
    fn antibiotics_or_fraud_is_an_issue() {
        let mut r = LabResult::clean();
        r.antibiotics = true;
        assert!(r.has_issue());

        let mut r = LabResult::clean();
        r.fraud_flags = vec!["WATER_ADDED".into()];
        assert!(r.has_issue());
    }

    #[test]
    fn payload_uses_camel_case_and_omits_absent_fields() {
        let r = LabResult {
            somatic_cell_count: Some(250_000),
            ..LabResult::clean()
        };
        let payload = r.to_payload().unwrap();
        assert_eq!(
            payload,
            r#"{"somaticCellCount":250000,"antibiotics":false,"fraudFlags":[]}"#
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = LabResult::from_payload(r#"{"antibiotics":false,"colour":"blue"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn missing_antibiotics_flag_is_rejected() {
        assert!(LabResult::from_payload(r#"{"fraudFlags":[]}"#).is_err());
    }

    #[test]
    fn non_finite_measurement_fails_validation() {
        let r = LabResult {
            acidity: Some(f64::NAN),
            ..LabResult::clean()
        };
        assert!(matches!(r.validate(), Err(TypeError::Validation(_))));
    }

    fn measurement() -> impl Strategy<Value = Option<f64>> {
        proptest::option::of(-1.0e6f64..1.0e6f64)
    }

    proptest! {
        #[test]
        fn payload_round_trips_exactly(
            turbidity in measurement(),
            somatic_cell_count in proptest::option::of(any::<u64>()),
            acidity in measurement(),
            density in measurement(),
            antibiotics in any::<bool>(),
            fraud_flags in proptest::collection::vec("[A-Z_]{1,12}", 0..4),
            lab_id in proptest::option::of("[a-z0-9-]{1,10}"),
        ) {
            let original = LabResult {
                turbidity,
                somatic_cell_count,
                acidity,
                density,
                antibiotics,
                fraud_flags,
                lab_id,
                analyzed_at: None,
            };
            let payload = original.to_payload().unwrap();
            let decoded = LabResult::from_payload(&payload).unwrap();
            prop_assert_eq!(decoded, original);
        }
    }
}
