//! Canonical string rendering for positional ledger arguments.
//!
//! The chaincode calling convention is string-only, so every number and
//! boolean is rendered here and nowhere else.

/// Render a number in plain decimal form: `100`, `4.5`, `-2.25`.
///
/// Uses `f64` `Display`: locale-independent, shortest round-trip, never an
/// exponent. Negative zero renders as `0`.
pub fn canonical_decimal(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Render a boolean as the literal `"true"` or `"false"`.
pub fn canonical_bool(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}
