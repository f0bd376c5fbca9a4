use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Industrial processing applied to a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessingType {
    /// Ultra-high temperature treatment.
    Uht,
    Pasteurized,
}

impl ProcessingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uht => "UHT",
            Self::Pasteurized => "PASTEURIZED",
        }
    }
}

impl fmt::Display for ProcessingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingType {
    type Err = TypeError;

    /// Exact match only; `uht` is not `UHT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UHT" => Ok(Self::Uht),
            "PASTEURIZED" => Ok(Self::Pasteurized),
            other => Err(TypeError::UnknownProcessingType(other.to_string())),
        }
    }
}
