use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};

/// The parts of a connection profile the gateway checks at startup.
///
/// Peer and organization entries are kept opaque; the platform client
/// interprets them.
#[derive(Clone, Debug, Deserialize)]
pub struct NetworkProfile {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub channels: BTreeMap<String, Value>,
    #[serde(default)]
    pub peers: BTreeMap<String, Value>,
    #[serde(default)]
    pub organizations: BTreeMap<String, Value>,
}

impl NetworkProfile {
    pub fn from_json(raw: &str) -> GatewayResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| GatewayError::Config(format!("invalid network profile: {e}")))
    }

    pub fn load(path: &Path) -> GatewayResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!("cannot read network profile {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// Profiles that list channels must list the configured one.
    pub fn ensure_channel(&self, channel: &str) -> GatewayResult<()> {
        if self.channels.is_empty() || self.channels.contains_key(channel) {
            return Ok(());
        }
        Err(GatewayError::Config(format!(
            "channel '{channel}' is not defined in network profile '{}'",
            self.name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"{
        "name": "test-network-org1",
        "version": "1.0.0",
        "organizations": {"Org1": {"mspid": "Org1MSP", "peers": ["peer0.org1.example.com"]}},
        "peers": {"peer0.org1.example.com": {"url": "grpcs://localhost:7051"}},
        "channels": {"mychannel": {}}
    }"#;

    #[test]
    fn parses_connection_profile() {
        let p = NetworkProfile::from_json(PROFILE).unwrap();
        assert_eq!(p.name, "test-network-org1");
        assert_eq!(p.peers.len(), 1);
        assert!(p.ensure_channel("mychannel").is_ok());
    }

    #[test]
    fn unknown_channel_is_a_config_error() {
        let p = NetworkProfile::from_json(PROFILE).unwrap();
        assert!(matches!(p.ensure_channel("other"), Err(GatewayError::Config(_))));
    }

    #[test]
    fn profile_without_channels_accepts_any() {
        let p = NetworkProfile::from_json(r#"{"name":"n"}"#).unwrap();
        assert!(p.ensure_channel("anything").is_ok());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connection-org1.json");
        std::fs::write(&path, PROFILE).unwrap();
        assert_eq!(NetworkProfile::load(&path).unwrap().name, "test-network-org1");
        assert!(NetworkProfile::load(&dir.path().join("missing.json")).is_err());
    }
}
