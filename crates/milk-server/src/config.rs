use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;

use milk_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Full server configuration, usually read from `milktrace.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            enable_cors: false,
        }
    }
}

/// How bearer tokens map to wallet identities.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret. When present, bearer tokens are JWTs whose `sub` is
    /// the identity and `tokens` is ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,
    /// Static token to identity table, used when no JWT secret is set.
    pub tokens: BTreeMap<String, String>,
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> ServerResult<Self> {
        toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml_string(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Copy safe to print: token values and the JWT secret are masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.auth.tokens = self
            .auth
            .tokens
            .values()
            .enumerate()
            .map(|(i, identity)| (format!("<redacted-{}>", i + 1), identity.clone()))
            .collect();
        if copy.auth.jwt_secret.is_some() {
            copy.auth.jwt_secret = Some("<redacted>".into());
        }
        copy
    }

    /// Gateway overrides, `PORT` for the listener and `JWT_SECRET`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ServerResult<()> {
        self.gateway.apply_env(&lookup);
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| ServerError::Config(format!("PORT is not a valid port: {port}")))?;
            self.server.bind_addr.set_port(port);
        }
        Ok(())
    }

    pub fn validate(&self) -> ServerResult<()> {
        self.gateway
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;
        for (token, identity) in &self.auth.tokens {
            if token.trim().is_empty() || identity.trim().is_empty() {
                return Err(ServerError::Config(
                    "auth tokens and identities must not be empty".into(),
                ));
            }
        }
        if matches!(&self.auth.jwt_secret, Some(secret) if secret.trim().is_empty()) {
            return Err(ServerError::Config("auth.jwt_secret must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config() {
        let c = AppConfig::default();
        assert_eq!(c.server.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert!(!c.server.enable_cors);
        assert!(c.auth.tokens.is_empty());
        assert_eq!(c.gateway.public_identity, "appUser");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = AppConfig::from_toml_str(
            r#"
            [gateway]
            channel = "dairy"

            [auth.tokens]
            "s3cret" = "farmer"
            "#,
        )
        .unwrap();
        assert_eq!(c.gateway.channel, "dairy");
        assert_eq!(c.gateway.chaincode, "milkcc");
        assert_eq!(c.auth.tokens["s3cret"], "farmer");
        assert_eq!(c.server.bind_addr.port(), 3000);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("milktrace.toml");
        std::fs::write(&path, "[server]\nbind_addr = \"0.0.0.0:8080\"\n").unwrap();
        let c = AppConfig::load(&path).unwrap();
        assert_eq!(c.server.bind_addr.port(), 8080);
        assert!(AppConfig::load(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn env_overrides_port_and_gateway() {
        let env: HashMap<&str, &str> = [("PORT", "4100"), ("WALLET_PATH", "/var/wallet")]
            .into_iter()
            .collect();
        let mut c = AppConfig::default();
        c.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(c.server.bind_addr.port(), 4100);
        assert_eq!(c.gateway.wallet_path, std::path::PathBuf::from("/var/wallet"));
    }

    #[test]
    fn env_sets_jwt_secret() {
        let mut c = AppConfig::default();
        c.apply_env(|k| (k == "JWT_SECRET").then(|| "dev-secret".to_string()))
            .unwrap();
        assert_eq!(c.auth.jwt_secret.as_deref(), Some("dev-secret"));
        assert!(c.validate().is_ok());

        c.auth.jwt_secret = Some("  ".into());
        assert!(matches!(c.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn redacted_config_hides_secrets() {
        let mut c = AppConfig::default();
        c.auth.tokens.insert("t-farm".into(), "farmer".into());
        c.auth.tokens.insert("t-lab".into(), "lab".into());
        c.auth.jwt_secret = Some("dev-secret".into());

        let printed = c.redacted().to_toml_string().unwrap();
        assert!(!printed.contains("t-farm"));
        assert!(!printed.contains("t-lab"));
        assert!(!printed.contains("dev-secret"));
        assert!(printed.contains("farmer"));
        assert!(printed.contains("<redacted>"));
        assert_eq!(c.redacted().auth.tokens.len(), 2);
        assert_eq!(c.redacted().gateway, c.gateway);
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let mut c = AppConfig::default();
        let err = c.apply_env(|k| (k == "PORT").then(|| "http".to_string()));
        assert!(matches!(err, Err(ServerError::Config(_))));
    }

    #[test]
    fn toml_round_trip() {
        let mut c = AppConfig::default();
        c.auth.tokens.insert("t".into(), "lab".into());
        let again = AppConfig::from_toml_str(&c.to_toml_string().unwrap()).unwrap();
        assert_eq!(again, c);
    }
}
