use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ServerError, ServerResult};

/// An authenticated caller, named by its wallet identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub identity: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
            .map(|token| Self::Bearer(token.to_string()))
            .unwrap_or(Self::Anonymous)
    }
}

/// Maps request credentials to a wallet identity.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Caller>;
}

/// Fixed token table loaded from configuration.
#[derive(Default)]
pub struct StaticTokenAuth {
    tokens: HashMap<String, String>,
}

impl StaticTokenAuth {
    pub fn new<I, T, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (T, S)>,
        T: Into<String>,
        S: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(t, s)| (t.into(), s.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Caller> {
        match credentials {
            Credentials::Bearer(token) => self
                .tokens
                .get(token)
                .map(|identity| Caller {
                    identity: identity.clone(),
                })
                .ok_or_else(|| ServerError::Unauthorized("unknown token".into())),
            Credentials::Anonymous => Err(ServerError::Unauthorized("missing bearer token".into())),
        }
    }
}

/// Claims carried by an HS256 bearer token. `sub` names the wallet identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
}

/// HS256 JWT verification against a shared secret.
pub struct JwtAuth {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    fn verify(&self, token: &str) -> ServerResult<Claims> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "bearer token rejected");
            match e.kind() {
                ErrorKind::ExpiredSignature => ServerError::Unauthorized("token expired".into()),
                ErrorKind::InvalidSignature => {
                    ServerError::Unauthorized("invalid token signature".into())
                }
                _ => ServerError::Unauthorized("invalid token".into()),
            }
        })?;
        Ok(data.claims)
    }
}

#[async_trait]
impl AuthProvider for JwtAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Caller> {
        let Credentials::Bearer(token) = credentials else {
            return Err(ServerError::Unauthorized("missing bearer token".into()));
        };
        let claims = self.verify(token)?;
        if claims.sub.trim().is_empty() {
            return Err(ServerError::Unauthorized("token has no subject".into()));
        }
        Ok(Caller {
            identity: claims.sub,
        })
    }
}
