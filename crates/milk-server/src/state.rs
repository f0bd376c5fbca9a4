use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use milk_lifecycle::BatchService;

use crate::auth::{AuthProvider, Caller, Credentials};
use crate::error::ServerError;

/// Shared per-router state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub service: BatchService,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    pub fn new(service: BatchService, auth: Arc<dyn AuthProvider>) -> Self {
        Self { service, auth }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let credentials = Credentials::from_headers(&parts.headers);
        state.auth.authenticate(&credentials).await
    }
}
