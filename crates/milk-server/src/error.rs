use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use milk_gateway::GatewayError;
use milk_lifecycle::{LifecycleError, PublicViewError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    PublicView(#[from] PublicViewError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<milk_types::TypeError> for ServerError {
    fn from(e: milk_types::TypeError) -> Self {
        Self::Lifecycle(e.into())
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    pub code: &'static str,
}

fn gateway_status(e: &GatewayError) -> (StatusCode, &'static str) {
    match e {
        GatewayError::IdentityNotFound(_) => (StatusCode::FORBIDDEN, "IDENTITY_NOT_FOUND"),
        GatewayError::ForbiddenIdentity(_) => (StatusCode::FORBIDDEN, "FORBIDDEN_IDENTITY"),
        GatewayError::ConnectionFailed(_) => (StatusCode::BAD_GATEWAY, "CONNECTION_FAILED"),
        GatewayError::InvocationFailed { .. } if e.is_not_found() => {
            (StatusCode::NOT_FOUND, "NOT_FOUND")
        }
        GatewayError::InvocationFailed { .. } => (StatusCode::CONFLICT, "INVOCATION_FAILED"),
        GatewayError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
        GatewayError::Wallet(_) | GatewayError::Config(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

impl ServerError {
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Lifecycle(LifecycleError::ValidationFailed(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            Self::Lifecycle(LifecycleError::Gateway(e)) => gateway_status(e),
            Self::Lifecycle(LifecycleError::MalformedLedgerPayload(_)) => {
                (StatusCode::BAD_GATEWAY, "MALFORMED_LEDGER_PAYLOAD")
            }
            Self::PublicView(PublicViewError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::PublicView(PublicViewError::Internal)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        if status.is_server_error() {
            tracing::warn!(%status, error = %self, "request failed");
        }
        let error = match &self {
            // Ledger messages carry business meaning and go out verbatim.
            Self::Lifecycle(LifecycleError::Gateway(GatewayError::InvocationFailed {
                message,
                ..
            })) => message.clone(),
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        let body = ErrorResponse {
            ok: false,
            error,
            code,
        };
        (status, Json(body)).into_response()
    }
}
