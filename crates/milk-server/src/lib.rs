//! HTTP server for Milk Trace.
//!
//! Exposes the batch lifecycle over REST. Every ledger-backed route runs
//! under the wallet identity bound to the caller's bearer token, except
//! `/public/batches/:id`, which runs under the configured public identity.

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{AuthProvider, Caller, Claims, Credentials, JwtAuth, StaticTokenAuth};
pub use config::{AppConfig, AuthConfig, ServerConfig};
pub use dto::LedgerResponse;
pub use error::{ErrorResponse, ServerError, ServerResult};
pub use server::MilkServer;
pub use state::AppState;
