//! Ledger transaction gateway for Milk Trace.
//!
//! Every ledger operation runs on its own short-lived connection, opened
//! under the caller's resolved identity and closed before the call returns.
//!
//! - [`LedgerNetwork`] / [`LedgerSession`] / [`ChannelHandle`] /
//!   [`ContractHandle`] are the platform boundary
//! - [`SessionGuard`] closes a session exactly once on every exit path
//! - [`TransactionGateway`] implements [`LedgerGateway`]: read-only
//!   `evaluate` (retried on transient faults) and state-changing `submit`
//!   (never retried)
//! - [`InMemoryNetwork`] simulates the batch chaincode for development and
//!   tests

mod chaincode;
pub mod config;
pub mod connection;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod profile;
pub mod session;

pub use config::{GatewayConfig, LedgerBackend};
pub use connection::{
    ChannelHandle, ContractHandle, LedgerFault, LedgerNetwork, LedgerSession, SubmitReceipt,
};
pub use error::{GatewayError, GatewayResult};
pub use gateway::{LedgerGateway, Submitted, TransactionGateway};
pub use memory::{InMemoryNetwork, SessionStats};
pub use profile::NetworkProfile;
pub use session::SessionGuard;
