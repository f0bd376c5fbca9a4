//! Batch lifecycle service for Milk Trace.
//!
//! Translates typed batch operations into positional ledger calls and
//! derives the redacted public view of a batch.
//!
//! Lifecycle ordering (approve before process, process before ship, ...)
//! is enforced by the ledger. This crate forwards every well-formed call
//! and surfaces the ledger's verdict unchanged.

pub mod catalog;
pub mod error;
pub mod service;
pub mod view;

pub use catalog::LedgerCall;
pub use error::{LifecycleError, LifecycleResult, PublicViewError};
pub use service::{BatchService, TxOutcome};
pub use view::{PublicView, PublicViewBuilder, QualityStatus};
