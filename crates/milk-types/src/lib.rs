//! Foundation types for Milk Trace.
//!
//! This crate provides the records, operation requests, and lifecycle types
//! shared by every other Milk Trace crate. It performs no I/O.
//!
//! # Key Types
//!
//! - [`BatchRecord`]: Batch state as reconstructed by the ledger on read
//! - [`LabResult`]: Typed quality measurement set appended to a batch
//! - [`HistoryEntry`]: One ledger-produced state transition record
//! - [`LedgerFunction`]: The chaincode function catalog
//! - [`LifecycleStage`]: The permitted sequence of batch transitions
//! - [`ProcessingType`]: Closed set of industrial processing methods

pub mod args;
pub mod batch;
pub mod error;
pub mod function;
pub mod history;
pub mod lab;
pub mod lifecycle;
pub mod processing;
pub mod request;

pub use args::{canonical_bool, canonical_decimal};
pub use batch::{BatchRecord, ProcessingInfo, ShipmentInfo, TransportEvent};
pub use error::TypeError;
pub use function::LedgerFunction;
pub use history::HistoryEntry;
pub use lab::LabResult;
pub use lifecycle::LifecycleStage;
pub use processing::ProcessingType;
pub use request::{
    ApproveRequest, CreateBatchRequest, LabResultRequest, ProcessRequest, ShipRequest,
    TransportRequest,
};
