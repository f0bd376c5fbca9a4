//! Credential store for Milk Trace.
//!
//! Resolves a caller identity name to the signing material a ledger
//! connection is opened under. The store is read-only here; enrollment and
//! registration happen elsewhere.
//!
//! - [`CredentialStore`] is the trait the gateway depends on
//! - [`FileSystemWallet`] reads `<name>.id` files from a wallet directory
//! - [`InMemoryWallet`] backs tests and the simulated network

pub mod context;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use context::{SigningContext, X509_IDENTITY_TYPE};
pub use error::{WalletError, WalletResult};
pub use fs::FileSystemWallet;
pub use memory::InMemoryWallet;
pub use traits::CredentialStore;
