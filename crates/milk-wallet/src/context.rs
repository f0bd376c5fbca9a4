use std::fmt;

use serde::{Deserialize, Serialize};

/// The only identity type ledger connections accept.
pub const X509_IDENTITY_TYPE: &str = "X.509";

/// Signing material for one named identity.
///
/// `Debug` never prints the private key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningContext {
    pub name: String,
    pub msp_id: String,
    /// PEM-encoded X.509 certificate.
    pub certificate: String,
    /// PEM-encoded private key.
    pub private_key: String,
}

impl SigningContext {
    pub fn new(
        name: impl Into<String>,
        msp_id: impl Into<String>,
        certificate: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            msp_id: msp_id.into(),
            certificate: certificate.into(),
            private_key: private_key.into(),
        }
    }
}

impl fmt::Debug for SigningContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningContext")
            .field("name", &self.name)
            .field("msp_id", &self.msp_id)
            .field("private_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}
