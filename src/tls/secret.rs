//! External secret store interface
//!
//! TLS material can be sourced from an external secret store instead of
//! local files. The store is an injected capability so the engine stays
//! testable with fakes; production bindings (e.g. a Kubernetes secrets
//! client) live outside this crate.

use std::collections::BTreeMap;

use crate::common::Result;

/// Key of the client certificate entry in a fetched secret
pub const SECRET_CERT_KEY: &str = "cert.pem";

/// Key of the private key entry in a fetched secret
pub const SECRET_KEY_KEY: &str = "key.pem";

/// Key of the CA bundle entry in a fetched secret
pub const SECRET_CA_KEY: &str = "ca_cert.pem";

/// Byte map returned by a secret fetch, keyed by entry name
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Capability interface for fetching certificate material at startup
///
/// `fetch` is a blocking call with no built-in timeout or retry; callers
/// needing resilience wrap it externally.
pub trait SecretStore {
    fn fetch(&self, namespace: &str, name: &str) -> Result<SecretData>;
}
