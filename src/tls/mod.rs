//! TLS module
//!
//! Trust material for TLS-enabled clients and the secret-store capability
//! interface it can be sourced through.

pub mod secret;
pub mod trust;

pub use secret::{SecretData, SecretStore, SECRET_CA_KEY, SECRET_CERT_KEY, SECRET_KEY_KEY};
pub use trust::TlsTrust;
