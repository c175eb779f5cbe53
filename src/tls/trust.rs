//! TLS trust material
//!
//! Builds the client certificate, private key, and CA pool a TLS-enabled
//! messaging client needs, sourced either from three local PEM files or from
//! an external secret store. Both paths run once, synchronously, at startup;
//! a failure here means the configuration is not safe to serve with.

use std::fmt;
use std::fs;
use std::path::Path;

use log::{error, info};
use openssl::pkey::{PKey, Private};
use openssl::x509::store::{X509Store, X509StoreBuilder};
use openssl::x509::X509;

use crate::common::{ConfigError, Result};
use crate::tls::secret::{
    SecretData, SecretStore, SECRET_CA_KEY, SECRET_CERT_KEY, SECRET_KEY_KEY,
};

/// Client certificate, private key, CA pool, and verification policy
#[derive(Clone)]
pub struct TlsTrust {
    pub certificate: X509,
    pub private_key: PKey<Private>,
    pub ca_certs: Vec<X509>,
    /// Skip hostname verification. Off unless explicitly requested.
    pub insecure_skip_verify: bool,
}

// Manual impl: the openssl types carry no useful Debug output and the key
// material must not end up in logs.
impl fmt::Debug for TlsTrust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsTrust")
            .field("ca_certs", &self.ca_certs.len())
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .finish_non_exhaustive()
    }
}

impl TlsTrust {
    /// Build trust material from three local PEM files
    ///
    /// The CA file may hold a bundle of several certificates.
    pub fn from_files(
        cert_path: &Path,
        key_path: &Path,
        ca_path: &Path,
        insecure_skip_verify: bool,
    ) -> Result<Self> {
        let cert_pem = read_pem(cert_path)?;
        let key_pem = read_pem(key_path)?;
        let ca_pem = read_pem(ca_path)?;

        info!(
            "loading TLS material from files: cert={}, key={}, ca={}",
            cert_path.display(),
            key_path.display(),
            ca_path.display()
        );

        Self::from_pem(&cert_pem, &key_pem, &ca_pem, insecure_skip_verify)
    }

    /// Build trust material from an external secret store
    ///
    /// A failed fetch is reported and the path proceeds with empty data,
    /// failing at PEM extraction; missing entries in a fetched secret are
    /// fetch failures.
    pub fn from_secret_store(
        store: &dyn SecretStore,
        namespace: &str,
        name: &str,
        insecure_skip_verify: bool,
    ) -> Result<Self> {
        let data = match store.fetch(namespace, name) {
            Ok(data) => data,
            Err(e) => {
                error!("secret {}/{} not available: {}", namespace, name, e);
                SecretData::new()
            }
        };

        let entry = |key: &str| -> Result<&[u8]> {
            data.get(key)
                .map(Vec::as_slice)
                .ok_or_else(|| ConfigError::SecretFetch {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    message: format!("secret has no '{}' entry", key),
                })
        };

        let cert_pem = entry(SECRET_CERT_KEY)?;
        let key_pem = entry(SECRET_KEY_KEY)?;
        let ca_pem = entry(SECRET_CA_KEY)?;

        info!("loading TLS material from secret {}/{}", namespace, name);

        Self::from_pem(cert_pem, key_pem, ca_pem, insecure_skip_verify)
    }

    /// Build trust material from in-memory PEM bytes
    pub fn from_pem(
        cert_pem: &[u8],
        key_pem: &[u8],
        ca_pem: &[u8],
        insecure_skip_verify: bool,
    ) -> Result<Self> {
        let certificate = X509::from_pem(cert_pem)
            .map_err(|e| ConfigError::TlsLoad(format!("bad client certificate: {}", e)))?;
        let private_key = PKey::private_key_from_pem(key_pem)
            .map_err(|e| ConfigError::TlsLoad(format!("bad private key: {}", e)))?;
        let ca_certs = X509::stack_from_pem(ca_pem)
            .map_err(|e| ConfigError::TlsLoad(format!("bad CA bundle: {}", e)))?;

        if ca_certs.is_empty() {
            return Err(ConfigError::TlsLoad(
                "CA bundle holds no certificates".to_string(),
            ));
        }

        Ok(Self {
            certificate,
            private_key,
            ca_certs,
            insecure_skip_verify,
        })
    }

    /// Assemble the CA pool into an OpenSSL trust store
    pub fn ca_store(&self) -> Result<X509Store> {
        let mut builder = X509StoreBuilder::new()
            .map_err(|e| ConfigError::TlsLoad(format!("cannot build CA store: {}", e)))?;
        for ca in &self.ca_certs {
            builder
                .add_cert(ca.clone())
                .map_err(|e| ConfigError::TlsLoad(format!("cannot add CA cert: {}", e)))?;
        }
        Ok(builder.build())
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    fs::read(path)
        .map_err(|e| ConfigError::TlsLoad(format!("cannot read {}: {}", path.display(), e)))
}
