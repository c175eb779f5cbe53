//! Error handling module
//!
//! This module defines the error types and result type aliases used in the crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration engine error type
///
/// Every failure in the load pipeline and the client-config builder surfaces
/// as one of these variants. The lenient KV getters deliberately never
/// produce errors; only the strict `Kv::load_into` path does.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration source could not be read
    #[error("failed to read configuration source {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A preprocessor stage failed; the pipeline aborts on the first failure
    #[error("preprocessor '{stage}' failed: {message}")]
    Preprocess {
        stage: &'static str,
        message: String,
    },

    /// Structural document parse failure
    #[error("failed to parse application document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Encrypted token could not be decrypted (wrong password, bad ciphertext)
    #[error("decryption failed: {0}")]
    Decrypt(String),

    /// No matched primary port location for the requested secondary port
    #[error("missing matched primary port location ({0})")]
    MissingLocation(String),

    /// Secondary port exists but carries no options bag
    #[error("missing options for secondary port ({0})")]
    MissingOptions(String),

    /// TLS certificate material could not be loaded or parsed
    #[error("failed to load TLS material: {0}")]
    TlsLoad(String),

    /// External secret store fetch failed
    #[error("failed to fetch secret {namespace}/{name}: {message}")]
    SecretFetch {
        namespace: String,
        name: String,
        message: String,
    },

    /// Strict KV-to-schema projection failed (shape or type mismatch)
    #[error("custom config does not match target schema: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `ConfigError`.
pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<openssl::error::ErrorStack> for ConfigError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        ConfigError::Decrypt(err.to_string())
    }
}
