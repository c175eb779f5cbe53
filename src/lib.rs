//! Secure application configuration resolution
//!
//! This library resolves a deployable application's YAML configuration
//! document into a typed, read-only runtime model. Encrypted values embedded
//! as `ENC(...)` tokens are decrypted at the text level before parsing, port
//! bindings resolved by an external topology system are carried through, and
//! a messaging-client configuration builder consumes the resolved ports.
//!
//! # Main features
//!
//! - Ordered preprocessor pipeline with password-based decryption of
//!   embedded secrets, failing fast before structural parsing
//! - Typed application model with copy-on-read secondary-port lookups
//! - Permissive dynamic key-value accessor whose typed getters never fail
//! - One-shot zero-value defaulting for operational config sections
//! - Kafka producer configuration built from a resolved port, including TLS
//!   material from local PEM files or an external secret store
//!
//! # Example
//!
//! ```
//! use secure_appconfig::config::load_from_reader;
//! use secure_appconfig::kafka::{build_kafka_config, ProducerTuning};
//!
//! # fn main() -> secure_appconfig::Result<()> {
//! let doc = r#"
//! kind: Application
//! api_version: v1
//! name: orders-service
//! namespace: prod
//! spec:
//!   secondary_ports:
//!     kafka:
//!       interface:
//!         name: messaging
//!       options:
//!         topic: orders
//!       matched_primary_port:
//!         application_name: kafka-broker
//!         location:
//!           address: "a:9092,b:9092"
//!           port: 9092
//! "#;
//!
//! let app = load_from_reader(doc.as_bytes(), &[])?;
//!
//! let mut tuning = ProducerTuning::default();
//! tuning.complete();
//!
//! let client = build_kafka_config("kafka", &app, &tuning, None)?;
//! assert_eq!(client.brokers, ["a:9092", "b:9092"]);
//! assert_eq!(client.topic, "orders");
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod common;
pub mod config;
pub mod crypto;
pub mod kafka;
pub mod tls;

// Re-export commonly used structures and functions for convenience
pub use common::{ConfigError, Result};
pub use config::{load_from_file, load_from_reader, Application, Kv};
pub use crypto::{PbeDecryptor, Preprocess};
pub use kafka::{build_kafka_config, KafkaClientConfig, ProducerTuning};
pub use tls::{SecretStore, TlsTrust};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
