//! Messaging-client configuration builder
//!
//! Consumes a resolved secondary port and produces a ready-to-use Kafka
//! producer configuration: the ordered broker list split out of the matched
//! location, the topic from the per-port options, and the static tuning
//! values. Tuning is never overridden by the per-port options bag; the bag
//! contributes only the topic.

use std::path::PathBuf;
use std::time::Duration;

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::common::{ConfigError, Result};
use crate::config::{Application, Kv, Location};
use crate::tls::{SecretStore, TlsTrust};

/// Default client identifier
pub const DEFAULT_CLIENT_ID: &str = "kafka-client";

/// Default channel buffer size
pub const DEFAULT_CHANNEL_BUFFER_SIZE: usize = 256;

/// Default producer retry maximum
pub const DEFAULT_PRODUCER_RETRY_MAX: u32 = 3;

/// Default producer timeout in seconds
pub const DEFAULT_PRODUCER_TIMEOUT_SECONDS: u64 = 10;

/// Default producer flush frequency in milliseconds
pub const DEFAULT_PRODUCER_FLUSH_FREQUENCY_MS: u64 = 500;

/// Broker acknowledgement level required before a produce succeeds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum RequiredAcks {
    /// No response, the TCP ACK is all you get
    #[default]
    NoResponse,
    /// Wait for only the local commit to succeed before responding
    WaitForLocal,
    /// Wait for all in-sync replicas to commit before responding
    WaitForAll,
}

impl From<RequiredAcks> for i16 {
    fn from(acks: RequiredAcks) -> i16 {
        match acks {
            RequiredAcks::NoResponse => 0,
            RequiredAcks::WaitForLocal => 1,
            RequiredAcks::WaitForAll => -1,
        }
    }
}

impl TryFrom<i16> for RequiredAcks {
    type Error = String;

    fn try_from(value: i16) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(RequiredAcks::NoResponse),
            1 => Ok(RequiredAcks::WaitForLocal),
            -1 => Ok(RequiredAcks::WaitForAll),
            other => Err(format!("invalid required_acks value: {}", other)),
        }
    }
}

/// Static producer tuning, completed once at startup
///
/// Zero-valued fields are backfilled by [`ProducerTuning::complete`]. The
/// acks zero value doubles as "unset", so `NoResponse` cannot survive
/// completion and must be set afterwards if truly wanted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerTuning {
    pub client_id: String,
    pub channel_buffer_size: usize,
    pub producer_return_successes: bool,
    pub producer_retry_max: u32,
    pub producer_required_acks: RequiredAcks,
    pub producer_timeout_seconds: u64,
    pub producer_flush_frequency_ms: u64,

    pub net_tls_enable: bool,
    pub insecure_skip_verify: bool,
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    pub ca_file: PathBuf,
    pub secret_namespace: String,
    pub secret_name: String,
}

impl ProducerTuning {
    /// Backfill zero-valued tuning fields with their defaults. Idempotent.
    pub fn complete(&mut self) {
        if self.client_id.is_empty() {
            self.client_id = DEFAULT_CLIENT_ID.to_string();
        }
        if self.channel_buffer_size == 0 {
            self.channel_buffer_size = DEFAULT_CHANNEL_BUFFER_SIZE;
        }
        if self.producer_retry_max == 0 {
            self.producer_retry_max = DEFAULT_PRODUCER_RETRY_MAX;
        }
        if self.producer_required_acks == RequiredAcks::NoResponse {
            self.producer_required_acks = RequiredAcks::WaitForLocal;
        }
        if self.producer_timeout_seconds == 0 {
            self.producer_timeout_seconds = DEFAULT_PRODUCER_TIMEOUT_SECONDS;
        }
        if self.producer_flush_frequency_ms == 0 {
            self.producer_flush_frequency_ms = DEFAULT_PRODUCER_FLUSH_FREQUENCY_MS;
        }
    }

    fn wants_secret_store(&self) -> bool {
        !self.secret_namespace.is_empty() && !self.secret_name.is_empty()
    }
}

/// Immutable, ready-to-use producer configuration
#[derive(Debug, Clone)]
pub struct KafkaClientConfig {
    pub brokers: Vec<String>,
    pub topic: String,
    pub client_id: String,
    pub channel_buffer_size: usize,
    pub return_successes: bool,
    pub retry_max: u32,
    pub required_acks: RequiredAcks,
    pub timeout: Duration,
    pub flush_frequency: Duration,
    pub tls: Option<TlsTrust>,
}

/// Build a producer configuration for a named secondary port
///
/// Fails with `MissingLocation` when the port has no matched primary port
/// location, and `MissingOptions` when it carries no options bag; no partial
/// configuration is produced in either case. `secret_store` is only
/// consulted when TLS is enabled and the tuning names a secret.
pub fn build_kafka_config(
    port_name: &str,
    app: &Application,
    tuning: &ProducerTuning,
    secret_store: Option<&dyn SecretStore>,
) -> Result<KafkaClientConfig> {
    let location = app
        .matched_primary_port_location(port_name)
        .ok_or_else(|| ConfigError::MissingLocation(port_name.to_string()))?;
    let options = app
        .secondary_port(port_name)
        .and_then(|port| port.options)
        .ok_or_else(|| ConfigError::MissingOptions(port_name.to_string()))?;

    new_kafka_config(&location, &options, tuning, secret_store)
}

/// Build a producer configuration from an already-resolved location and options
pub fn new_kafka_config(
    location: &Location,
    options: &Kv,
    tuning: &ProducerTuning,
    secret_store: Option<&dyn SecretStore>,
) -> Result<KafkaClientConfig> {
    let topic = options.get_string("topic");
    info!(
        "kafka client config, brokers: {}, default topic: {}",
        location.address, topic
    );

    let tls = if tuning.net_tls_enable {
        Some(source_tls(tuning, secret_store)?)
    } else {
        None
    };

    Ok(KafkaClientConfig {
        brokers: location.address.split(',').map(str::to_string).collect(),
        topic,
        client_id: tuning.client_id.clone(),
        channel_buffer_size: tuning.channel_buffer_size,
        return_successes: tuning.producer_return_successes,
        retry_max: tuning.producer_retry_max,
        required_acks: tuning.producer_required_acks,
        timeout: Duration::from_secs(tuning.producer_timeout_seconds),
        flush_frequency: Duration::from_millis(tuning.producer_flush_frequency_ms),
        tls,
    })
}

fn source_tls(tuning: &ProducerTuning, store: Option<&dyn SecretStore>) -> Result<TlsTrust> {
    if tuning.wants_secret_store() {
        let store = store.ok_or_else(|| ConfigError::SecretFetch {
            namespace: tuning.secret_namespace.clone(),
            name: tuning.secret_name.clone(),
            message: "no secret store configured".to_string(),
        })?;
        TlsTrust::from_secret_store(
            store,
            &tuning.secret_namespace,
            &tuning.secret_name,
            tuning.insecure_skip_verify,
        )
    } else {
        TlsTrust::from_files(
            &tuning.cert_file,
            &tuning.key_file,
            &tuning.ca_file,
            tuning.insecure_skip_verify,
        )
    }
}

/// Startup wrapper: a configuration that cannot be built aborts the process
///
/// Configuration must be valid before serving traffic; this is the single
/// deliberate abort point, the engine itself stays panic-free.
pub fn must_build_kafka_config(
    port_name: &str,
    app: &Application,
    tuning: &ProducerTuning,
    secret_store: Option<&dyn SecretStore>,
) -> KafkaClientConfig {
    match build_kafka_config(port_name, app, tuning, secret_store) {
        Ok(config) => config,
        Err(e) => {
            error!("cannot build kafka config for port '{}': {}", port_name, e);
            panic!("kafka config for port '{}' failed: {}", port_name, e);
        }
    }
}
