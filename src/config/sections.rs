//! Operational configuration sections with one-shot defaulting
//!
//! These sections are deserialized as part of a custom-config schema (via
//! `Kv::load_into`) and then completed exactly once at startup: `complete()`
//! replaces every zero-valued field with its documented default and leaves
//! explicitly-set fields untouched. A second call is a no-op because the
//! first already replaced every zero field.

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// Nested operational config: log, database, and encryptor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonSection {
    pub log: LogSection,
    pub database: DatabaseSection,
    pub encryptor: EncryptorSection,
}

impl CommonSection {
    /// Backfill zero-valued fields across every section. Idempotent.
    pub fn complete(&mut self) {
        self.log.complete();
        self.database.complete();
        self.encryptor.complete();
    }
}

/// Logging settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub level: String,
    pub directory: String,
}

impl LogSection {
    pub fn complete(&mut self) {
        if self.level.is_empty() {
            self.level = defaults::LOG_LEVEL.to_string();
        }
        if self.directory.is_empty() {
            self.directory = defaults::LOG_DIRECTORY.to_string();
        }
    }
}

/// Database connection-pool settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub max_open_connections: u32,
    pub max_idle_connections: u32,
    pub connection_max_life_seconds: u64,
    pub connection_max_idle_seconds: u64,
    pub slow_threshold_milliseconds: u64,
}

impl DatabaseSection {
    pub fn complete(&mut self) {
        if self.max_open_connections == 0 {
            self.max_open_connections = defaults::MAX_OPEN_CONNECTIONS;
        }
        if self.max_idle_connections == 0 {
            self.max_idle_connections = defaults::MAX_IDLE_CONNECTIONS;
        }
        if self.connection_max_life_seconds == 0 {
            self.connection_max_life_seconds = defaults::CONNECTION_MAX_LIFE_SECONDS;
        }
        if self.connection_max_idle_seconds == 0 {
            self.connection_max_idle_seconds = defaults::CONNECTION_MAX_IDLE_SECONDS;
        }
        if self.slow_threshold_milliseconds == 0 {
            self.slow_threshold_milliseconds = defaults::SLOW_THRESHOLD_MILLISECONDS;
        }
    }
}

/// Encrypted-property settings: password and token delimiters
///
/// The password has no default; only the delimiters are backfilled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptorSection {
    pub password: String,
    pub property_prefix: String,
    pub property_suffix: String,
}

impl EncryptorSection {
    pub fn complete(&mut self) {
        if self.property_prefix.is_empty() {
            self.property_prefix = defaults::PROPERTY_PREFIX.to_string();
        }
        if self.property_suffix.is_empty() {
            self.property_suffix = defaults::PROPERTY_SUFFIX.to_string();
        }
    }
}
