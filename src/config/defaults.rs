//! Default configuration values
//!
//! Single source of truth for the documented constants the one-shot
//! section defaulting pass backfills into zero-valued fields.

/// Default log level
pub const LOG_LEVEL: &str = "info";

/// Default log directory
pub const LOG_DIRECTORY: &str = "/data/log";

/// Default maximum open database connections
pub const MAX_OPEN_CONNECTIONS: u32 = 100;

/// Default maximum idle database connections
pub const MAX_IDLE_CONNECTIONS: u32 = 5;

/// Default connection lifetime (an hour)
pub const CONNECTION_MAX_LIFE_SECONDS: u64 = 3_600;

/// Default idle connection lifetime (5 minutes)
pub const CONNECTION_MAX_IDLE_SECONDS: u64 = 300;

/// Default slow-query threshold (half a second)
pub const SLOW_THRESHOLD_MILLISECONDS: u64 = 500;

/// Default encrypted-token prefix
pub const PROPERTY_PREFIX: &str = "ENC(";

/// Default encrypted-token suffix
pub const PROPERTY_SUFFIX: &str = ")";
