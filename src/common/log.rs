//! Logging utilities
//!
//! This module provides helpers for initializing the logging system.

use crate::config::LogSection;

/// Initialize the logging system
///
/// # Parameters
///
/// * `level` - Log level filter applied when `RUST_LOG` is not set
pub fn init_logger(level: &str) {
    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::init_from_env(env);
}

/// Initialize the logging system from a completed log section
///
/// The section's `directory` field is carried for external log shippers and
/// is not consumed here; only the level feeds the filter.
pub fn init_logger_from_section(section: &LogSection) {
    init_logger(&section.level);
}
