//! Common module
//!
//! This module contains shared types, errors, and utility functions used throughout the crate.

pub mod error;
pub mod log;

// Re-export commonly used types and functions
pub use error::{ConfigError, Result};
pub use log::{init_logger, init_logger_from_section};
