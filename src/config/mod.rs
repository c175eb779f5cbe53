//! Configuration module
//!
//! This module handles resolving an application's configuration document into
//! the typed, read-only runtime model: the loader with its preprocessor
//! pipeline, the application/port model, the dynamic KV accessor, and the
//! one-shot section defaulting pass.

pub mod defaults;
pub mod kv;
pub mod loader;
pub mod model;
pub mod sections;

// Re-export types and functions
pub use self::kv::Kv;
pub use self::loader::{load_from_file, load_from_reader};
pub use self::model::{
    Application, ApplicationSpec, Interface, Location, MatchedPrimaryPort, PortName, PrimaryPort,
    SecondaryPort,
};
pub use self::sections::{CommonSection, DatabaseSection, EncryptorSection, LogSection};
