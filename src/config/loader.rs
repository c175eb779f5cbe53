//! Document loading
//!
//! Reads raw bytes from a file or stream, runs them through an ordered
//! preprocessor pipeline, and deserializes the result into the typed
//! [`Application`] model. The loader injects no defaults; section defaulting
//! is a separate, explicit pass.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;

use crate::common::{ConfigError, Result};
use crate::config::model::Application;
use crate::crypto::Preprocess;

/// Load an application document from a file
///
/// Preprocessors run in order over the raw bytes; the first failing stage
/// aborts the load with its name attached. A document that parses but does
/// not match the model shape is a parse failure.
pub fn load_from_file(
    path: impl AsRef<Path>,
    preprocessors: &[Box<dyn Preprocess>],
) -> Result<Application> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("read {} bytes from {}", data.len(), path.display());

    load_bytes(data, preprocessors)
}

/// Load an application document from a stream
pub fn load_from_reader(
    mut reader: impl Read,
    preprocessors: &[Box<dyn Preprocess>],
) -> Result<Application> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).map_err(|e| ConfigError::Read {
        path: PathBuf::from("<stream>"),
        source: e,
    })?;

    load_bytes(data, preprocessors)
}

fn load_bytes(mut data: Vec<u8>, preprocessors: &[Box<dyn Preprocess>]) -> Result<Application> {
    for stage in preprocessors {
        data = stage.apply(data).map_err(|e| match e {
            already @ ConfigError::Preprocess { .. } => already,
            other => ConfigError::Preprocess {
                stage: stage.name(),
                message: other.to_string(),
            },
        })?;
    }

    Ok(serde_yaml::from_slice(&data)?)
}
