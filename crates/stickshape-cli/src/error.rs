//! Error types for stickctl

use std::path::PathBuf;

use stickshape_limiter::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration rejected: {0}")]
    ConfigInvalid(#[from] ConfigError),

    #[error("Trace line {line}: {source}")]
    TraceParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Read { .. } | CliError::IoError(_) => 2,
            CliError::ConfigParse { .. } | CliError::ConfigInvalid(_) => 3,
            CliError::TraceParse { .. } => 4,
            CliError::JsonError(_) => 1,
        }
    }
}
