use std::path::PathBuf;

use regcond::ValidationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse graph document {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid canvas: {0}")]
    InvalidCanvas(#[source] ValidationError),

    #[error("invalid region in slot {slot}: {source}")]
    InvalidRegion {
        slot: usize,
        #[source]
        source: ValidationError,
    },

    #[error("{message}")]
    Usage { message: String },

    #[error("failed to initialize logging: {message}")]
    Logging { message: String },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidCanvas(_) | Self::InvalidRegion { .. } => 2,
            Self::Parse { .. } => 3,
            Self::Usage { .. } => 64,
            _ => 1,
        }
    }
}
