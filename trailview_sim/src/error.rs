//! Harness errors.

use std::path::PathBuf;
use thiserror::Error;
use trailview_core::{LoadError, ReplayError};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Failed to read log {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error("Invalid simulator config: {0}")]
    InvalidConfig(String),
}
