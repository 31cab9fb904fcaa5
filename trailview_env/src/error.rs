//! Error types for the TrailView host abstraction.

use crate::types::MarkerHandle;
use thiserror::Error;

/// Errors that can occur while talking to a rendering host.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The host has no marker with this handle
    #[error("Unknown marker handle: {0}")]
    UnknownHandle(MarkerHandle),

    /// The host rejected or failed an operation
    #[error("Host error: {0}")]
    HostError(String),
}

impl EnvError {
    /// Creates a host error.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::HostError(msg.into())
    }
}
