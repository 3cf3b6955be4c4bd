//! Token store error types

use std::path::PathBuf;

/// Errors raised while persisting or reading stored server details.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed server details in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize server details: {0}")]
    Serialize(#[source] serde_json::Error),
}
