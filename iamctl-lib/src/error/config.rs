//! Client configuration error types

use std::path::PathBuf;

/// Errors raised while resolving client credentials.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("Client config not found at {}; run `iamctl init` first", .path.display())]
    NotFound { path: PathBuf },

    /// The config file exists but could not be read or written.
    #[error("Failed to access client config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON.
    #[error("Malformed client config {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required field is absent or empty after applying overrides.
    #[error("Client config is missing `{0}`")]
    MissingField(&'static str),

    /// No platform config directory could be determined.
    #[error("Could not determine a config directory; pass --config-dir")]
    NoConfigDir,
}
