//! Error types

mod auth;
mod config;
mod store;

pub use auth::*;
pub use config::*;
pub use store::*;

/// Top-level error for a login invocation.
///
/// Each variant corresponds to one stage of the flow, so callers can tell
/// whether anything was sent to the server or written to disk.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Client credentials could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The token exchange failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Tokens were issued but could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}
