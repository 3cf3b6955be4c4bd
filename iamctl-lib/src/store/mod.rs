//! Token persistence
//!
//! Provides a `TokenStore` trait and implementations for persisting the
//! server URL together with the issued token pair. The three values are
//! always written as one unit so other tooling never sees a half-updated
//! file.

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::auth::AccessToken;
use crate::error::StoreError;

/// The persisted result of a login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDetails {
    /// Base URL of the identity server the tokens were issued by.
    pub server: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// When the login that produced these tokens completed.
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

impl ServerDetails {
    /// Bundles a freshly issued token with the server it came from.
    pub fn new(server: impl Into<String>, token: AccessToken) -> Self {
        Self {
            server: server.into().trim_end_matches('/').to_string(),
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            token_type: token.token_type,
            expires_at: token.expires_at,
            saved_at: Utc::now(),
        }
    }

    /// Returns `true` if the stored access token has expired.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }

    /// The access token with all but its first few characters hidden.
    pub fn masked_access_token(&self) -> String {
        mask(&self.access_token)
    }

    /// The refresh token with all but its first few characters hidden.
    pub fn masked_refresh_token(&self) -> String {
        mask(&self.refresh_token)
    }
}

fn mask(token: &str) -> String {
    const VISIBLE: usize = 4;
    if token.chars().count() <= VISIBLE * 2 {
        return "*".repeat(token.chars().count());
    }
    let prefix: String = token.chars().take(VISIBLE).collect();
    format!("{prefix}...")
}

impl std::fmt::Debug for ServerDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerDetails")
            .field("server", &self.server)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("saved_at", &self.saved_at)
            .finish()
    }
}

/// Trait for token persistence backends.
///
/// Implementations must make `save` all-or-nothing: after it returns, a
/// subsequent `load` yields either the previous details or the new ones,
/// never a mix.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Replaces the stored details.
    async fn save(&self, details: &ServerDetails) -> Result<(), StoreError>;

    /// Reads the stored details, or `None` if nothing has been saved.
    async fn load(&self) -> Result<Option<ServerDetails>, StoreError>;

    /// Removes the stored details. Succeeds if nothing is stored.
    async fn clear(&self) -> Result<(), StoreError>;
}
