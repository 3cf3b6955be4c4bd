//! AccessToken

use chrono::DateTime;
use chrono::Utc;

/// The token pair issued by a successful password grant.
///
/// Both tokens are always present and non-empty; the remaining fields are
/// whatever the server chose to report.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The bearer token used for API authentication.
    pub access_token: String,
    /// Refresh token for obtaining new access tokens without the password.
    pub refresh_token: String,
    /// Token type reported by the server, usually `Bearer`.
    pub token_type: Option<String>,
    /// Space-separated scopes actually granted.
    pub scope: Option<String>,
    /// When the token expires, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a token pair with no expiry or metadata.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: None,
            scope: None,
            expires_at: None,
        }
    }

    /// Iterates over the granted scopes.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.as_deref().unwrap_or_default().split_whitespace()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
