//! Authentication error types

use std::time::Duration;

/// Errors that can occur during the password grant exchange.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A request parameter was empty or malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid username or password (`invalid_grant`).
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    /// The client ID/secret pair was rejected.
    #[error("Invalid client: {message}")]
    InvalidClient { message: String },

    /// The server refused one of the requested scopes.
    #[error("Invalid scope: {message}")]
    InvalidScope { message: String },

    /// Any other non-success HTTP response from the token endpoint.
    #[error("HTTP {status}: {error}{}", .description.as_ref().map(|d| format!(" ({d})")).unwrap_or_default())]
    Http {
        /// HTTP status code.
        status: u16,
        /// OAuth2 `error` code, or `unknown` when the body had none.
        error: String,
        /// OAuth2 `error_description`, if present.
        description: Option<String>,
    },

    /// Network error during authentication.
    #[error("Network error during auth: {0}")]
    Network(#[from] reqwest::Error),

    /// The token endpoint did not answer in time.
    #[error("Token request timed out after {0:?}")]
    Timeout(Duration),

    /// Failed to parse authentication response.
    #[error("Auth response parse error: {0}")]
    Parse(String),
}

impl AuthError {
    /// Returns the HTTP status that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Http { status, .. } => Some(*status),
            AuthError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
