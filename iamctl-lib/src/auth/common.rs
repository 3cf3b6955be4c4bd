//! Shared authentication utilities

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;

use super::AccessToken;
use crate::error::AuthError;

/// Scope requested on every password grant.
///
/// Must match the scopes registered for the service provider on the
/// identity server, so it is sent verbatim.
pub const SCOPE: &str = "/permission/admin/manage/identity/applicationmgt/update \
/permission/admin/manage/identity/applicationmgt/create \
/permission/admin/manage/identity/applicationmgt/view \
internal_application_mgt_update \
internal_application_mgt_create \
internal_application_mgt_view";

/// Path of the token endpoint relative to the server URL.
pub const TOKEN_PATH: &str = "/oauth2/token";

// =============================================================================
// URL Helpers
// =============================================================================

/// Build the token endpoint URL from the server base URL.
///
/// The base URL must be an absolute `http` or `https` URL. A trailing slash is
/// ignored so `https://idp/` and `https://idp` yield the same endpoint.
pub(crate) fn token_url(server_url: &str) -> Result<String, AuthError> {
    let server_url = server_url.trim();
    if server_url.is_empty() {
        return Err(AuthError::InvalidRequest("server URL is empty".to_string()));
    }

    let parsed = url::Url::parse(server_url)
        .map_err(|e| AuthError::InvalidRequest(format!("invalid server URL {server_url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AuthError::InvalidRequest(format!(
                "unsupported URL scheme `{other}` in {server_url}"
            )));
        }
    }

    Ok(format!("{}{}", server_url.trim_end_matches('/'), TOKEN_PATH))
}

// =============================================================================
// Token Response Parsing
// =============================================================================

/// Token response from the identity server.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_expires_in")]
    pub expires_in: Option<u64>,
}

/// Deserializes `expires_in` which can be either a number or a string.
fn deserialize_expires_in<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(u64),
    }

    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::Number(n)) => Ok(Some(n)),
        Some(StringOrNumber::String(s)) => s
            .parse::<u64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid expires_in value: {}", s))),
    }
}

impl TokenResponse {
    /// Parses a success body and checks that both tokens are present.
    pub fn parse(body: &str) -> Result<Self, AuthError> {
        let response: TokenResponse = serde_json::from_str(body)
            .map_err(|e| AuthError::Parse(format!("invalid token response JSON: {e}")))?;

        if response.access_token.as_deref().is_none_or(str::is_empty) {
            return Err(AuthError::Parse(
                "token response is missing `access_token`".to_string(),
            ));
        }
        if response.refresh_token.as_deref().is_none_or(str::is_empty) {
            return Err(AuthError::Parse(
                "token response is missing `refresh_token`".to_string(),
            ));
        }

        Ok(response)
    }

    /// Converts a response that already passed [`TokenResponse::parse`].
    pub fn into_access_token(self) -> AccessToken {
        let expires_at = self.expires_in.and_then(expires_at_from_now);

        AccessToken {
            access_token: self.access_token.unwrap_or_default(),
            refresh_token: self.refresh_token.unwrap_or_default(),
            token_type: self.token_type,
            scope: self.scope,
            expires_at,
        }
    }
}

/// `now + secs`, or `None` when the result is outside chrono's range.
fn expires_at_from_now(secs: u64) -> Option<DateTime<Utc>> {
    let lifetime = Duration::try_seconds(i64::try_from(secs).ok()?)?;
    Utc::now().checked_add_signed(lifetime)
}

/// Error response from the identity server.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

impl ErrorResponse {
    /// Parses an error body, falling back to `unknown` for non-JSON bodies.
    pub fn parse_or_unknown(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| ErrorResponse {
            error: "unknown".to_string(),
            error_description: None,
        })
    }
}

/// Maps OAuth2 error codes to AuthError variants.
pub(crate) fn map_error_response(status: u16, error: ErrorResponse) -> AuthError {
    let message = error
        .error_description
        .clone()
        .unwrap_or_else(|| error.error.clone());

    match error.error.as_str() {
        "invalid_grant" => AuthError::InvalidCredentials { message },
        "invalid_client" | "unauthorized_client" => AuthError::InvalidClient { message },
        "invalid_scope" => AuthError::InvalidScope { message },
        _ => AuthError::Http {
            status,
            error: error.error,
            description: error.error_description,
        },
    }
}
