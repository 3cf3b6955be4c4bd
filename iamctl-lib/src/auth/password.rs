//! Password flow (Resource Owner Password Credentials)

use reqwest::header::ACCEPT;

use super::common::ErrorResponse;
use super::common::SCOPE;
use super::common::TokenResponse;
use super::common::map_error_response;
use super::common::token_url;
use super::AccessToken;
use super::FlowOptions;
use crate::config::ClientCredentials;
use crate::error::AuthError;

/// OAuth2 Resource Owner Password Credentials (ROPC) flow with a confidential
/// client.
///
/// The client authenticates with HTTP Basic Auth and requests the fixed
/// application-management [`SCOPE`]. Each call to
/// [`authenticate`](PasswordFlow::authenticate) sends exactly one request;
/// nothing is retried.
///
/// # Example
///
/// ```ignore
/// use iamctl_lib::auth::PasswordFlow;
/// use iamctl_lib::config::ClientCredentials;
///
/// let credentials = ClientCredentials::new("cid", "csecret", "carbon.super");
/// let flow = PasswordFlow::new(credentials, "alice", "secret123")?;
///
/// let token = flow.authenticate("https://idp.example.com").await?;
/// ```
pub struct PasswordFlow {
    credentials: ClientCredentials,
    username: String,
    password: String,
    options: FlowOptions,
    http_client: reqwest::Client,
}

impl PasswordFlow {
    /// Creates a new password flow with default [`FlowOptions`].
    ///
    /// # Arguments
    ///
    /// * `credentials` - The service provider's client ID and secret
    /// * `username` - The user's login name
    /// * `password` - The user's password
    pub fn new(
        credentials: ClientCredentials,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, AuthError> {
        Self::with_options(credentials, username, password, FlowOptions::default())
    }

    /// Creates a new password flow with explicit transport options.
    pub fn with_options(
        credentials: ClientCredentials,
        username: impl Into<String>,
        password: impl Into<String>,
        options: FlowOptions,
    ) -> Result<Self, AuthError> {
        let username = username.into();
        let password = password.into();

        if username.trim().is_empty() {
            return Err(AuthError::InvalidRequest("username is empty".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidRequest("password is empty".to_string()));
        }
        if credentials.client_id.is_empty() || credentials.client_secret.is_empty() {
            return Err(AuthError::InvalidRequest(
                "client ID and secret are required".to_string(),
            ));
        }

        let http_client = build_http_client(&options)?;

        Ok(Self {
            credentials,
            username,
            password,
            options,
            http_client,
        })
    }

    /// Authenticates using username and password credentials.
    ///
    /// # Arguments
    ///
    /// * `server_url` - Base URL of the identity server (e.g., `https://idp.example.com`)
    ///
    /// # Returns
    ///
    /// The access and refresh token issued by the server.
    pub async fn authenticate(&self, server_url: &str) -> Result<AccessToken, AuthError> {
        let token_url = token_url(server_url)?;
        log::debug!(
            "Requesting token for {} from {}",
            self.username,
            token_url
        );

        let response = self
            .http_client
            .post(&token_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .header(ACCEPT, "application/json")
            .form(&self.form_params())
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        self.handle_response(response).await
    }

    fn form_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("grant_type", "password".to_string()),
            ("username", self.username.clone()),
            ("password", self.password.clone()),
            ("scope", SCOPE.to_string()),
        ];

        if self.options.legacy_user_field {
            params.push((
                "user",
                format!(
                    "{}:{}",
                    self.credentials.client_id, self.credentials.client_secret
                ),
            ));
        }

        params
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<AccessToken, AuthError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if status.is_success() {
            let token = TokenResponse::parse(&body)?.into_access_token();
            log::info!("Token issued for {}", self.username);
            Ok(token)
        } else {
            log::debug!("Token endpoint answered {}", status);
            Err(map_error_response(
                status.as_u16(),
                ErrorResponse::parse_or_unknown(&body),
            ))
        }
    }

    fn map_transport_error(&self, error: reqwest::Error) -> AuthError {
        if error.is_timeout() {
            AuthError::Timeout(self.options.timeout)
        } else {
            AuthError::Network(error)
        }
    }
}

fn build_http_client(options: &FlowOptions) -> Result<reqwest::Client, AuthError> {
    if options.insecure {
        log::warn!("TLS certificate verification is disabled for the token request");
    }

    let client = reqwest::Client::builder()
        .timeout(options.timeout)
        .danger_accept_invalid_certs(options.insecure)
        .build()?;
    Ok(client)
}

impl std::fmt::Debug for PasswordFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordFlow")
            .field("credentials", &self.credentials)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("options", &self.options)
            .finish()
    }
}
