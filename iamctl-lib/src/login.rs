//! Login: exchange a username/password for tokens and persist them.

use crate::auth::FlowOptions;
use crate::auth::PasswordFlow;
use crate::config::ClientCredentials;
use crate::error::Error;
use crate::store::ServerDetails;
use crate::store::TokenStore;

/// What the user supplied for one login.
#[derive(Clone)]
pub struct LoginRequest {
    /// Base URL of the identity server, e.g. `https://idp.example.com`.
    pub server_url: String,
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(
        server_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Runs one password grant and saves the result to `store`.
///
/// The store is only touched after the server has issued both tokens, so a
/// failed login leaves any previously stored details in place.
pub async fn login(
    request: &LoginRequest,
    credentials: &ClientCredentials,
    options: FlowOptions,
    store: &dyn TokenStore,
) -> Result<ServerDetails, Error> {
    credentials.validate()?;

    let flow = PasswordFlow::with_options(
        credentials.clone(),
        &request.username,
        &request.password,
        options,
    )?;
    let token = flow.authenticate(&request.server_url).await?;

    let details = ServerDetails::new(&request.server_url, token);
    store.save(&details).await?;

    Ok(details)
}
