//! Client configuration
//!
//! The service provider registered on the identity server is identified by a
//! client ID/secret pair and the tenant domain it lives in. These are read
//! from a small JSON file:
//!
//! ```json
//! {
//!   "clientId": "cid",
//!   "clientSecret": "csecret",
//!   "tenantDomain": "carbon.super"
//! }
//! ```
//!
//! Each value can be overridden through the environment, which is handy for
//! CI where writing the file is awkward.

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;
use crate::fs;

/// Default file name of the client config inside the config directory.
pub const CONFIG_FILE: &str = "iamctl.json";

/// Overrides `clientId`.
pub const ENV_CLIENT_ID: &str = "IAMCTL_CLIENT_ID";
/// Overrides `clientSecret`.
pub const ENV_CLIENT_SECRET: &str = "IAMCTL_CLIENT_SECRET";
/// Overrides `tenantDomain`.
pub const ENV_TENANT_DOMAIN: &str = "IAMCTL_TENANT_DOMAIN";

/// OAuth2 client credentials of the registered service provider.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCredentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub tenant_domain: String,
}

impl ClientCredentials {
    /// Creates credentials from explicit values.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        tenant_domain: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            tenant_domain: tenant_domain.into(),
        }
    }

    /// Loads credentials from `path`, applies environment overrides and
    /// validates the result.
    ///
    /// A missing file is only an error when the environment does not supply
    /// every value on its own.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok()).await
    }

    /// Like [`ClientCredentials::load`] but with a custom override lookup.
    pub async fn load_with<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_file = match tokio::fs::read_to_string(path).await {
            Ok(contents) => Some(Self::from_json(path, &contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let found = from_file.is_some();

        let credentials = from_file.unwrap_or_default().with_overrides(lookup);
        match credentials.validate() {
            Ok(()) => {
                log::debug!(
                    "Resolved client {} for tenant {}",
                    credentials.client_id,
                    credentials.tenant_domain
                );
                Ok(credentials)
            }
            Err(_) if !found => Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Parses the JSON contents of a config file.
    pub fn from_json(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replaces each field whose override is set and non-empty.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_CLIENT_ID) {
            self.client_id = v;
        }
        if let Some(v) = get(ENV_CLIENT_SECRET) {
            self.client_secret = v;
        }
        if let Some(v) = get(ENV_TENANT_DOMAIN) {
            self.tenant_domain = v;
        }
        self
    }

    /// Checks that all three values are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::MissingField("clientId"));
        }
        if self.client_secret.trim().is_empty() {
            return Err(ConfigError::MissingField("clientSecret"));
        }
        if self.tenant_domain.trim().is_empty() {
            return Err(ConfigError::MissingField("tenantDomain"));
        }
        Ok(())
    }

    /// Writes the credentials to `path`, replacing any existing file.
    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        let json = serde_json::to_vec_pretty(self).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write_private(path, &json)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        log::info!("Wrote client config to {}", path.display());
        Ok(())
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("tenant_domain", &self.tenant_domain)
            .finish()
    }
}
