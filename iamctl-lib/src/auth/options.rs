//! Transport options for the token request

use std::time::Duration;

/// Default timeout for the token request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options controlling how the token request is sent.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use iamctl_lib::auth::FlowOptions;
///
/// let options = FlowOptions::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_legacy_user_field(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowOptions {
    /// Upper bound on the whole request, connect included.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// Accept any TLS certificate. Only for self-signed test servers.
    ///
    /// Default: false
    pub insecure: bool,

    /// Also send `user=<clientId>:<clientSecret>` as a form field.
    ///
    /// Some older identity server deployments expect it even though the same
    /// credentials travel in the Basic Auth header.
    ///
    /// Default: false
    pub legacy_user_field: bool,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
            legacy_user_field: false,
        }
    }
}

impl FlowOptions {
    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables TLS certificate verification.
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Enables the redundant `user` form field.
    pub fn with_legacy_user_field(mut self, enabled: bool) -> Self {
        self.legacy_user_field = enabled;
        self
    }
}
