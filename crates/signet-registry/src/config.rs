//! Configuration types for the registry client.

use std::time::Duration;

use signet_core::DEFAULT_SIGNATURE_SUFFIX;

/// Configuration for the registry client.
///
/// Built once at startup and shared by reference across all request-scoped
/// operations; per-request state (the caller's credential) travels as a
/// [`RegistryCredential`] argument instead.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,

    /// Suffix of the derived signature namespace tag.
    pub signature_suffix: String,

    /// Talk plain HTTP instead of HTTPS (local registries and tests only).
    pub plain_http: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryConfig {
    /// Creates a configuration with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use signet_registry::RegistryConfig;
    ///
    /// let config = RegistryConfig::new();
    /// assert_eq!(config.signature_suffix, "eth");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("signet/{}", env!("CARGO_PKG_VERSION")),
            signature_suffix: DEFAULT_SIGNATURE_SUFFIX.to_string(),
            plain_http: false,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the signature namespace suffix.
    #[must_use]
    pub fn with_signature_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.signature_suffix = suffix.into();
        self
    }

    /// Enables plain-HTTP registry access.
    #[must_use]
    pub const fn with_plain_http(mut self, plain_http: bool) -> Self {
        self.plain_http = plain_http;
        self
    }

    /// Returns the base URL for a registry host.
    #[must_use]
    pub fn base_url(&self, registry: &str) -> String {
        let scheme = if self.plain_http { "http" } else { "https" };
        format!("{scheme}://{registry}")
    }
}

/// A per-request credential forwarded to the registry.
#[derive(Debug, Clone)]
pub enum RegistryCredential {
    /// No authentication (public repositories, local development).
    Anonymous,

    /// Basic authentication (username/password or username/token).
    Basic {
        /// Username.
        username: String,
        /// Password or token.
        password: String,
    },

    /// Bearer token authentication.
    Bearer {
        /// Token value.
        token: String,
    },
}

impl RegistryCredential {
    /// Creates basic authentication.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates bearer token authentication.
    ///
    /// # Examples
    ///
    /// ```
    /// use signet_registry::RegistryCredential;
    ///
    /// let credential = RegistryCredential::bearer("my-token");
    /// ```
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }
}
