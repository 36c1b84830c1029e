use std::fmt;
use std::time::Duration;

use crate::error::DispatchError;

/// Host of the tracking service.
pub const DEFAULT_HOST: &str = "trk.kissmetrics.com";

/// Port of the tracking service.
pub const DEFAULT_PORT: u16 = 443;

/// Default `User-Agent` sent by clients built with [`build_client`].
pub const DEFAULT_USER_AGENT: &str = concat!("kisstrack/", env!("CARGO_PKG_VERSION"));

/// API key included verbatim as `_k` in every request.
///
/// Never validated. `Debug` output is redacted so the key does not end up in
/// logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Where calls are sent. Defaults to `https://trk.kissmetrics.com:443`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// Base URL without a path, e.g. `https://trk.kissmetrics.com:443`.
    /// IPv6 literals are bracketed.
    pub fn base_url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{}://[{}]:{}", self.scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Settings for [`build_client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Total time allowed for one request, body included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// How long an idle keep-alive connection stays in the pool.
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 8,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Builds a keep-alive HTTP client suitable for sharing across calls.
///
/// Redirects are never followed: the service does not redirect, and
/// following one would hand the API key to another host.
pub fn build_client(config: &ClientConfig) -> Result<reqwest::Client, DispatchError> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(DispatchError::ClientBuild)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret");
        let debug = format!("{key:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
        assert_eq!(key.as_str(), "super-secret");
    }

    #[test]
    fn default_endpoint_is_tracking_host() {
        let endpoint = Endpoint::default();
        assert_eq!(endpoint.base_url(), "https://trk.kissmetrics.com:443");
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        assert_eq!(Endpoint::new("http", "::1", 8080).base_url(), "http://[::1]:8080");
        assert_eq!(Endpoint::new("http", "[::1]", 8080).base_url(), "http://[::1]:8080");
        assert_eq!(Endpoint::new("http", "127.0.0.1", 80).base_url(), "http://127.0.0.1:80");
    }

    #[test]
    fn default_client_builds() {
        assert!(build_client(&ClientConfig::default()).is_ok());
    }
}
