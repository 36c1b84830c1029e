//! Configuration loading from file and environment variables.

use std::fmt;
use std::time::Duration;

use kisstrack_client::{ApiKey, ClientConfig, Endpoint, DEFAULT_HOST, DEFAULT_PORT};
use serde::Deserialize;
use thiserror::Error;

/// Top-level CLI configuration.
#[derive(Clone, Default, Deserialize)]
pub struct Config {
    /// Account API key sent as `_k`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Where calls are sent.
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint", &self.endpoint)
            .field("http", &self.http)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Tracking endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,

    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,

    /// Overrides the default `User-Agent` header.
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "kisstrack_client=debug,warn").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_pool_idle_timeout_secs() -> u64 {
    90
}

fn default_pool_max_idle_per_host() -> usize {
    8
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            user_agent: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// Returns the API key, or an error if none was configured.
    pub fn api_key(&self) -> Result<ApiKey, ConfigError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(ApiKey::new(key)),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(
            self.endpoint.scheme.clone(),
            self.endpoint.host.clone(),
            self.endpoint.port,
        )
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut client = ClientConfig {
            timeout: Duration::from_secs(self.http.timeout_secs),
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
            pool_idle_timeout: Duration::from_secs(self.http.pool_idle_timeout_secs),
            pool_max_idle_per_host: self.http.pool_max_idle_per_host,
            ..ClientConfig::default()
        };
        if let Some(agent) = &self.http.user_agent {
            client.user_agent = agent.clone();
        }
        client
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// No API key in the file or the environment.
    #[error("no API key configured; set `api_key` or KISSTRACK_API_KEY")]
    MissingApiKey,
}

/// Loads configuration from a TOML file, falling back to defaults when the
/// file does not exist, then applies environment overrides.
///
/// Environment variable overrides:
/// - `KISSTRACK_API_KEY` overrides `api_key`
/// - `KISSTRACK_SCHEME` overrides `endpoint.scheme`
/// - `KISSTRACK_HOST` overrides `endpoint.host`
/// - `KISSTRACK_PORT` overrides `endpoint.port`
/// - `KISSTRACK_TIMEOUT_SECS` overrides `http.timeout_secs`
/// - `KISSTRACK_LOG_LEVEL` overrides `logging.level`
/// - `KISSTRACK_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let mut config = read_config_file(path)?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

fn read_config_file(path: &str) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path, "config file not found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(ConfigError::FileRead(e)),
    }
}

/// Applies overrides from `lookup`, which maps a variable name to its value.
/// Unparseable numeric values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("KISSTRACK_API_KEY") {
        config.api_key = Some(key);
    }
    if let Some(scheme) = lookup("KISSTRACK_SCHEME") {
        config.endpoint.scheme = scheme;
    }
    if let Some(host) = lookup("KISSTRACK_HOST") {
        config.endpoint.host = host;
    }
    if let Some(port) = lookup("KISSTRACK_PORT") {
        if let Ok(parsed) = port.parse() {
            config.endpoint.port = parsed;
        }
    }
    if let Some(timeout) = lookup("KISSTRACK_TIMEOUT_SECS") {
        if let Ok(parsed) = timeout.parse() {
            config.http.timeout_secs = parsed;
        }
    }
    if let Some(level) = lookup("KISSTRACK_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("KISSTRACK_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
}
