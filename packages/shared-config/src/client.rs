//! REST client configuration types

use crate::{get_env_or_default, parse_env, ConfigError, ConfigResult, CredentialsConfig};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Configuration for clients talking to a SecRest server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, without the `/api` prefix
    pub base_url: String,

    /// Credentials sent with every authenticated request
    pub credentials: CredentialsConfig,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl ClientConfig {
    /// Load client configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let base_url = get_env_or_default("API_BASE_URL", DEFAULT_BASE_URL);

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(
                "API_BASE_URL".to_string(),
                format!("expected an http(s) URL, got '{}'", base_url),
            ));
        }

        Ok(Self {
            base_url,
            credentials: CredentialsConfig::from_env()?,
            timeout_secs: parse_env("API_CLIENT_TIMEOUT", 10)?,
            connect_timeout_secs: parse_env("API_CLIENT_CONNECT_TIMEOUT", 5)?,
        })
    }

    /// Create a configuration for a custom server (useful for testing)
    pub fn new(base_url: impl Into<String>, credentials: CredentialsConfig) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, CredentialsConfig::default())
    }
}
