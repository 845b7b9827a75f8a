//! API credential configuration types

use crate::{get_env_or_default, ConfigError, ConfigResult};

/// Username used when `API_USERNAME` is not set
pub const DEFAULT_USERNAME: &str = "admin";

/// Password used when `API_PASSWORD` is not set (development only)
pub const DEFAULT_PASSWORD: &str = "adminpass";

/// HTTP Basic credentials guarding the `/api` routes
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialsConfig {
    /// Account name
    pub username: String,

    /// Account password
    pub password: String,
}

impl CredentialsConfig {
    /// Load credentials from `API_USERNAME` / `API_PASSWORD`
    pub fn from_env() -> ConfigResult<Self> {
        let credentials = Self {
            username: get_env_or_default("API_USERNAME", DEFAULT_USERNAME),
            password: get_env_or_default("API_PASSWORD", DEFAULT_PASSWORD),
        };

        if credentials.username.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "API_USERNAME".to_string(),
                "username cannot be empty".to_string(),
            ));
        }

        if credentials.username.contains(':') {
            return Err(ConfigError::InvalidValue(
                "API_USERNAME".to_string(),
                "username cannot contain ':'".to_string(),
            ));
        }

        Ok(credentials)
    }

    /// Create credentials directly (useful for testing)
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Whether the password is still the development default
    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_PASSWORD
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
