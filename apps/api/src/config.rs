//! API server configuration

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use secrest_shared_config::{CommonConfig, CredentialsConfig, DatabaseConfig, Environment};

/// Where privileges are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => bail!(
                "Unknown STORAGE_BACKEND '{}' (expected 'postgres' or 'memory')",
                other
            ),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with the clients
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// Storage backend (default: postgres)
    pub storage: StorageBackend,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode, this function requires:
    /// - `API_PASSWORD`: Must be set to something other than the default
    /// - `DATABASE_URL`: Must be explicitly set when storing in PostgreSQL
    ///
    /// In development/staging mode, sensible defaults are used for convenience.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();
        let is_production = environment.is_production();

        let storage: StorageBackend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;

        if is_production && storage == StorageBackend::Postgres {
            Self::validate_database_url()?;
        }

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        Self::validate_credentials(&common.credentials, is_production)?;

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT value")?,

            storage,

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    /// Refuse the built-in password in production
    fn validate_credentials(credentials: &CredentialsConfig, is_production: bool) -> Result<()> {
        if !credentials.uses_default_password() {
            return Ok(());
        }

        if is_production {
            bail!(
                "API_PASSWORD environment variable is required in production. \
                 Please set a password other than the default."
            );
        }

        tracing::warn!(
            "API_PASSWORD not set, using insecure default. \
             This is only acceptable in development mode."
        );
        Ok(())
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your PostgreSQL connection string."
                );
            }
        }
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get the credentials guarding `/api`
    pub fn credentials(&self) -> &CredentialsConfig {
        &self.common.credentials
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}
