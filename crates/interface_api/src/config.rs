//! API configuration

use serde::Deserialize;

use core_kernel::{CoreError, Currency};

/// API configuration
///
/// Read from `CMCS_*` environment variables; anything unset keeps its default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// PostgreSQL URL; the in-memory stores are used when unset
    pub database_url: Option<String>,
    /// Log level
    pub log_level: String,
    /// Seed one demo user per role into an empty user directory
    pub seed_demo_users: bool,
    /// ISO code of the currency claims are paid in
    pub currency: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: None,
            log_level: "info".to_string(),
            seed_demo_users: false,
            currency: "ZAR".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CMCS").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The configured payment currency
    pub fn currency(&self) -> Result<Currency, CoreError> {
        self.currency
            .parse()
            .map_err(|e| CoreError::configuration(format!("CMCS_CURRENCY: {}", e)))
    }

    /// Rejects settings the server cannot run with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(CoreError::configuration("CMCS_JWT_SECRET must not be empty"));
        }
        if self.jwt_expiration_secs == 0 {
            return Err(CoreError::configuration(
                "CMCS_JWT_EXPIRATION_SECS must be greater than 0",
            ));
        }
        if self
            .database_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            return Err(CoreError::configuration("CMCS_DATABASE_URL is set but empty"));
        }
        self.currency()?;
        Ok(())
    }
}
