//! Configuration management for the collections desk client
//!
//! Loads the backend API location and client behaviour knobs from environment
//! variables, with support for different environments (development, staging,
//! production).

use std::env;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),
}

/// Application environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Get the environment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the collections backend API, including the version prefix
    pub api_base_url: String,

    /// Current environment
    pub environment: Environment,

    /// Request timeout in seconds for all backend calls
    pub request_timeout_secs: u64,

    /// Log level (RUST_LOG)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::parse(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let api_base_url = match env::var("COLLECTIONS_API_URL") {
            Ok(url) => url,
            // Production deployments must name the backend explicitly.
            Err(_) if environment.is_production() => {
                return Err(ConfigError::MissingEnvVar("COLLECTIONS_API_URL".to_string()))
            }
            Err(_) => "http://localhost:8000/api/v1".to_string(),
        };

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidTimeout("REQUEST_TIMEOUT_SECS must be a valid number".to_string())
            })?;

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            api_base_url,
            environment,
            request_timeout_secs,
            log_level,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: "http://localhost:8000/api/v1".to_string(),
            environment: Environment::Development,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("dev").unwrap(), Environment::Development);
        assert_eq!(
            Environment::parse("development").unwrap(),
            Environment::Development
        );
        assert_eq!(Environment::parse("staging").unwrap(), Environment::Staging);
        assert_eq!(Environment::parse("prod").unwrap(), Environment::Production);
        assert_eq!(
            Environment::parse("production").unwrap(),
            Environment::Production
        );

        // Case insensitive
        assert_eq!(Environment::parse("DEV").unwrap(), Environment::Development);
        assert_eq!(Environment::parse("PROD").unwrap(), Environment::Production);

        // Invalid
        assert!(Environment::parse("invalid").is_err());
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("COLLECTIONS_API_URL".to_string());
        assert!(err.to_string().contains("COLLECTIONS_API_URL"));

        let err = ConfigError::InvalidTimeout("abc".to_string());
        assert!(err.to_string().contains("abc"));
    }
}
