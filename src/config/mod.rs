//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ANTILOPAY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use antilopay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! let store = config.into_store().expect("Invalid configuration");
//!
//! println!("Talking to {}", store.runtime().base_url);
//! ```

mod credentials;
mod error;
mod logging;
mod runtime;
mod store;

pub use credentials::{Credentials, CredentialsConfig};
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use runtime::{RuntimeConfig, SignatureAlgorithm, SignatureEncoding, DEFAULT_BASE_URL};
pub use store::CredentialStore;

use std::sync::Arc;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Merchant credentials (identifiers and PEM keys)
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// API endpoint and signature scheme
    #[serde(default)]
    pub api: RuntimeConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ANTILOPAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ANTILOPAY__CREDENTIALS__SECRET_ID=...` -> `credentials.secret_id = ...`
    /// - `ANTILOPAY__API__SIGN_VERSION=2` -> `api.sign_version = 2`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    /// Missing credentials surface later, from [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ANTILOPAY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Reads key files, then checks credentials and runtime knobs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.credentials.resolve()?.validate()?;
        self.api.validate()?;
        Ok(())
    }

    /// Build the shared store every client component reads from.
    pub fn into_store(self) -> Result<Arc<CredentialStore>, ConfigError> {
        let credentials = self.credentials.resolve()?;
        Ok(CredentialStore::shared(credentials, self.api)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MERCHANT_PRIVATE_KEY, PROCESSOR_PUBLIC_KEY};
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("ANTILOPAY__CREDENTIALS__PROJECT_ID", "proj_test");
        env::set_var("ANTILOPAY__CREDENTIALS__SECRET_ID", "secret_test");
        env::set_var("ANTILOPAY__CREDENTIALS__PRIVATE_KEY", MERCHANT_PRIVATE_KEY);
        env::set_var("ANTILOPAY__CREDENTIALS__PUBLIC_KEY", PROCESSOR_PUBLIC_KEY);
    }

    fn clear_env() {
        env::remove_var("ANTILOPAY__CREDENTIALS__PROJECT_ID");
        env::remove_var("ANTILOPAY__CREDENTIALS__SECRET_ID");
        env::remove_var("ANTILOPAY__CREDENTIALS__PRIVATE_KEY");
        env::remove_var("ANTILOPAY__CREDENTIALS__PUBLIC_KEY");
        env::remove_var("ANTILOPAY__API__SIGN_VERSION");
        env::remove_var("ANTILOPAY__API__BASE_URL");
        env::remove_var("ANTILOPAY__LOGGING__JSON");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.credentials.project_id, "proj_test");
        assert_eq!(config.credentials.secret_id, "secret_test");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.sign_version, 1);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_custom_api_knobs() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("ANTILOPAY__API__SIGN_VERSION", "2");
        env::set_var("ANTILOPAY__API__BASE_URL", "https://sandbox.example.com/v1");
        env::set_var("ANTILOPAY__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.api.sign_version, 2);
        assert_eq!(config.api.base_url, "https://sandbox.example.com/v1");
        assert!(config.logging.json);
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let config = AppConfig {
            credentials: CredentialsConfig::default(),
            api: RuntimeConfig::default(),
            logging: LoggingConfig::default(),
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(ValidationError::MissingRequired(
                "PROJECT_ID"
            )))
        ));
    }

    #[test]
    fn test_into_store() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let store = result.unwrap().into_store().unwrap();
        assert_eq!(store.credentials().project_id(), "proj_test");
        assert_eq!(store.runtime().sign_version, 1);
    }
}
