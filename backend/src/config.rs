//! Configuration management for the bike demand predictor
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with BDP_ prefix

use std::path::PathBuf;
use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Model and scaler artifact locations
    pub artifacts: ArtifactsConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactsConfig {
    /// Gradient-boosted model exported in XGBoost JSON format
    pub model_path: PathBuf,

    /// Fitted standard scaler parameters as JSON
    pub scaler_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key; empty disables the weather panel
    pub api_key: String,

    /// City shown in the weather panel
    pub city: String,

    /// Upper bound on a single weather request
    pub timeout_secs: u64,
}

impl WeatherConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("BDP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        // Key name used by earlier deployments
        let legacy_api_key = std::env::var("MY_API_TOKEN").unwrap_or_default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8501)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("artifacts.model_path", "artifacts/xgboost_model.json")?
            .set_default("artifacts.scaler_path", "artifacts/scaler.json")?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.api_key", legacy_api_key)?
            .set_default("weather.city", "Seoul")?
            .set_default("weather.timeout_secs", 5)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BDP_ prefix)
            .add_source(
                Environment::with_prefix("BDP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_configured_requires_key() {
        let mut weather = WeatherConfig {
            api_endpoint: "https://api.openweathermap.org/data/2.5".to_string(),
            api_key: "  ".to_string(),
            city: "Seoul".to_string(),
            timeout_secs: 5,
        };
        assert!(!weather.is_configured());

        weather.api_key = "abc123".to_string();
        assert!(weather.is_configured());
        assert_eq!(weather.timeout(), Duration::from_secs(5));
    }

    /// Environment mutation stays in one test so nothing else reads it concurrently
    #[test]
    fn test_load_layers_legacy_key_and_overrides() {
        std::env::remove_var("BDP_ENVIRONMENT");
        std::env::remove_var("BDP__WEATHER__API_KEY");
        std::env::remove_var("BDP__WEATHER__TIMEOUT_SECS");
        std::env::set_var("MY_API_TOKEN", "legacy-token");

        let config = Config::load().unwrap();
        assert_eq!(config.environment, "development");
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.artifacts.model_path, PathBuf::from("artifacts/xgboost_model.json"));
        assert_eq!(config.weather.api_key, "legacy-token");
        assert_eq!(config.weather.city, "Seoul");
        assert_eq!(config.weather.timeout(), Duration::from_secs(5));

        std::env::set_var("BDP__WEATHER__API_KEY", "override-token");
        std::env::set_var("BDP__WEATHER__TIMEOUT_SECS", "9");

        let config = Config::load().unwrap();
        assert_eq!(config.weather.api_key, "override-token");
        assert_eq!(config.weather.timeout(), Duration::from_secs(9));

        std::env::remove_var("BDP__WEATHER__API_KEY");
        std::env::remove_var("BDP__WEATHER__TIMEOUT_SECS");
        std::env::remove_var("MY_API_TOKEN");
    }
}
