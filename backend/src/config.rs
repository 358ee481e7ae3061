//! Configuration management for the weather aggregator
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with WXAGG_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Upstream weather providers
    pub providers: ProvidersConfig,

    /// City search upstream
    pub geocoding: GeocodingConfig,

    /// Forecast and history sizes
    pub forecast: ForecastConfig,

    /// Path of the JSON error catalog
    pub errors_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    /// NASA POWER base URL
    pub power_url: String,
    pub power_timeout_secs: u64,

    /// GMAO forecast base URL
    pub gmao_url: String,
    pub gmao_timeout_secs: u64,

    /// Worldview snapshot service base URL
    pub worldview_url: String,
    pub worldview_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    /// Nominatim-compatible search base URL
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Number of forecast days in a report
    pub days: usize,

    /// Simulated samples per probability dimension
    pub historical_samples: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("WXAGG_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let server = ServerConfig::default();
        let providers = ProvidersConfig::default();
        let geocoding = GeocodingConfig::default();
        let forecast = ForecastConfig::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", server.port as i64)?
            .set_default("server.host", server.host)?
            .set_default("providers.power_url", providers.power_url)?
            .set_default("providers.power_timeout_secs", providers.power_timeout_secs as i64)?
            .set_default("providers.gmao_url", providers.gmao_url)?
            .set_default("providers.gmao_timeout_secs", providers.gmao_timeout_secs as i64)?
            .set_default("providers.worldview_url", providers.worldview_url)?
            .set_default("providers.worldview_timeout_secs", providers.worldview_timeout_secs as i64)?
            .set_default("geocoding.url", geocoding.url)?
            .set_default("geocoding.timeout_secs", geocoding.timeout_secs as i64)?
            .set_default("geocoding.user_agent", geocoding.user_agent)?
            .set_default("forecast.days", forecast.days as i64)?
            .set_default("forecast.historical_samples", forecast.historical_samples as i64)?
            .set_default("errors_path", "config/errors.json")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WXAGG_ prefix)
            .add_source(
                Environment::with_prefix("WXAGG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes that would produce empty forecasts or probabilities
    /// computed from no samples
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forecast.days == 0 {
            return Err(ConfigError::Message(
                "forecast.days must be at least 1".to_string(),
            ));
        }
        if self.forecast.historical_samples == 0 {
            return Err(ConfigError::Message(
                "forecast.historical_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl ProvidersConfig {
    pub fn power_timeout(&self) -> Duration {
        Duration::from_secs(self.power_timeout_secs)
    }

    pub fn gmao_timeout(&self) -> Duration {
        Duration::from_secs(self.gmao_timeout_secs)
    }

    pub fn worldview_timeout(&self) -> Duration {
        Duration::from_secs(self.worldview_timeout_secs)
    }
}

impl GeocodingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            providers: ProvidersConfig::default(),
            geocoding: GeocodingConfig::default(),
            forecast: ForecastConfig::default(),
            errors_path: "config/errors.json".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            power_url: "https://power.larc.nasa.gov".to_string(),
            power_timeout_secs: 15,
            gmao_url: "https://gmao.gsfc.nasa.gov/api".to_string(),
            gmao_timeout_secs: 15,
            worldview_url: "https://wvs.earthdata.nasa.gov".to_string(),
            worldview_timeout_secs: 10,
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            url: "https://nominatim.openstreetmap.org".to_string(),
            timeout_secs: 10,
            user_agent: format!("weather-aggregator/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            days: shared::climate::DEFAULT_FORECAST_DAYS,
            historical_samples: shared::climate::DEFAULT_HISTORY_SAMPLES,
        }
    }
}
