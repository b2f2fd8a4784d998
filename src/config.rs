//! Configuration management for `TripScout`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripScoutError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Substring marking a credential that has not been supplied yet
pub const PLACEHOLDER_MARKER: &str = "YOUR_";

/// Returns true when a credential is unset or still holds its placeholder.
#[must_use]
pub fn is_placeholder(key: &str) -> bool {
    key.trim().is_empty() || key.contains(PLACEHOLDER_MARKER)
}

/// Root configuration structure for `TripScout`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripScoutConfig {
    /// Weather provider (OpenWeatherMap)
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Image search provider (Unsplash)
    #[serde(default)]
    pub images: ImagesConfig,
    /// Generative-text provider (Gemini)
    #[serde(default)]
    pub generative: GenerativeConfig,
    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web server settings
    #[serde(default)]
    pub web: WebConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_api_key")]
    pub api_key: String,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

/// Image search API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_images_api_key")]
    pub api_key: String,
    #[serde(default = "default_images_base_url")]
    pub base_url: String,
    /// Number of images requested per search
    #[serde(default = "default_images_per_page")]
    pub per_page: u32,
}

/// Generative-text API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerativeConfig {
    #[serde(default = "default_generative_api_key")]
    pub api_key: String,
    #[serde(default = "default_generative_base_url")]
    pub base_url: String,
    #[serde(default = "default_generative_model")]
    pub model: String,
}

/// HTTP client settings shared by all providers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds, transport default when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// OTLP/HTTP collector endpoint for span export
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// Directory holding the static browser page
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// PEM certificate and key, serves HTTPS when both are set
    #[serde(default)]
    pub tls_cert_path: Option<String>,
    #[serde(default)]
    pub tls_key_path: Option<String>,
}

// Default value functions
fn default_weather_api_key() -> String {
    "YOUR_OPENWEATHERMAP_API_KEY".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_images_api_key() -> String {
    "YOUR_UNSPLASH_ACCESS_KEY".to_string()
}

fn default_images_base_url() -> String {
    "https://api.unsplash.com".to_string()
}

fn default_images_per_page() -> u32 {
    9
}

fn default_generative_api_key() -> String {
    "YOUR_GEMINI_API_KEY".to_string()
}

fn default_generative_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_generative_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_web_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "frontend".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: default_weather_api_key(),
            base_url: default_weather_base_url(),
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            api_key: default_images_api_key(),
            base_url: default_images_base_url(),
            per_page: default_images_per_page(),
        }
    }
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            api_key: default_generative_api_key(),
            base_url: default_generative_base_url(),
            model: default_generative_model(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            static_dir: default_static_dir(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

impl TripScoutConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRIPSCOUT_WEATHER__API_KEY -> weather.api_key
        builder = builder.add_source(
            Environment::with_prefix("TRIPSCOUT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripScoutConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripscout").join("config.toml"))
    }

    /// Apply default values to fields that were provided but left empty
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.images.base_url.is_empty() {
            self.images.base_url = default_images_base_url();
        }
        if self.images.per_page == 0 {
            self.images.per_page = default_images_per_page();
        }
        if self.generative.base_url.is_empty() {
            self.generative.base_url = default_generative_base_url();
        }
        if self.generative.model.is_empty() {
            self.generative.model = default_generative_model();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.web.static_dir.is_empty() {
            self.web.static_dir = default_static_dir();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// True when both search credentials are supplied
    #[must_use]
    pub fn search_configured(&self) -> bool {
        !is_placeholder(&self.weather.api_key) && !is_placeholder(&self.images.api_key)
    }

    /// True when the generative-text credential is supplied
    #[must_use]
    pub fn itinerary_configured(&self) -> bool {
        !is_placeholder(&self.generative.api_key)
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(1..=30).contains(&self.images.per_page) {
            return Err(TripScoutError::config("Images per_page must be between 1 and 30").into());
        }

        if self.web.port == 0 {
            return Err(TripScoutError::config("Web port cannot be 0").into());
        }

        if self.http.timeout_seconds.is_some_and(|secs| secs > 300) {
            return Err(TripScoutError::config("HTTP timeout cannot exceed 300 seconds").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripScoutError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripScoutError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Weather", &self.weather.base_url),
            ("Images", &self.images.base_url),
            ("Generative", &self.generative.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TripScoutError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
