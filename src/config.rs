//! Configuration management for the Tripwise front end
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripwiseError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the Tripwise application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripwiseConfig {
    /// Travel backend configuration
    #[serde(default)]
    pub backend: BackendConfig,
    /// Mapping provider configuration
    #[serde(default)]
    pub maps: MapsConfig,
    /// Display language settings
    #[serde(default)]
    pub language: LanguageConfig,
    /// Web shell settings
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which value keys the weather lookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKey {
    /// The raw text the user searched for
    #[default]
    Query,
    /// The formatted address of the resolved place
    Address,
}

/// Travel backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend exposing `/api/places`, `/api/weather`, ...
    #[serde(default = "default_backend_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_backend_timeout")]
    pub timeout_seconds: u32,
    /// Key used for the weather lookup
    #[serde(default)]
    pub weather_key: WeatherKey,
}

/// Mapping provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    /// Google Maps API key
    pub api_key: Option<String>,
    /// Base URL of the Google Maps web services
    #[serde(default = "default_maps_base_url")]
    pub base_url: String,
    /// Proximity search radius in meters
    #[serde(default = "default_search_radius")]
    pub search_radius_m: u32,
    /// Initial zoom of the map view
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

/// Display language settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Base language of all source content
    #[serde(default = "default_language")]
    pub default: String,
}

/// Web shell settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory with the static front-end assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
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
}

// Default value functions
fn default_backend_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_backend_timeout() -> u32 {
    30
}

fn default_maps_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_search_radius() -> u32 {
    1500
}

fn default_zoom() -> u8 {
    14
}

fn default_language() -> String {
    "ES".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_base_url(),
            timeout_seconds: default_backend_timeout(),
            weather_key: WeatherKey::default(),
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_maps_base_url(),
            search_radius_m: default_search_radius(),
            zoom: default_zoom(),
        }
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default: default_language(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl TripwiseConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRIPWISE_BACKEND__BASE_URL=... overrides backend.base_url
        builder = builder.add_source(
            Environment::with_prefix("TRIPWISE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripwiseConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripwise").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.backend.base_url.is_empty() {
            self.backend.base_url = default_backend_base_url();
        }
        if self.backend.timeout_seconds == 0 {
            self.backend.timeout_seconds = default_backend_timeout();
        }
        if self.maps.base_url.is_empty() {
            self.maps.base_url = default_maps_base_url();
        }
        if self.maps.search_radius_m == 0 {
            self.maps.search_radius_m = default_search_radius();
        }
        if self.maps.zoom == 0 {
            self.maps.zoom = default_zoom();
        }
        if self.language.default.trim().is_empty() {
            self.language.default = default_language();
        }
        self.language.default = self.language.default.trim().to_uppercase();
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        // The backend paths already start with '/'
        while self.backend.base_url.ends_with('/') {
            self.backend.base_url.pop();
        }
        while self.maps.base_url.ends_with('/') {
            self.maps.base_url.pop();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        for (name, url) in [
            ("Backend base URL", &self.backend.base_url),
            ("Maps base URL", &self.maps.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TripwiseError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if let Some(api_key) = &self.maps.api_key {
            if api_key.trim().is_empty() {
                return Err(TripwiseError::config(
                    "Maps API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.backend.timeout_seconds > 300 {
            return Err(
                TripwiseError::config("Backend timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.maps.search_radius_m > 50_000 {
            return Err(TripwiseError::config(
                "Search radius cannot exceed 50000 meters",
            )
            .into());
        }

        if !(1..=21).contains(&self.maps.zoom) {
            return Err(TripwiseError::config("Map zoom must be between 1 and 21").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripwiseError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripwiseError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self
            .language
            .default
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '-')
        {
            return Err(TripwiseError::config(format!(
                "Invalid default language '{}'",
                self.language.default
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TripwiseConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.backend.timeout_seconds, 30);
        assert_eq!(config.backend.weather_key, WeatherKey::Query);
        assert_eq!(config.maps.search_radius_m, 1500);
        assert_eq!(config.maps.zoom, 14);
        assert_eq!(config.language.default, "ES");
        assert_eq!(config.logging.level, "info");
        assert!(config.maps.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TripwiseConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TripwiseConfig::default();
        config.backend.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = TripwiseConfig::default();
        config.maps.zoom = 30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_non_http_url() {
        let mut config = TripwiseConfig::default();
        config.backend.base_url = "ftp://example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Backend base URL"));
    }

    #[test]
    fn test_apply_defaults_normalizes_values() {
        let mut config = TripwiseConfig::default();
        config.backend.base_url = "https://backend.example.com/".to_string();
        config.language.default = " en ".to_string();
        config.maps.zoom = 0;
        config.apply_defaults();
        assert_eq!(config.backend.base_url, "https://backend.example.com");
        assert_eq!(config.language.default, "EN");
        assert_eq!(config.maps.zoom, 14);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[backend]
base_url = "https://tripwise.example.com/"
weather_key = "address"

[maps]
search_radius_m = 800
"#
        )
        .unwrap();

        let config = TripwiseConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.backend.base_url, "https://tripwise.example.com");
        assert_eq!(config.backend.weather_key, WeatherKey::Address);
        assert_eq!(config.maps.search_radius_m, 800);
        assert_eq!(config.maps.zoom, 14);
        assert_eq!(config.language.default, "ES");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = TripwiseConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("tripwise"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
