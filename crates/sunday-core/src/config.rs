use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Remote API endpoints and credentials
    pub services: ServiceConfig,

    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the OpenWeather 2.5 API
    pub weather_api_url: String,

    /// OpenWeather API key (falls back to `OPENWEATHER_API_KEY`)
    #[serde(default)]
    pub weather_api_key: Option<String>,

    /// Base URL of the OpenCage geocoding API
    pub geocoding_api_url: String,

    /// OpenCage API key (falls back to `OPENCAGE_API_KEY`)
    #[serde(default)]
    pub geocoding_api_key: Option<String>,
}

/// Color theme of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Persisted theme choice
    #[serde(default)]
    pub theme: Theme,
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Temperature unit preference
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// Language code passed to both APIs
    #[serde(default = "default_language")]
    pub language: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Coordinates used by "search by location" when no positioning service exists
    #[serde(default)]
    pub default_latitude: Option<f64>,
    #[serde(default)]
    pub default_longitude: Option<f64>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            temperature_unit: TemperatureUnit::Celsius,
            language: default_language(),
            request_timeout_secs: default_request_timeout(),
            default_latitude: None,
            default_longitude: None,
        }
    }
}

impl WeatherConfig {
    /// Configured fallback coordinates, only when both halves are present
    pub fn default_coordinates(&self) -> Option<(f64, f64)> {
        match (self.default_latitude, self.default_longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sunday");

        Self {
            config_dir,
            services: ServiceConfig {
                weather_api_url: "https://api.openweathermap.org/data/2.5".to_string(),
                weather_api_key: None,
                geocoding_api_url: "https://api.opencagedata.com/geocode/v1".to_string(),
                geocoding_api_key: None,
            },
            ui: UiConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("sunday");
        Self::load_from(&config_dir)
    }

    /// Load configuration from `config_dir`, creating default if it doesn't exist
    pub fn load_from(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            let config = Self {
                config_dir: config_dir.to_path_buf(),
                ..Self::default()
            };
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let mut config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;
        config.config_dir = config_dir.to_path_buf();

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// OpenWeather key from the file, else from the environment
    pub fn weather_api_key(&self) -> Option<String> {
        non_empty(self.services.weather_api_key.clone())
            .or_else(|| non_empty(std::env::var("OPENWEATHER_API_KEY").ok()))
    }

    /// OpenCage key from the file, else from the environment
    pub fn geocoding_api_key(&self) -> Option<String> {
        non_empty(self.services.geocoding_api_key.clone())
            .or_else(|| non_empty(std::env::var("OPENCAGE_API_KEY").ok()))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.services.weather_api_url,
            "services.weather_api_url",
            &mut result,
        );
        self.validate_url(
            &self.services.geocoding_api_url,
            "services.geocoding_api_url",
            &mut result,
        );

        if self.weather_api_key().is_none() {
            result.add_warning(
                "services.weather_api_key",
                "No OpenWeather API key - forecast requests will be rejected",
            );
        }
        if self.geocoding_api_key().is_none() {
            result.add_warning(
                "services.geocoding_api_key",
                "No OpenCage API key - city suggestions will be empty",
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.weather.request_timeout_secs > 120 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout is unusually long (>120s)",
            );
        }

        if self.weather.language.trim().is_empty() {
            result.add_error("weather.language", "Language code must not be empty");
        }

        match (self.weather.default_latitude, self.weather.default_longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error(
                        "weather.default_latitude",
                        format!("Latitude out of range: {}", lat),
                    );
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error(
                        "weather.default_longitude",
                        format!("Longitude out of range: {}", lon),
                    );
                }
            }
            (None, None) => {}
            _ => result.add_warning(
                "weather.default_latitude",
                "Only one default coordinate is set - it will be ignored",
            ),
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `config_dir/config.toml`
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(self.config_path(), contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn keyed_config() -> Config {
        let mut config = Config::default();
        config.services.weather_api_key = Some("weather-key".to_string());
        config.services.geocoding_api_key = Some("geo-key".to_string());
        config
    }

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Missing keys are warnings, never errors
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = keyed_config();
        config.services.weather_api_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "services.weather_api_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = keyed_config();
        config.services.geocoding_api_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = keyed_config();
        config.weather.request_timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.request_timeout_secs"));
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let mut config = keyed_config();
        config.weather.default_latitude = Some(91.0);
        config.weather.default_longitude = Some(10.0);
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.default_latitude"));
    }

    #[test]
    fn test_half_coordinates_is_warning() {
        let mut config = keyed_config();
        config.weather.default_latitude = Some(51.5);
        let result = config.validate();
        assert!(result.is_valid());
        assert!(config.weather.default_coordinates().is_none());
        assert!(result.warnings.iter().any(|w| w.field == "weather.default_latitude"));
    }

    #[test]
    fn test_configured_keys_have_no_key_warnings() {
        let result = keyed_config().validate();
        assert!(!result.warnings.iter().any(|w| w.field.starts_with("services.")));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.config_dir, dir.path());
        assert!(dir.path().join("config.toml").exists());
        assert_eq!(config.ui.theme, Theme::Light);
    }

    #[test]
    fn test_theme_survives_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::load_from(dir.path()).unwrap();
        config.ui.theme = Theme::Dark;
        config.save().unwrap();

        let reloaded = Config::load_from(dir.path()).unwrap();
        assert_eq!(reloaded.ui.theme, Theme::Dark);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().as_str(), "light");
    }
}
