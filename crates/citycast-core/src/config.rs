use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Prefix for environment overrides, e.g. `CITYCAST_WEATHER__API_KEY`.
pub const ENV_PREFIX: &str = "CITYCAST";

/// Conventional variable consulted when no key is configured anywhere else.
pub const API_KEY_FALLBACK_VAR: &str = "OPENWEATHER_API_KEY";

/// The provider never returns more than 40 forecast entries (5 days at 3 hours).
pub const PROVIDER_MAX_FORECAST_POINTS: usize = 40;

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

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

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

/// Settings given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub forecast_points: Option<usize>,
    pub show_chart: Option<bool>,
    pub show_table: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Terminal presentation preferences
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeather API key. Never committed; read from the user's config file
    /// or the environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL for geocoding and data endpoints
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL for condition icons
    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,

    /// Number of forecast entries to keep (3-hour steps)
    #[serde(default = "default_forecast_points")]
    pub forecast_points: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_icon_base_url() -> String {
    "https://openweathermap.org/img/wn".to_string()
}

fn default_forecast_points() -> usize {
    16
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_api_base_url(),
            icon_base_url: default_icon_base_url(),
            forecast_points: default_forecast_points(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("api_base_url", &self.api_base_url)
            .field("icon_base_url", &self.icon_base_url)
            .field("forecast_points", &self.forecast_points)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

const REDACTED: &str = "********";

impl WeatherConfig {
    /// The configured API key, or `MissingSetting` if none is set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingSetting("weather.api_key".to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows used by the temperature chart
    #[serde(default = "default_chart_height")]
    pub chart_height: u16,

    #[serde(default = "default_true")]
    pub show_chart: bool,

    #[serde(default = "default_true")]
    pub show_table: bool,
}

fn default_chart_height() -> u16 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            chart_height: default_chart_height(),
            show_chart: true,
            show_table: true,
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load configuration from `path`, layered with `CITYCAST_*` environment
    /// overrides and the `OPENWEATHER_API_KEY` fallback.
    ///
    /// A missing file is created with defaults (and no key).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Writing default config to {}", path.display());
            Self::default().save_to(path)?;
        }

        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        config.apply_api_key_fallback(std::env::var(API_KEY_FALLBACK_VAR).ok());

        Ok(config)
    }

    /// Load configuration, apply command-line overrides and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(
        path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<(Self, ValidationResult)> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        config.apply_overrides(overrides);
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(points) = overrides.forecast_points {
            self.weather.forecast_points = points;
        }
        if let Some(show) = overrides.show_chart {
            self.ui.show_chart = show;
        }
        if let Some(show) = overrides.show_table {
            self.ui.show_table = show;
        }
    }

    /// Use `fallback` as the API key when none was configured.
    pub fn apply_api_key_fallback(&mut self, fallback: Option<String>) {
        let configured = self
            .weather
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if configured {
            return;
        }
        if let Some(key) = fallback.filter(|k| !k.trim().is_empty()) {
            tracing::debug!("Using API key from {}", API_KEY_FALLBACK_VAR);
            self.weather.api_key = Some(key);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.weather.api_base_url, "weather.api_base_url", &mut result);
        validate_url(&self.weather.icon_base_url, "weather.icon_base_url", &mut result);

        if self.weather.require_api_key().is_err() {
            result.add_error(
                "weather.api_key",
                format!(
                    "No API key configured; set weather.api_key, {}_WEATHER__API_KEY or {}",
                    ENV_PREFIX, API_KEY_FALLBACK_VAR
                ),
            );
        }

        if self.weather.forecast_points == 0 {
            result.add_error(
                "weather.forecast_points",
                "At least one forecast point is required",
            );
        } else if self.weather.forecast_points > PROVIDER_MAX_FORECAST_POINTS {
            result.add_warning(
                "weather.forecast_points",
                format!(
                    "Provider returns at most {} points; extra capacity is unused",
                    PROVIDER_MAX_FORECAST_POINTS
                ),
            );
        }

        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        } else if self.weather.timeout_secs > 120 {
            result.add_warning(
                "weather.timeout_secs",
                "Timeout is unusually long (>120 seconds)",
            );
        }

        if self.ui.show_chart && self.ui.chart_height == 0 {
            result.add_error("ui.chart_height", "Chart height must be greater than 0");
        } else if self.ui.chart_height > 50 {
            result.add_warning("ui.chart_height", "Chart height is unusually large (>50)");
        }

        result
    }

    /// Copy of this config that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.weather.api_key.is_some() {
            copy.weather.api_key = Some(REDACTED.to_string());
        }
        copy
    }

    /// TOML rendering of the redacted config, for display.
    pub fn to_display_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.redacted()).context("Failed to serialize config")
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the default configuration file
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("citycast");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
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

            if url.port() == Some(0) {
                result.add_error(field_name, "Port cannot be 0");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn keyed_config() -> Config {
        let mut config = Config::default();
        config.weather.api_key = Some("test-key".to_string());
        config
    }

    #[test]
    fn test_valid_keyed_default_config() {
        let result = keyed_config().validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_api_key_is_error() {
        let result = Config::default().validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.api_key"));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let mut config = Config::default();
        config.weather.api_key = Some("   ".to_string());
        assert!(matches!(
            config.weather.require_api_key(),
            Err(ConfigError::MissingSetting(_))
        ));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = keyed_config();
        config.weather.api_base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.api_base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = keyed_config();
        config.weather.icon_base_url = "ftp://example.com/icons".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_forecast_points() {
        let mut config = keyed_config();
        config.weather.forecast_points = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.forecast_points"));
    }

    #[test]
    fn test_too_many_forecast_points_is_warning() {
        let mut config = keyed_config();
        config.weather.forecast_points = 100;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.forecast_points"));
    }

    #[test]
    fn test_zero_chart_height_only_matters_with_chart() {
        let mut config = keyed_config();
        config.ui.chart_height = 0;
        assert!(!config.validate().is_valid());

        config.ui.show_chart = false;
        assert!(config.validate().is_valid());
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
    fn test_debug_redacts_key() {
        let config = keyed_config();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("test-key"));
        assert!(debug.contains(REDACTED));
    }

    #[test]
    fn test_redacted_copy_hides_key() {
        let redacted = keyed_config().redacted();
        assert_eq!(redacted.weather.api_key.as_deref(), Some(REDACTED));
        assert!(Config::default().redacted().weather.api_key.is_none());
    }

    #[test]
    fn test_fallback_key_only_fills_gap() {
        let mut config = Config::default();
        config.apply_api_key_fallback(Some("from-env".to_string()));
        assert_eq!(config.weather.api_key.as_deref(), Some("from-env"));

        let mut config = keyed_config();
        config.apply_api_key_fallback(Some("from-env".to_string()));
        assert_eq!(config.weather.api_key.as_deref(), Some("test-key"));

        let mut config = Config::default();
        config.apply_api_key_fallback(Some("  ".to_string()));
        assert!(config.weather.api_key.is_none());
    }

    #[test]
    fn test_overrides_win() {
        let mut config = keyed_config();
        config.apply_overrides(&ConfigOverrides {
            forecast_points: Some(40),
            show_chart: Some(false),
            show_table: None,
        });
        assert_eq!(config.weather.forecast_points, 40);
        assert!(!config.ui.show_chart);
        assert!(config.ui.show_table);
    }

    #[test]
    fn test_display_toml_is_redacted() {
        let text = keyed_config().to_display_toml().unwrap();
        assert!(text.contains("[weather]"));
        assert!(!text.contains("test-key"));
    }

    #[test]
    fn test_load_validated_rejects_zero_points_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather]\napi_key = \"file-key\"\n").unwrap();

        let overrides = ConfigOverrides {
            forecast_points: Some(0),
            ..Default::default()
        };
        let err = Config::load_validated(Some(&path), &overrides).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.weather.forecast_points, 16);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("api_key"));
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[weather]\napi_key = \"file-key\"\nforecast_points = 8\n\n[ui]\nshow_table = false\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.weather.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.weather.forecast_points, 8);
        assert_eq!(config.weather.timeout_secs, 10);
        assert_eq!(config.weather.api_base_url, "https://api.openweathermap.org");
        assert!(!config.ui.show_table);
        assert!(config.ui.show_chart);
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather\nforecast_points = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_wrong_type_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nchart_height = \"tall\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ParseError(_))
        ));
    }
}
