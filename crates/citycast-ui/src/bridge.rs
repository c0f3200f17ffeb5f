//! Wiring between loaded configuration and the runtime pieces.
//!
//! Everything the binary needs is built here from an explicit `Config` value;
//! there is no process-wide state.

use std::time::Duration;

use citycast_core::{AppError, Config, ConfigError, WeatherConfig};
use citycast_weather::{IconSet, ProviderSettings, WeatherProvider};

use crate::error_mapping::QueryErrorExt;
use crate::render::{ChartOptions, RenderOptions};

/// Provider settings from the `[weather]` section. Fails when no API key is set.
pub fn provider_settings(config: &WeatherConfig) -> Result<ProviderSettings, ConfigError> {
    let api_key = config.require_api_key()?;

    Ok(ProviderSettings::new(api_key)
        .with_base_url(config.api_base_url.trim_end_matches('/'))
        .with_forecast_points(config.forecast_points)
        .with_timeout(Duration::from_secs(config.timeout_secs)))
}

pub fn build_provider(config: &WeatherConfig) -> Result<WeatherProvider, AppError> {
    let settings = provider_settings(config)?;
    tracing::debug!("Weather provider settings: {:?}", settings);
    WeatherProvider::new(settings).map_err(QueryErrorExt::into_app_error)
}

pub fn render_options(config: &Config) -> RenderOptions {
    RenderOptions {
        icons: IconSet::new(config.weather.icon_base_url.as_str()),
        chart: ChartOptions {
            height: config.ui.chart_height,
            ..ChartOptions::default()
        },
        show_chart: config.ui.show_chart,
        show_table: config.ui.show_table,
    }
}
