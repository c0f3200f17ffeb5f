//! OpenWeather client: geocode, then current conditions and forecast in parallel.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::instrument;

use crate::error::QueryError;
use crate::types::{
    CurrentWeather, ForecastPoint, ForecastSeries, GeoResult, WeatherReport,
    DEFAULT_FORECAST_POINTS, FORECAST_TIMESTAMP_FORMAT,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const UNITS: &str = "metric";

/// Connection settings for [`WeatherProvider`]
#[derive(Clone)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    pub forecast_points: usize,
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            forecast_points: DEFAULT_FORECAST_POINTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_forecast_points(mut self, points: usize) -> Self {
        self.forecast_points = points;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("forecast_points", &self.forecast_points)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    settings: Arc<ProviderSettings>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    name: String,
    main: MainBlock,
    weather: Vec<ConditionEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt_txt: String,
    main: MainBlock,
    weather: Vec<ConditionEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
}

impl WeatherProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(QueryError::from_transport)?;

        Ok(Self {
            client: Arc::new(client),
            settings: Arc::new(settings),
        })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Resolve `city_name` and fetch current conditions plus forecast.
    ///
    /// The two data requests run concurrently; the first failure fails the
    /// whole query and the other request is dropped.
    #[instrument(skip(self), level = "info")]
    pub async fn query(&self, city_name: &str) -> Result<WeatherReport, QueryError> {
        let city = city_name.trim();
        if city.is_empty() {
            return Err(QueryError::EmptyCity);
        }

        let location = self.geocode(city).await?;
        tracing::info!(
            "Resolved {} to {:.4}, {:.4}",
            city,
            location.latitude,
            location.longitude
        );

        let (current, forecast) =
            tokio::try_join!(self.current(&location), self.forecast(&location))?;

        tracing::info!(
            "Fetched weather for {} ({} forecast points)",
            current.location_name,
            forecast.len()
        );

        Ok(WeatherReport {
            location,
            current,
            forecast,
            fetched_at: Utc::now(),
        })
    }

    /// Current conditions at `location`, metric units.
    #[instrument(skip(self), level = "debug")]
    pub async fn current(&self, location: &GeoResult) -> Result<CurrentWeather, QueryError> {
        let body: CurrentResponse = self
            .get_json(CURRENT_PATH, &coordinate_params(location))
            .await?;
        current_from_response(body, location)
    }

    /// Forecast at `location`, truncated to the configured number of points.
    #[instrument(skip(self), level = "debug")]
    pub async fn forecast(&self, location: &GeoResult) -> Result<ForecastSeries, QueryError> {
        let body: ForecastResponse = self
            .get_json(FORECAST_PATH, &coordinate_params(location))
            .await?;
        forecast_from_response(body, self.settings.forecast_points)
    }

    /// GET `path` with `params` plus the API key and decode a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, QueryError> {
        let url = format!("{}{}", self.settings.base_url.trim_end_matches('/'), path);
        tracing::debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("appid", self.settings.api_key.as_str())])
            .send()
            .await
            .map_err(QueryError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(QueryError::from_transport)?;

        if !status.is_success() {
            tracing::debug!("{} returned status {}", path, status);
            return Err(QueryError::upstream(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| QueryError::MalformedResponse(format!("{}: {}", path, e)))
    }
}

fn coordinate_params(location: &GeoResult) -> [(&'static str, String); 3] {
    [
        ("lat", location.latitude.to_string()),
        ("lon", location.longitude.to_string()),
        ("units", UNITS.to_string()),
    ]
}

fn first_condition(
    weather: Vec<ConditionEntry>,
    context: &str,
) -> Result<ConditionEntry, QueryError> {
    weather
        .into_iter()
        .next()
        .ok_or_else(|| QueryError::MalformedResponse(format!("{}: empty weather list", context)))
}

fn current_from_response(
    body: CurrentResponse,
    location: &GeoResult,
) -> Result<CurrentWeather, QueryError> {
    let condition = first_condition(body.weather, CURRENT_PATH)?;

    // The provider occasionally omits the station name; the geocoded name is close enough.
    let location_name = if body.name.is_empty() {
        location.display_name()
    } else {
        body.name
    };

    Ok(CurrentWeather {
        location_name,
        temperature_celsius: body.main.temp,
        description: condition.description,
        icon_id: condition.icon,
    })
}

fn forecast_from_response(
    body: ForecastResponse,
    limit: usize,
) -> Result<ForecastSeries, QueryError> {
    let points = body
        .list
        .into_iter()
        .take(limit)
        .map(|entry| -> Result<ForecastPoint, QueryError> {
            let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, FORECAST_TIMESTAMP_FORMAT)
                .map_err(|e| {
                    QueryError::MalformedResponse(format!(
                        "{}: bad dt_txt {:?}: {}",
                        FORECAST_PATH, entry.dt_txt, e
                    ))
                })?;
            let condition = first_condition(entry.weather, FORECAST_PATH)?;
            Ok(ForecastPoint {
                timestamp,
                temperature_celsius: entry.main.temp,
                description: condition.description,
                icon_id: condition.icon,
            })
        })
        .collect::<Result<Vec<_>, QueryError>>()?;

    Ok(ForecastSeries::from_points(points, limit))
}
