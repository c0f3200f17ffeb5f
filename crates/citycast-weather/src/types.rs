use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of the provider's `dt_txt` forecast timestamps (UTC).
pub const FORECAST_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of forecast entries kept when nothing else is configured
/// (about two days at 3-hour resolution).
pub const DEFAULT_FORECAST_POINTS: usize = 16;

/// First geocoding match for a city name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub country: Option<String>,
    pub state: Option<String>,
}

impl GeoResult {
    /// Human-readable place name (e.g. "Paris, Île-de-France").
    ///
    /// Adds the state, or failing that the country, when it differs from the
    /// place itself. Falls back to coordinates when the provider gave no name.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            return format!("{:.4}, {:.4}", self.latitude, self.longitude);
        }

        let differs = |s: &&String| !s.is_empty() && s.as_str() != self.name;
        let suffix = self
            .state
            .as_ref()
            .filter(differs)
            .or_else(|| self.country.as_ref().filter(differs));

        match suffix {
            Some(s) => format!("{}, {}", self.name, s),
            None => self.name.clone(),
        }
    }
}

/// Current conditions at the resolved location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub temperature_celsius: f64,
    pub description: String,
    pub icon_id: String,
}

/// One 3-hour forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Provider timestamp, UTC
    pub timestamp: NaiveDateTime,
    pub temperature_celsius: f64,
    pub description: String,
    pub icon_id: String,
}

impl ForecastPoint {
    /// Timestamp in the provider's own `YYYY-MM-DD HH:MM:SS` form.
    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(FORECAST_TIMESTAMP_FORMAT).to_string()
    }
}

/// Forecast points in provider order, capped at a fixed length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Keep the first `limit` points exactly as the provider ordered them.
    pub fn from_points(points: impl IntoIterator<Item = ForecastPoint>, limit: usize) -> Self {
        Self {
            points: points.into_iter().take(limit).collect(),
        }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lowest and highest temperature in the series, `None` when empty.
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.temperature_celsius).fold(None, |acc, t| {
            Some(match acc {
                None => (t, t),
                Some((lo, hi)) => (lo.min(t), hi.max(t)),
            })
        })
    }
}

impl<'a> IntoIterator for &'a ForecastSeries {
    type Item = &'a ForecastPoint;
    type IntoIter = std::slice::Iter<'a, ForecastPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Complete, immutable result of one city query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: GeoResult,
    pub current: CurrentWeather,
    pub forecast: ForecastSeries,
    pub fetched_at: DateTime<Utc>,
}
