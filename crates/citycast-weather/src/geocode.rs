//! Forward geocoding: city name to coordinates via OpenWeather's direct geocoding API.

use serde::Deserialize;
use tracing::instrument;

use crate::error::QueryError;
use crate::provider::WeatherProvider;
use crate::types::GeoResult;

const GEOCODE_PATH: &str = "/geo/1.0/direct";

/// Only the best match is ever used.
const MATCH_LIMIT: u8 = 1;

#[derive(Debug, Deserialize)]
struct GeoMatch {
    #[serde(default)]
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

impl From<GeoMatch> for GeoResult {
    fn from(m: GeoMatch) -> Self {
        Self {
            latitude: m.lat,
            longitude: m.lon,
            name: m.name,
            country: m.country,
            state: m.state,
        }
    }
}

impl WeatherProvider {
    /// Resolve `city` to the provider's first match.
    ///
    /// Returns `CityNotFound` when the provider has no match.
    #[instrument(skip(self), level = "debug")]
    pub async fn geocode(&self, city: &str) -> Result<GeoResult, QueryError> {
        let matches: Vec<GeoMatch> = self
            .get_json(
                GEOCODE_PATH,
                &[("q", city.to_string()), ("limit", MATCH_LIMIT.to_string())],
            )
            .await?;

        let Some(first) = matches.into_iter().next() else {
            tracing::info!("No geocoding match for {:?}", city);
            return Err(QueryError::CityNotFound(city.to_string()));
        };

        tracing::debug!(
            "Geocoded {:?} to {} ({:.4}, {:.4})",
            city,
            first.name,
            first.lat,
            first.lon
        );
        Ok(first.into())
    }
}
