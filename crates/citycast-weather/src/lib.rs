//! Weather queries for Citycast
//!
//! Resolves a city name via OpenWeather geocoding, then fetches current
//! conditions and the 3-hourly forecast for the match.

pub mod error;
pub mod geocode;
pub mod icons;
pub mod provider;
pub mod types;

pub use error::QueryError;
pub use icons::IconSet;
pub use provider::{ProviderSettings, WeatherProvider};
pub use types::*;
