//! Async services. Network work runs on the tokio runtime; results come back
//! to the input loop over a channel.

pub mod weather_service;

pub use weather_service::{WeatherService, WeatherServiceMessage};
