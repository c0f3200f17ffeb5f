//! Query failure taxonomy.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("No city name given")]
    EmptyCity,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Weather service returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Error body OpenWeather sends with non-2xx statuses, e.g.
/// `{"cod": 401, "message": "Invalid API key."}`.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

impl QueryError {
    /// Map a transport failure. The URL is dropped because it carries the API key.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(e.without_url().to_string())
        }
    }

    /// Build an `Upstream` error, preferring the provider's own message.
    pub(crate) fn upstream(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ProviderErrorBody>(body)
            .map(|b| b.message)
            .ok()
            .filter(|m| !m.is_empty())
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_else(|| "request failed".to_string());

        Self::Upstream {
            status: status.as_u16(),
            message,
        }
    }
}
