use citycast_core::{AppError, NetworkError, WeatherError};
use citycast_weather::QueryError;

/// Conversion into `AppError`; both types live in other crates, so `From` is not an option.
pub trait QueryErrorExt {
    fn into_app_error(self) -> AppError;

    /// Short, non-technical hint shown under the detailed message.
    fn user_message(&self) -> &'static str;
}

impl QueryErrorExt for QueryError {
    fn into_app_error(self) -> AppError {
        match self {
            QueryError::EmptyCity => AppError::Weather(WeatherError::EmptyQuery),
            QueryError::CityNotFound(city) => AppError::Weather(WeatherError::CityNotFound(city)),
            QueryError::Network(s) => AppError::Network(NetworkError::ConnectionFailed(s)),
            QueryError::Timeout => AppError::Network(NetworkError::Timeout),
            QueryError::Upstream { status: 401, .. } => {
                AppError::Weather(WeatherError::InvalidApiKey)
            }
            QueryError::Upstream { status: 429, .. } => AppError::Weather(WeatherError::RateLimited),
            QueryError::Upstream { status, message } if status >= 500 => {
                AppError::Network(NetworkError::ServerError { status, message })
            }
            QueryError::Upstream { status, message } => {
                AppError::Weather(WeatherError::ApiError(format!("{}: {}", status, message)))
            }
            QueryError::MalformedResponse(s) => {
                AppError::Weather(WeatherError::MalformedResponse(s))
            }
        }
    }

    fn user_message(&self) -> &'static str {
        self.clone().into_app_error().user_message()
    }
}
