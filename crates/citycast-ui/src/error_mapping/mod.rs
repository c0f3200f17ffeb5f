//! Maps errors from the workspace crates to citycast_core::AppError for consistent user-facing messages.

mod weather;

pub use weather::QueryErrorExt;

use citycast_core::{AppError, ConfigError};

/// Recover a typed `AppError` from an `anyhow` chain.
///
/// Context added with `.context(..)` does not hide the underlying
/// `ConfigError` or `io::Error`.
pub fn app_error(e: anyhow::Error) -> AppError {
    let e = match e.downcast::<AppError>() {
        Ok(app) => return app,
        Err(e) => e,
    };
    let e = match e.downcast::<ConfigError>() {
        Ok(config) => return AppError::Config(config),
        Err(e) => e,
    };
    match e.downcast::<std::io::Error>() {
        Ok(io) => AppError::Io(io),
        Err(e) => AppError::Other(e),
    }
}
