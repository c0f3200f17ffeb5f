pub mod config;
pub mod error;

pub use config::{Config, ConfigOverrides, UiConfig, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError, NetworkError, WeatherError};

use anyhow::Result;

/// Initialize logging.
///
/// `RUST_LOG` wins when set; otherwise the level is derived from the CLI
/// verbosity count (0 = warn, 1 = info, 2 = debug, 3+ = trace). Output goes to
/// stderr so stdout only carries rendered weather.
pub fn init(verbosity: u8) -> Result<()> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("Citycast core initialized");
    Ok(())
}
