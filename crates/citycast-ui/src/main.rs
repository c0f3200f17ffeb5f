//! Citycast CLI
//!
//! Current weather and a 3-hourly forecast for any city, in the terminal.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use citycast_core::{Config, ConfigOverrides};
use citycast_ui::bridge;
use citycast_ui::error_mapping::{app_error, QueryErrorExt};
use citycast_ui::models::{ViewState, WeatherModel};
use citycast_ui::render::{render_view, RenderOptions};
use citycast_ui::services::WeatherService;
use citycast_weather::QueryError;
use clap::{ArgAction, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;

const PROMPT: &str = "city> ";

#[derive(Parser)]
#[command(name = "citycast")]
#[command(author, version, about = "Current weather and forecast for any city", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of forecast points to show (3 hours apart)
    #[arg(long, global = true)]
    points: Option<usize>,

    /// Hide the temperature chart
    #[arg(long, global = true)]
    no_chart: bool,

    /// Hide the forecast table
    #[arg(long, global = true)]
    no_table: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one city and print the report
    ///
    /// Example: citycast query New York
    Query {
        /// City name; several words are joined with spaces
        #[arg(required = true)]
        city: Vec<String>,
    },

    /// Prompt for cities until `quit`, `exit` or end of input
    Interactive,

    /// Show the config file path and effective settings (API key redacted)
    Config,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            forecast_points: self.points,
            show_chart: self.no_chart.then_some(false),
            show_table: self.no_table.then_some(false),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = citycast_core::init(cli.verbose) {
        eprintln!("{e}");
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            let err = app_error(e);
            tracing::error!("{:#}", err);
            eprintln!("Error: {}\n{}", err, err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let overrides = cli.overrides();
    let config_path = cli.config.as_deref();

    match &cli.command {
        Commands::Config => show_config(config_path, &overrides),
        Commands::Query { city } => {
            let (config, _) = Config::load_validated(config_path, &overrides)?;
            query_once(&config, &city.join(" ")).await
        }
        Commands::Interactive => {
            let (config, _) = Config::load_validated(config_path, &overrides)?;
            interactive(&config).await
        }
    }
}

async fn query_once(config: &Config, city: &str) -> Result<ExitCode> {
    let provider = bridge::build_provider(&config.weather)?;
    let options = bridge::render_options(config);
    let (service, mut rx) = WeatherService::new(provider, Handle::current());
    let mut model = WeatherModel::new();

    let Some(seq) = model.submit(city) else {
        let err = QueryError::EmptyCity;
        eprintln!("Error: {}\n{}", err, err.user_message());
        return Ok(ExitCode::FAILURE);
    };

    eprint!("{}", render_view(model.state(), &options, &Local));
    service.request_fetch(seq, city.to_string());

    while let Some(message) = rx.recv().await {
        if model.apply(message) {
            break;
        }
    }

    let text = render_view(model.state(), &options, &Local);
    if matches!(model.state(), ViewState::Failed { .. }) {
        eprint!("{}", text);
        return Ok(ExitCode::FAILURE);
    }
    print!("{}", text);
    Ok(ExitCode::SUCCESS)
}

async fn interactive(config: &Config) -> Result<ExitCode> {
    let provider = bridge::build_provider(&config.weather)?;
    let options = bridge::render_options(config);
    let (service, mut rx) = WeatherService::new(provider, Handle::current());
    let mut model = WeatherModel::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    show(&model, &options)?;
    prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                let input = line.trim();
                if matches!(input, "quit" | "exit") {
                    break;
                }
                match model.submit(input) {
                    Some(seq) => {
                        show(&model, &options)?;
                        service.request_fetch(seq, input.to_string());
                    }
                    None => prompt()?,
                }
            }
            Some(message) = rx.recv() => {
                if model.apply(message) {
                    println!();
                    show(&model, &options)?;
                    prompt()?;
                }
            }
        }
    }

    service.cancel_inflight();
    tracing::info!("Interactive session ended after {} queries", model.latest_seq());
    Ok(ExitCode::SUCCESS)
}

fn show(model: &WeatherModel, options: &RenderOptions) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(render_view(model.state(), options, &Local).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn prompt() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(PROMPT.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn show_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<ExitCode> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_path()?,
    };

    let mut config = Config::load_from(&path)?;
    config.apply_overrides(overrides);

    println!("# {}", path.display());
    print!("{}", config.to_display_toml()?);

    let validation = config.validate();
    for warning in &validation.warnings {
        eprintln!("warning: {}", warning);
    }
    for error in &validation.errors {
        eprintln!("error: {}", error);
    }

    Ok(if validation.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
