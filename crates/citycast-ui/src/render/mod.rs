//! Pure text rendering of the view state.
//!
//! Nothing here touches the terminal or the network: every function maps
//! immutable data to a `String`. Timestamps arrive in UTC and are shown in
//! the time zone passed by the caller (the local zone in the binary).

pub mod chart;
pub mod panel;
pub mod table;

use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, TimeZone};
use citycast_weather::{IconSet, WeatherReport};

pub use chart::{render_chart, ChartOptions};
pub use panel::render_current;
pub use table::render_table;

use crate::error_mapping::QueryErrorExt;
use crate::models::ViewState;

pub const FORECAST_HEADING: &str = "Forecast (every 3 hours)";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub icons: IconSet,
    pub chart: ChartOptions,
    pub show_chart: bool,
    pub show_table: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            icons: IconSet::default(),
            chart: ChartOptions::default(),
            show_chart: true,
            show_table: true,
        }
    }
}

/// Render whatever the screen currently shows.
pub fn render_view<Tz>(state: &ViewState, options: &RenderOptions, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match state {
        ViewState::Idle => "Enter a city name to get the current weather and forecast.\n".to_string(),
        ViewState::Loading { city, .. } => format!("Fetching weather for {}...\n", city),
        ViewState::Failed { error, .. } => {
            format!("Error: {}\n{}\n", error, error.user_message())
        }
        ViewState::Ready { report, .. } => render_report(report, options, tz),
    }
}

/// Current conditions followed by the forecast chart and table.
pub fn render_report<Tz>(report: &WeatherReport, options: &RenderOptions, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = render_current(&report.current, &options.icons);

    if report.forecast.is_empty() {
        out.push_str("\nNo forecast data.\n");
        return out;
    }

    out.push('\n');
    out.push_str(FORECAST_HEADING);
    out.push_str("\n\n");

    if options.show_chart {
        out.push_str(&render_chart(&report.forecast, &options.chart, tz));
        out.push('\n');
    }
    if options.show_table {
        out.push_str(&render_table(&report.forecast, &options.icons, tz));
    }
    out
}

pub(crate) fn to_zone<Tz: TimeZone>(timestamp: &NaiveDateTime, tz: &Tz) -> DateTime<Tz> {
    tz.from_utc_datetime(timestamp)
}

/// Date and time as shown in the table, e.g. `2024-01-01 13:00`.
pub fn format_date<Tz>(timestamp: &NaiveDateTime, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    to_zone(timestamp, tz).format("%Y-%m-%d %H:%M").to_string()
}

/// Time of day as used on the chart axis, e.g. `13:00`.
pub fn format_time<Tz>(timestamp: &NaiveDateTime, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    to_zone(timestamp, tz).format("%H:%M").to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use chrono::{NaiveDateTime, Utc};
    use citycast_weather::{
        CurrentWeather, ForecastPoint, ForecastSeries, GeoResult, WeatherReport,
    };

    pub fn point(ts: &str, temp: f64) -> ForecastPoint {
        ForecastPoint {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            temperature_celsius: temp,
            description: "clear sky".to_string(),
            icon_id: "01d".to_string(),
        }
    }

    pub fn series(temps: &[f64]) -> ForecastSeries {
        let points = temps.iter().enumerate().map(|(i, t)| {
            point(
                &format!("2024-01-{:02} {:02}:00:00", 1 + i / 8, (i % 8) * 3),
                *t,
            )
        });
        ForecastSeries::from_points(points, temps.len())
    }

    pub fn paris_report() -> WeatherReport {
        WeatherReport {
            location: GeoResult {
                latitude: 48.8566,
                longitude: 2.3522,
                name: "Paris".to_string(),
                country: Some("FR".to_string()),
                state: None,
            },
            current: CurrentWeather {
                location_name: "Paris".to_string(),
                temperature_celsius: 15.2,
                description: "clear sky".to_string(),
                icon_id: "01d".to_string(),
            },
            forecast: ForecastSeries::from_points(vec![point("2024-01-01 12:00:00", 15.2)], 16),
            fetched_at: Utc::now(),
        }
    }
}
