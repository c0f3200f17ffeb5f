use std::fmt::Display;

use chrono::TimeZone;
use citycast_weather::{ForecastSeries, IconSet};

use super::format_date;

const HEADERS: [&str; 4] = ["Date/Time", "Temp (°C)", "Description", "Icon"];

/// Forecast table, one row per point, in the order received.
pub fn render_table<Tz>(series: &ForecastSeries, icons: &IconSet, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let rows: Vec<[String; 4]> = series
        .iter()
        .map(|p| {
            [
                format_date(&p.timestamp, tz),
                format!("{:.1}", p.temperature_celsius),
                p.description.clone(),
                icons.small(&p.icon_id),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let mut out = separator.clone();
    out.push_str(&table_row(&HEADERS[..], &widths));
    out.push_str(&separator);
    for row in &rows {
        out.push_str(&table_row(&row[..], &widths));
    }
    out.push_str(&separator);
    out
}

// Pads by char count so "°" does not skew the columns.
fn table_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let cell = cell.as_ref();
        let pad = width.saturating_sub(cell.chars().count());
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 1));
        line.push('|');
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::render::test_support::{point, series};
    use chrono::{FixedOffset, Utc};
    use citycast_weather::ForecastSeries;

    #[test]
    fn test_header_and_rows() {
        let table = render_table(&series(&[1.5, -2.0]), &IconSet::default(), &Utc);
        let lines: Vec<_> = table.lines().collect();

        // separator, header, separator, 2 rows, separator
        assert_eq!(lines.len(), 6);
        assert!(lines[1].contains("Date/Time"));
        assert!(lines[1].contains("Temp (°C)"));
        assert!(lines[3].contains("2024-01-01 00:00"));
        assert!(lines[3].contains("1.5"));
        assert!(lines[3].contains("https://openweathermap.org/img/wn/01d.png"));
        assert!(lines[4].contains("2024-01-01 03:00"));
        assert!(lines[4].contains("-2.0"));
    }

    #[test]
    fn test_columns_line_up() {
        let table = render_table(&series(&[1.0, 22.25, -10.0]), &IconSet::default(), &Utc);
        let widths: Vec<_> = table.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_rows_use_given_time_zone() {
        let series = ForecastSeries::from_points(vec![point("2024-01-01 23:00:00", 4.0)], 16);
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();

        let table = render_table(&series, &IconSet::default(), &minus_five);
        assert!(table.contains("2024-01-01 18:00"));
    }

    #[test]
    fn test_empty_series_has_only_header() {
        let table = render_table(&ForecastSeries::default(), &IconSet::default(), &Utc);
        assert_eq!(table.lines().count(), 4);
    }
}
