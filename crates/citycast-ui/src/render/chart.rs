//! ASCII line chart of forecast temperature over time.

use std::fmt::Display;

use chrono::TimeZone;
use citycast_weather::ForecastSeries;

use super::format_time;

const TITLE: &str = "Temp (°C)";
const AXIS_LABEL_WIDTH: usize = 7;
const TICK_LABEL_LEN: usize = 5;

#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Plot rows, at least 2
    pub height: u16,
    /// Characters per forecast point
    pub column_width: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            height: 10,
            column_width: 4,
        }
    }
}

/// Plot the series with an auto-scaled y axis and `HH:MM` ticks.
///
/// Returns an empty string for an empty series.
pub fn render_chart<Tz>(series: &ForecastSeries, options: &ChartOptions, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some((lo, hi)) = series.temperature_range() else {
        return String::new();
    };
    // A flat series still needs a non-zero span.
    let (lo, hi) = if hi - lo < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    };

    let rows = usize::from(options.height.max(2));
    let col_width = options.column_width.max(1);
    let width = series.len() * col_width;
    let last_row = (rows - 1) as f64;

    let row_of = |temp: f64| -> usize {
        let frac = (hi - temp) / (hi - lo);
        ((frac * last_row).round().max(0.0) as usize).min(rows - 1)
    };

    let marks: Vec<(usize, usize)> = series
        .iter()
        .enumerate()
        .map(|(i, p)| (i * col_width + col_width / 2, row_of(p.temperature_celsius)))
        .collect();

    let mut grid = vec![vec![' '; width]; rows];
    for pair in marks.windows(2) {
        let (c0, r0) = pair[0];
        let (c1, r1) = pair[1];
        for c in (c0 + 1)..c1 {
            let f = (c - c0) as f64 / (c1 - c0) as f64;
            let r = (r0 as f64 + (r1 as f64 - r0 as f64) * f).round() as usize;
            grid[r.min(rows - 1)][c] = '.';
        }
    }
    for &(c, r) in &marks {
        grid[r][c] = '*';
    }

    let mut out = format!("{}\n", TITLE);
    for (r, row) in grid.iter().enumerate() {
        let value = hi - (hi - lo) * r as f64 / last_row;
        let line: String = row.iter().collect();
        out.push_str(&format!(
            "{:>w$.1} |{}\n",
            value,
            line.trim_end(),
            w = AXIS_LABEL_WIDTH
        ));
    }
    out.push_str(&format!(
        "{:>w$} +{}\n",
        "",
        "-".repeat(width),
        w = AXIS_LABEL_WIDTH
    ));

    // Leave at least one blank between neighbouring tick labels.
    let step = (TICK_LABEL_LEN + 1).div_ceil(col_width);
    let mut ticks = vec![' '; width + TICK_LABEL_LEN];
    for (i, point) in series.iter().enumerate().step_by(step) {
        let start = i * col_width;
        for (k, ch) in format_time(&point.timestamp, tz).chars().enumerate() {
            if let Some(slot) = ticks.get_mut(start + k) {
                *slot = ch;
            }
        }
    }
    let ticks: String = ticks.iter().collect();
    out.push_str(&format!(
        "{:>w$}  {}\n",
        "",
        ticks.trim_end(),
        w = AXIS_LABEL_WIDTH
    ));

    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::render::test_support::series;
    use chrono::Utc;

    fn options(height: u16) -> ChartOptions {
        ChartOptions {
            height,
            column_width: 4,
        }
    }

    fn plot_rows(chart: &str) -> Vec<&str> {
        chart.lines().skip(1).take_while(|l| l.contains('|')).collect()
    }

    #[test]
    fn test_empty_series_renders_nothing() {
        assert_eq!(render_chart(&series(&[]), &options(5), &Utc), "");
    }

    #[test]
    fn test_layout() {
        let chart = render_chart(&series(&[1.0, 2.0, 3.0]), &options(5), &Utc);
        let lines: Vec<_> = chart.lines().collect();

        // title + rows + axis + ticks
        assert_eq!(lines.len(), 1 + 5 + 2);
        assert_eq!(lines[0], TITLE);
        assert!(lines[6].trim_start().starts_with('+'));
    }

    #[test]
    fn test_extremes_hit_top_and_bottom_rows() {
        let chart = render_chart(&series(&[0.0, 10.0]), &options(5), &Utc);
        let rows = plot_rows(&chart);

        assert_eq!(rows.len(), 5);
        assert!(rows[0].trim_start().starts_with("10.0"));
        assert_eq!(rows[0].matches('*').count(), 1);
        assert!(rows[4].trim_start().starts_with("0.0"));
        assert_eq!(rows[4].matches('*').count(), 1);

        // The warmer point is to the right of the colder one.
        let top = rows[0].find('*').unwrap();
        let bottom = rows[4].find('*').unwrap();
        assert!(top > bottom);
    }

    #[test]
    fn test_every_point_is_plotted() {
        let temps = [3.0, 5.5, 4.0, -1.0, 0.5, 2.0];
        let chart = render_chart(&series(&temps), &options(8), &Utc);
        let stars: usize = plot_rows(&chart).iter().map(|r| r.matches('*').count()).sum();
        assert_eq!(stars, temps.len());
    }

    #[test]
    fn test_flat_series_sits_in_the_middle() {
        let chart = render_chart(&series(&[7.0, 7.0, 7.0]), &options(5), &Utc);
        let rows = plot_rows(&chart);
        assert_eq!(rows[2].matches('*').count(), 3);
        assert!(rows[2].trim_start().starts_with("7.0"));
    }

    #[test]
    fn test_tick_labels() {
        let chart = render_chart(&series(&[1.0, 2.0, 3.0, 4.0]), &options(4), &Utc);
        let ticks = chart.lines().last().unwrap();
        assert!(ticks.contains("00:00"));
        assert!(ticks.contains("06:00"));
        assert!(!ticks.contains("03:00"));
    }
}
