use citycast_weather::{CurrentWeather, IconSet};

/// Current-conditions panel: place, temperature, description and icon.
pub fn render_current(current: &CurrentWeather, icons: &IconSet) -> String {
    format!(
        "{}\nTemperature: {}°C\nDescription: {}\nIcon: {}\n",
        current.location_name,
        current.temperature_celsius,
        current.description,
        icons.large(&current.icon_id)
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_panel_lines() {
        let current = CurrentWeather {
            location_name: "Paris".to_string(),
            temperature_celsius: 15.2,
            description: "clear sky".to_string(),
            icon_id: "01d".to_string(),
        };

        let text = render_current(&current, &IconSet::default());

        assert_eq!(
            text,
            "Paris\n\
             Temperature: 15.2°C\n\
             Description: clear sky\n\
             Icon: https://openweathermap.org/img/wn/01d@2x.png\n"
        );
    }

    #[test]
    fn test_whole_degrees_have_no_fraction() {
        let current = CurrentWeather {
            location_name: "Oslo".to_string(),
            temperature_celsius: -3.0,
            description: "snow".to_string(),
            icon_id: "13n".to_string(),
        };
        assert!(render_current(&current, &IconSet::default()).contains("Temperature: -3°C"));
    }
}
