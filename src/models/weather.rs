//! Current weather snapshot and display methods

use serde::{Deserialize, Serialize};

/// Current weather for a resolved destination
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Canonical destination name reported by the provider
    pub name: String,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Condition keyword, e.g. "Clear" or "Rain"
    pub condition: String,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed_ms: f64,
    /// Offset from UTC in seconds
    pub timezone_offset_seconds: i32,
}

impl WeatherSnapshot {
    /// Temperature rounded half away from zero, as displayed
    #[must_use]
    pub fn rounded_temperature(&self) -> i64 {
        self.temperature_c.round() as i64
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.rounded_temperature())
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} m/s", self.wind_speed_ms)
    }

    /// Format weather description with the first letter capitalized
    #[must_use]
    pub fn format_description(&self) -> String {
        let mut chars = self.description.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(temperature_c: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            name: "Lisbon".to_string(),
            temperature_c,
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            humidity: 40,
            wind_speed_ms: 3.6,
            timezone_offset_seconds: 0,
        }
    }

    #[test]
    fn test_rounded_temperature() {
        assert_eq!(snapshot(21.5).rounded_temperature(), 22);
        assert_eq!(snapshot(21.49).rounded_temperature(), 21);
        assert_eq!(snapshot(-3.7).rounded_temperature(), -4);
    }

    #[test]
    fn test_formatting() {
        let weather = snapshot(18.2);
        assert_eq!(weather.format_temperature(), "18°C");
        assert_eq!(weather.format_wind(), "3.6 m/s");
        assert_eq!(weather.format_description(), "Clear sky");
    }
}
