//! Weather API client for OpenWeatherMap
//!
//! Looks up current conditions by place name in metric units.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use super::{WeatherProvider, endpoint};
use crate::config::{WeatherConfig, is_placeholder};
use crate::models::{SearchQuery, WeatherSnapshot};
use crate::{Result, TripScoutError};

/// OpenWeatherMap current-weather client
pub struct OpenWeatherMapClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherMapClient {
    #[must_use]
    pub fn new(client: Client, config: &WeatherConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn current_weather_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}?q={}&appid={}&units=metric",
            endpoint(&self.base_url, "weather"),
            urlencoding::encode(query.as_str()),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapClient {
    fn is_configured(&self) -> bool {
        !is_placeholder(&self.api_key)
    }

    #[instrument(name = "openweathermap_current", skip(self, query), fields(query = %query))]
    async fn current_weather(&self, query: &SearchQuery) -> Result<WeatherSnapshot> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(self.current_weather_url(query))
            .send()
            .await
            .map_err(|e| {
                warn!("Weather request failed: {}", e.without_url());
                TripScoutError::network(format!("Weather request failed for \"{query}\""))
            })?;

        let status = response.status();
        debug!("Weather response status: {}", status);
        if !status.is_success() {
            warn!("Weather lookup returned HTTP {}", status.as_u16());
            return Err(TripScoutError::network(format!(
                "Weather data not found for \"{query}\""
            )));
        }

        let payload: owm::CurrentWeatherResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse weather response: {}", e.without_url());
            TripScoutError::malformed("Invalid weather data received from OpenWeatherMap")
        })?;

        let snapshot = WeatherSnapshot::try_from(payload)?;
        info!(
            "Retrieved weather for '{}' in {:.3}s",
            snapshot.name,
            start_time.elapsed().as_secs_f64()
        );
        Ok(snapshot)
    }
}

/// `OpenWeatherMap` response structures
mod owm {
    use serde::Deserialize;

    use crate::TripScoutError;
    use crate::models::WeatherSnapshot;

    #[derive(Debug, Deserialize)]
    pub struct CurrentWeatherResponse {
        pub name: String,
        pub main: MainReadings,
        pub weather: Vec<Condition>,
        pub wind: Wind,
        /// Shift in seconds from UTC
        pub timezone: i32,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainReadings {
        pub temp: f64,
        pub humidity: u8,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub main: String,
        pub description: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Wind {
        pub speed: f64,
    }

    impl TryFrom<CurrentWeatherResponse> for WeatherSnapshot {
        type Error = TripScoutError;

        fn try_from(response: CurrentWeatherResponse) -> Result<Self, Self::Error> {
            let condition = response.weather.into_iter().next().ok_or_else(|| {
                TripScoutError::malformed("Weather response contained no conditions")
            })?;

            Ok(WeatherSnapshot {
                name: response.name,
                temperature_c: response.main.temp,
                condition: condition.main,
                description: condition.description,
                humidity: response.main.humidity,
                wind_speed_ms: response.wind.speed,
                timezone_offset_seconds: response.timezone,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "Paris",
        "main": { "temp": 17.62, "humidity": 72, "pressure": 1012 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "wind": { "speed": 4.12, "deg": 220 },
        "timezone": 7200
    }"#;

    #[test]
    fn test_payload_to_snapshot() {
        let payload: owm::CurrentWeatherResponse = serde_json::from_str(SAMPLE).unwrap();
        let snapshot = WeatherSnapshot::try_from(payload).unwrap();
        assert_eq!(snapshot.name, "Paris");
        assert_eq!(snapshot.condition, "Rain");
        assert_eq!(snapshot.description, "light rain");
        assert_eq!(snapshot.humidity, 72);
        assert_eq!(snapshot.timezone_offset_seconds, 7200);
    }

    #[test]
    fn test_missing_conditions_is_malformed() {
        let json = SAMPLE.replace(
            r#"[{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }]"#,
            "[]",
        );
        let payload: owm::CurrentWeatherResponse = serde_json::from_str(&json).unwrap();
        let err = WeatherSnapshot::try_from(payload).unwrap_err();
        assert!(matches!(err, TripScoutError::MalformedResponse { .. }));
    }

    #[test]
    fn test_url_encodes_query() {
        let config = WeatherConfig {
            api_key: "k3y".to_string(),
            base_url: "https://api.openweathermap.org/data/2.5/".to_string(),
        };
        let client = OpenWeatherMapClient::new(Client::new(), &config);
        let query = SearchQuery::parse("San José").unwrap();
        assert_eq!(
            client.current_weather_url(&query),
            "https://api.openweathermap.org/data/2.5/weather?q=San%20Jos%C3%A9&appid=k3y&units=metric"
        );
        assert!(client.is_configured());
    }
}
