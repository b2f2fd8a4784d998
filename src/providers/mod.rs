//! Provider seams and their HTTP implementations
//!
//! The pipelines only see the traits below; the reqwest-backed clients for
//! OpenWeatherMap, Unsplash and Gemini live in the submodules.

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use reqwest::Client;

use crate::Result;
use crate::config::HttpConfig;
use crate::models::{DestinationImage, SearchQuery, WeatherSnapshot};

pub mod gemini;
pub mod openweathermap;
pub mod unsplash;

pub use gemini::GeminiClient;
pub use openweathermap::OpenWeatherMapClient;
pub use unsplash::UnsplashClient;

/// Current weather lookup by destination name
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// False while the credential is a placeholder
    fn is_configured(&self) -> bool;

    async fn current_weather(&self, query: &SearchQuery) -> Result<WeatherSnapshot>;
}

/// Destination photo search
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// False while the credential is a placeholder
    fn is_configured(&self) -> bool;

    async fn search_images(&self, query: &SearchQuery) -> Result<Vec<DestinationImage>>;
}

/// Single-prompt text generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// False while the credential is a placeholder
    fn is_configured(&self) -> bool;

    async fn generate_text(&self, prompt: &str) -> Result<String>;
}

/// Build the HTTP client shared by all providers
pub fn build_http_client(config: &HttpConfig) -> AnyResult<Client> {
    let mut builder = Client::builder().user_agent(concat!("TripScout/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().with_context(|| "Failed to create HTTP client")
}

/// Join a configured base URL and an endpoint path
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        assert_eq!(
            endpoint("https://api.unsplash.com/", "/search/photos"),
            "https://api.unsplash.com/search/photos"
        );
        assert_eq!(
            endpoint("http://127.0.0.1:9000/data/2.5", "weather"),
            "http://127.0.0.1:9000/data/2.5/weather"
        );
    }

    #[test]
    fn test_build_http_client_with_timeout() {
        let config = HttpConfig {
            timeout_seconds: Some(5),
        };
        assert!(build_http_client(&config).is_ok());
    }
}
