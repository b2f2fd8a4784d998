//! Destination Fetcher
//!
//! Queries weather and images for one destination at the same time and
//! merges both halves into a single [`DestinationResult`], or fails with one
//! descriptive error.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::models::{DestinationResult, SearchQuery};
use crate::providers::{ImageProvider, WeatherProvider};
use crate::{Result, TripScoutError};

pub const KEYS_MISSING_MESSAGE: &str =
    "API keys are missing. Please add your Unsplash and OpenWeatherMap API keys.";

/// Concurrent weather + image lookup
#[derive(Clone)]
pub struct DestinationFetcher {
    weather: Arc<dyn WeatherProvider>,
    images: Arc<dyn ImageProvider>,
}

impl DestinationFetcher {
    pub fn new(weather: Arc<dyn WeatherProvider>, images: Arc<dyn ImageProvider>) -> Self {
        Self { weather, images }
    }

    /// Both search credentials are present
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.weather.is_configured() && self.images.is_configured()
    }

    /// Fetch both halves of a destination result.
    ///
    /// Both requests are always issued and awaited together. Status failures
    /// are checked before decode failures, weather before images within each.
    #[instrument(name = "fetch_destination", skip(self, query), fields(query = %query))]
    pub async fn fetch_destination(&self, query: &SearchQuery) -> Result<DestinationResult> {
        if !self.is_configured() {
            warn!("Search credentials are placeholders, skipping network calls");
            return Err(TripScoutError::configuration_missing(KEYS_MISSING_MESSAGE));
        }

        let start_time = Instant::now();
        debug!("Issuing weather and image requests");

        let (weather, images) = tokio::join!(
            self.weather.current_weather(query),
            self.images.search_images(query)
        );

        let (weather, images) = match (weather, images) {
            (Ok(weather), Ok(images)) => (weather, images),
            // a failed status on either side outranks an undecodable body
            (Err(err), _) if is_status_failure(&err) => return Err(err),
            (_, Err(err)) if is_status_failure(&err) => return Err(err),
            (Err(err), _) | (_, Err(err)) => return Err(err),
        };

        info!(
            "Resolved '{}' to '{}' with {} images in {:.3}s",
            query,
            weather.name,
            images.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(DestinationResult { weather, images })
    }
}

fn is_status_failure(err: &TripScoutError) -> bool {
    matches!(err, TripScoutError::Network { .. })
}
