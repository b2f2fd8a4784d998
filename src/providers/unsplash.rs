//! Image search client for Unsplash

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use super::{ImageProvider, endpoint};
use crate::config::{ImagesConfig, is_placeholder};
use crate::models::{DestinationImage, SearchQuery};
use crate::{Result, TripScoutError};

/// Keyword appended to every query to bias results toward travel photos
const TRAVEL_KEYWORD: &str = "travel";

pub struct UnsplashClient {
    client: Client,
    base_url: String,
    api_key: String,
    per_page: u32,
}

impl UnsplashClient {
    #[must_use]
    pub fn new(client: Client, config: &ImagesConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            per_page: config.per_page,
        }
    }

    fn search_url(&self, query: &SearchQuery) -> String {
        let keywords = format!("{} {TRAVEL_KEYWORD}", query.as_str());
        format!(
            "{}?query={}&client_id={}&per_page={}",
            endpoint(&self.base_url, "search/photos"),
            urlencoding::encode(&keywords),
            urlencoding::encode(&self.api_key),
            self.per_page
        )
    }
}

#[async_trait]
impl ImageProvider for UnsplashClient {
    fn is_configured(&self) -> bool {
        !is_placeholder(&self.api_key)
    }

    #[instrument(name = "unsplash_search", skip(self, query), fields(query = %query))]
    async fn search_images(&self, query: &SearchQuery) -> Result<Vec<DestinationImage>> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(self.search_url(query))
            .send()
            .await
            .map_err(|e| {
                warn!("Image request failed: {}", e.without_url());
                TripScoutError::network("Could not fetch images.")
            })?;

        let status = response.status();
        debug!("Image response status: {}", status);
        if !status.is_success() {
            warn!("Image search returned HTTP {}", status.as_u16());
            return Err(TripScoutError::network("Could not fetch images."));
        }

        let payload: wire::SearchResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse image response: {}", e.without_url());
            TripScoutError::malformed("Invalid image data received from Unsplash")
        })?;

        let images: Vec<DestinationImage> = payload
            .results
            .into_iter()
            .take(self.per_page as usize)
            .map(DestinationImage::from)
            .collect();

        info!(
            "Found {} images in {:.3}s",
            images.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(images)
    }
}

/// Unsplash search response structures
mod wire {
    use serde::Deserialize;

    use crate::models::DestinationImage;

    #[derive(Debug, Deserialize)]
    pub struct SearchResponse {
        pub results: Vec<Photo>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Photo {
        pub urls: PhotoUrls,
        pub alt_description: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct PhotoUrls {
        pub regular: String,
    }

    impl From<Photo> for DestinationImage {
        fn from(photo: Photo) -> Self {
            DestinationImage {
                url: photo.urls.regular,
                alt_text: photo.alt_description.filter(|alt| !alt.trim().is_empty()),
            }
        }
    }
}
