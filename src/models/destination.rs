//! Search query, image results and the merged destination result

use serde::{Deserialize, Serialize};

use super::WeatherSnapshot;
use crate::{Result, TripScoutError};

/// A trimmed, non-empty destination query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Trim user input and reject blank queries
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TripScoutError::empty_input("Please enter a destination."));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One photo returned by the image search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationImage {
    pub url: String,
    pub alt_text: Option<String>,
}

/// Both halves of a successful search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationResult {
    pub weather: WeatherSnapshot,
    /// Ordered as received, at most one page
    pub images: Vec<DestinationImage>,
}
