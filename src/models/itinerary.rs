//! Itinerary request parameters

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Result, TripScoutError};

/// Interest phrase used when no interest is selected
pub const DEFAULT_INTERESTS: &str = "general sightseeing";

/// Parameters for one itinerary generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryRequest {
    /// Last resolved destination, passed through as-is (may be empty)
    pub destination: String,
    /// Trip length in days, at least one
    pub days: u32,
    /// Selected interest tags
    #[serde(default)]
    pub interests: BTreeSet<String>,
}

impl ItineraryRequest {
    /// Build a request, rejecting a zero-day trip
    pub fn new<I, S>(destination: impl Into<String>, days: u32, interests: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = Self {
            destination: destination.into(),
            days,
            interests: interests
                .into_iter()
                .map(Into::into)
                .map(|tag: String| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Check invariants of a request that arrived deserialized
    pub fn validate(&self) -> Result<()> {
        if self.days == 0 {
            return Err(TripScoutError::validation(
                "Trip length must be at least one day.",
            ));
        }
        Ok(())
    }

    /// Interests joined for the prompt, or the default phrase
    #[must_use]
    pub fn interests_phrase(&self) -> String {
        if self.interests.is_empty() {
            DEFAULT_INTERESTS.to_string()
        } else {
            self.interests
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}
