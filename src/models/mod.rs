//! Data models for TripScout
//!
//! This module contains the core domain models organized by concern:
//! - Weather: current conditions for a destination
//! - Destination: search query, images and the merged search result
//! - Itinerary: parameters of an itinerary request

pub mod destination;
pub mod itinerary;
pub mod weather;

// Re-export all public types for convenient access
pub use destination::{DestinationImage, DestinationResult, SearchQuery};
pub use itinerary::{DEFAULT_INTERESTS, ItineraryRequest};
pub use weather::WeatherSnapshot;
