//! `TripScout` - Destination weather, photos and AI itineraries
//!
//! This library provides the search pipeline (concurrent weather and image
//! lookup), the view model rendered from it, and itinerary generation with
//! accordion segmentation.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod itinerary;
pub mod models;
pub mod providers;
pub mod session;
pub mod telemetry;
pub mod view;
pub mod web;

// Re-export core types for public API
pub use config::TripScoutConfig;
pub use error::TripScoutError;
pub use fetcher::DestinationFetcher;
pub use itinerary::{Accordion, ItineraryDocument, ItineraryGenerator};
pub use models::{DestinationResult, ItineraryRequest, SearchQuery, WeatherSnapshot};
pub use session::{ItineraryPanel, SearchSession, SearchTicket};
pub use view::{DestinationView, ViewState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripScoutError>;
