//! Search session
//!
//! One `SearchSession` backs one user surface. It owns the result-area
//! [`ViewState`], the itinerary panel and the last resolved destination, and
//! hands that destination explicitly to itinerary requests.
//!
//! Each submitted search gets a generation number. A result that arrives for
//! a superseded generation is dropped, so a slow stale response can neither
//! overwrite a fresher view nor change the current destination.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::fetcher::DestinationFetcher;
use crate::itinerary::{Accordion, ItineraryDocument, ItineraryGenerator};
use crate::models::{DestinationResult, ItineraryRequest, SearchQuery};
use crate::view::{DestinationView, ViewState};
use crate::Result;

/// Issued by [`SearchSession::submit`], redeemed by [`SearchSession::complete`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: SearchQuery,
}

impl SearchTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }
}

/// Itinerary area, independent of the result area
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "content", rename_all = "snake_case")]
pub enum ItineraryPanel {
    Hidden,
    Loading,
    Error(String),
    Ready(Accordion),
}

#[derive(Debug)]
pub struct SearchSession {
    view: ViewState,
    itinerary: ItineraryPanel,
    current_destination: String,
    generation: u64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: ViewState::Idle,
            itinerary: ItineraryPanel::Hidden,
            current_destination: String::new(),
            generation: 0,
        }
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn itinerary(&self) -> &ItineraryPanel {
        &self.itinerary
    }

    /// Mutable access for toggling accordion sections
    pub fn itinerary_mut(&mut self) -> &mut ItineraryPanel {
        &mut self.itinerary
    }

    /// Last successfully resolved destination, empty before the first one
    #[must_use]
    pub fn current_destination(&self) -> &str {
        &self.current_destination
    }

    /// Start a search.
    ///
    /// Blank input switches straight to the error state and returns `None`
    /// without touching the network. It still counts as a new generation, so
    /// an earlier search finishing later cannot replace the error. Otherwise
    /// the view enters `Loading`, any displayed itinerary is hidden and a
    /// ticket for the new generation is returned.
    pub fn submit(&mut self, input: &str) -> Option<SearchTicket> {
        let query = match SearchQuery::parse(input) {
            Ok(query) => query,
            Err(err) => {
                // supersede any search still in flight
                self.generation += 1;
                self.view = ViewState::error(&err.user_message());
                return None;
            }
        };

        self.generation += 1;
        self.view = ViewState::Loading;
        self.itinerary = ItineraryPanel::Hidden;
        debug!("Search generation {} for '{}'", self.generation, query);

        Some(SearchTicket {
            generation: self.generation,
            query,
        })
    }

    /// Apply the outcome of a search. Returns false when the ticket was
    /// superseded and the outcome was dropped.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<DestinationResult>,
        now: DateTime<Utc>,
    ) -> bool {
        if ticket.generation != self.generation {
            info!(
                "Dropping stale result for '{}' (generation {}, current {})",
                ticket.query, ticket.generation, self.generation
            );
            return false;
        }

        self.view = match outcome {
            Ok(result) => {
                let view = DestinationView::build(&result, now);
                self.current_destination = view.name.clone();
                ViewState::Loaded(view)
            }
            Err(err) => ViewState::error(&err.user_message()),
        };
        true
    }

    /// Submit, fetch and complete in one step
    pub async fn search(&mut self, fetcher: &DestinationFetcher, input: &str) -> &ViewState {
        if let Some(ticket) = self.submit(input) {
            let outcome = fetcher.fetch_destination(ticket.query()).await;
            self.complete(&ticket, outcome, Utc::now());
        }
        &self.view
    }

    /// Itinerary parameters bound to the current destination
    pub fn itinerary_request<I, S>(&self, days: u32, interests: I) -> Result<ItineraryRequest>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ItineraryRequest::new(self.current_destination.clone(), days, interests)
    }

    /// Show the itinerary loading indicator
    pub fn begin_itinerary(&mut self) {
        self.itinerary = ItineraryPanel::Loading;
    }

    /// Replace the loading indicator with the outcome, success or failure.
    /// The result area is left untouched.
    pub fn finish_itinerary(&mut self, outcome: Result<ItineraryDocument>) {
        self.itinerary = match outcome {
            Ok(document) => ItineraryPanel::Ready(Accordion::parse(&document)),
            Err(err) => ItineraryPanel::Error(format!("Error: {}", err.user_message())),
        };
    }

    /// Generate an itinerary for the current destination
    pub async fn plan_itinerary<I, S>(
        &mut self,
        generator: &ItineraryGenerator,
        days: u32,
        interests: I,
    ) -> &ItineraryPanel
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.begin_itinerary();
        let outcome = match self.itinerary_request(days, interests) {
            Ok(request) => generator.generate(&request).await,
            Err(err) => Err(err),
        };
        self.finish_itinerary(outcome);
        &self.itinerary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TripScoutError;
    use crate::models::WeatherSnapshot;

    fn result(name: &str) -> DestinationResult {
        DestinationResult {
            weather: WeatherSnapshot {
                name: name.to_string(),
                temperature_c: 25.0,
                condition: "Clear".to_string(),
                description: "clear sky".to_string(),
                humidity: 30,
                wind_speed_ms: 1.0,
                timezone_offset_seconds: 3600,
            },
            images: vec![],
        }
    }

    #[test]
    fn test_initial_state() {
        let session = SearchSession::new();
        assert_eq!(session.view(), &ViewState::Idle);
        assert_eq!(session.itinerary(), &ItineraryPanel::Hidden);
        assert_eq!(session.current_destination(), "");
    }

    #[test]
    fn test_blank_input_goes_straight_to_error() {
        let mut session = SearchSession::new();
        assert!(session.submit("   ").is_none());
        assert_eq!(
            session.view(),
            &ViewState::Error("Error: Please enter a destination.".to_string())
        );
    }

    #[test]
    fn test_success_sets_canonical_destination() {
        let mut session = SearchSession::new();
        let ticket = session.submit(" rome ").unwrap();
        assert_eq!(session.view(), &ViewState::Loading);
        assert_eq!(ticket.query().as_str(), "rome");

        assert!(session.complete(&ticket, Ok(result("Rome")), Utc::now()));
        assert_eq!(session.view().name(), "loaded");
        assert_eq!(session.current_destination(), "Rome");
    }

    #[test]
    fn test_failure_keeps_previous_destination() {
        let mut session = SearchSession::new();
        let ticket = session.submit("Rome").unwrap();
        session.complete(&ticket, Ok(result("Rome")), Utc::now());

        let ticket = session.submit("Atlantis").unwrap();
        session.complete(
            &ticket,
            Err(TripScoutError::network("Weather data not found for \"Atlantis\"")),
            Utc::now(),
        );

        assert_eq!(
            session.view(),
            &ViewState::Error("Error: Weather data not found for \"Atlantis\"".to_string())
        );
        assert_eq!(session.current_destination(), "Rome");
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut session = SearchSession::new();
        let first = session.submit("Paris").unwrap();
        let second = session.submit("Berlin").unwrap();
        assert!(second.generation() > first.generation());

        assert!(session.complete(&second, Ok(result("Berlin")), Utc::now()));
        assert!(!session.complete(&first, Ok(result("Paris")), Utc::now()));

        assert_eq!(session.current_destination(), "Berlin");
        let ViewState::Loaded(view) = session.view() else {
            panic!("expected loaded view");
        };
        assert_eq!(view.name, "Berlin");
    }

    #[test]
    fn test_blank_input_supersedes_search_in_flight() {
        let mut session = SearchSession::new();
        let pending = session.submit("Paris").unwrap();
        assert!(session.submit("").is_none());

        assert!(!session.complete(&pending, Ok(result("Paris")), Utc::now()));
        assert_eq!(
            session.view(),
            &ViewState::Error("Error: Please enter a destination.".to_string())
        );
        assert_eq!(session.current_destination(), "");
    }

    #[test]
    fn test_toggle_ready_itinerary_in_place() {
        let mut session = SearchSession::new();
        session.finish_itinerary(Ok(ItineraryDocument::new(
            "<h4>Day 1: A</h4><p>x</p><h4>Day 2: B</h4><p>y</p>",
        )));

        let ItineraryPanel::Ready(accordion) = session.itinerary_mut() else {
            panic!("expected itinerary");
        };
        assert!(accordion.toggle(1).unwrap());

        let ItineraryPanel::Ready(accordion) = session.itinerary() else {
            panic!("expected itinerary");
        };
        assert_eq!(accordion.expanded(), Some(1));
    }

    #[test]
    fn test_new_search_hides_itinerary() {
        let mut session = SearchSession::new();
        session.finish_itinerary(Ok(ItineraryDocument::new("<h4>Day 1: A</h4><p>x</p>")));
        assert!(matches!(session.itinerary(), ItineraryPanel::Ready(_)));

        session.submit("Lima");
        assert_eq!(session.itinerary(), &ItineraryPanel::Hidden);
    }

    #[test]
    fn test_itinerary_error_leaves_results_intact() {
        let mut session = SearchSession::new();
        let ticket = session.submit("Rome").unwrap();
        session.complete(&ticket, Ok(result("Rome")), Utc::now());

        session.begin_itinerary();
        assert_eq!(session.itinerary(), &ItineraryPanel::Loading);
        session.finish_itinerary(Err(TripScoutError::network(
            "Failed to generate itinerary. The model may be overloaded.",
        )));

        assert_eq!(
            session.itinerary(),
            &ItineraryPanel::Error(
                "Error: Failed to generate itinerary. The model may be overloaded.".to_string()
            )
        );
        assert_eq!(session.view().name(), "loaded");
    }

    #[test]
    fn test_itinerary_request_uses_current_destination() {
        let mut session = SearchSession::new();
        let request = session.itinerary_request(2, ["art"]).unwrap();
        assert_eq!(request.destination, "");

        let ticket = session.submit("kyoto").unwrap();
        session.complete(&ticket, Ok(result("Kyoto")), Utc::now());
        let request = session.itinerary_request(2, ["art"]).unwrap();
        assert_eq!(request.destination, "Kyoto");
    }
}
