//! JSON API
//!
//! Stateless handlers: each search runs in a fresh [`SearchSession`] and
//! itinerary requests carry their destination in the body. Ordering of
//! overlapping searches is the caller's job (the browser page tracks it).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    TripScoutError, VERSION,
    config::TripScoutConfig,
    fetcher::DestinationFetcher,
    itinerary::{Accordion, Block, ItineraryGenerator, Section},
    models::ItineraryRequest,
    providers::{GeminiClient, OpenWeatherMapClient, UnsplashClient, build_http_client},
    session::SearchSession,
    view::ViewState,
};

/// Shared by every request; holds no per-user state
#[derive(Clone)]
pub struct AppState {
    pub fetcher: DestinationFetcher,
    pub generator: ItineraryGenerator,
}

impl AppState {
    /// Wire the reqwest-backed providers from configuration
    pub fn from_config(config: &TripScoutConfig) -> anyhow::Result<Self> {
        let client = build_http_client(&config.http)?;
        let weather = Arc::new(OpenWeatherMapClient::new(client.clone(), &config.weather));
        let images = Arc::new(UnsplashClient::new(client.clone(), &config.images));
        let generator = Arc::new(GeminiClient::new(client, &config.generative));

        Ok(Self {
            fetcher: DestinationFetcher::new(weather, images),
            generator: ItineraryGenerator::new(generator),
        })
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize, Deserialize)]
pub struct ItineraryPayload {
    pub destination: String,
    pub days: u32,
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Serialize)]
pub struct ItineraryResponse {
    pub preamble: Vec<Block>,
    pub sections: Vec<Section>,
    pub plain_text: String,
}

impl From<Accordion> for ItineraryResponse {
    fn from(accordion: Accordion) -> Self {
        Self {
            plain_text: accordion.plain_text(),
            preamble: accordion.preamble().to_vec(),
            sections: accordion.sections().to_vec(),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub search_configured: bool,
    pub itinerary_configured: bool,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Pipeline failure rendered as `{ "error": "Error: ..." }`
pub struct ApiError(TripScoutError);

impl From<TripScoutError> for ApiError {
    fn from(err: TripScoutError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: format!("Error: {}", self.0.user_message()),
        };
        (status_for(&self.0), Json(body)).into_response()
    }
}

/// HTTP status for each failure kind
pub fn status_for(err: &TripScoutError) -> StatusCode {
    match err {
        TripScoutError::EmptyInput { .. } | TripScoutError::Validation { .. } => {
            StatusCode::BAD_REQUEST
        }
        TripScoutError::ConfigurationMissing { .. } => StatusCode::SERVICE_UNAVAILABLE,
        TripScoutError::Network { .. } | TripScoutError::MalformedResponse { .. } => {
            StatusCode::BAD_GATEWAY
        }
        TripScoutError::Config { .. } | TripScoutError::Io { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/itinerary", post(itinerary))
        .route("/health", get(health))
        .with_state(state)
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<ViewState>) {
    let mut session = SearchSession::new();
    let Some(ticket) = session.submit(&params.q) else {
        return (StatusCode::BAD_REQUEST, Json(session.view().clone()));
    };

    let outcome = state.fetcher.fetch_destination(ticket.query()).await;
    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            warn!("Search for '{}' failed: {}", ticket.query(), err);
            status_for(err)
        }
    };
    session.complete(&ticket, outcome, Utc::now());

    (status, Json(session.view().clone()))
}

async fn itinerary(
    State(state): State<AppState>,
    Json(payload): Json<ItineraryPayload>,
) -> Result<Json<ItineraryResponse>, ApiError> {
    let request = ItineraryRequest::new(payload.destination, payload.days, payload.interests)?;
    let document = state.generator.generate(&request).await.inspect_err(|err| {
        warn!("Itinerary for '{}' failed: {}", request.destination, err);
    })?;

    let accordion = Accordion::parse(&document);
    if accordion.day_count() != request.days as usize {
        warn!(
            "Asked for {} days, itinerary for '{}' has {}",
            request.days,
            request.destination,
            accordion.day_count()
        );
    }
    info!(
        "Serving itinerary for '{}' with {} sections",
        request.destination,
        accordion.sections().len()
    );
    Ok(Json(accordion.into()))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
        search_configured: state.fetcher.is_configured(),
        itinerary_configured: state.generator.is_configured(),
    })
}
