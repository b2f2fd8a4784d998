//! Generative-text client for the Gemini `generateContent` endpoint

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use super::{TextGenerator, endpoint};
use crate::config::{GenerativeConfig, is_placeholder};
use crate::{Result, TripScoutError};

/// Shown when the provider fails without an error message of its own
pub const OVERLOADED_MESSAGE: &str = "Failed to generate itinerary. The model may be overloaded.";

pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    #[must_use]
    pub fn new(client: Client, config: &GenerativeConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}?key={}",
            endpoint(
                &self.base_url,
                &format!("models/{}:generateContent", self.model)
            ),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn is_configured(&self) -> bool {
        !is_placeholder(&self.api_key)
    }

    #[instrument(name = "gemini_generate", skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let start_time = Instant::now();

        let response = self
            .client
            .post(self.generate_url())
            .json(&wire::GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| {
                warn!("Generation request failed: {}", e.without_url());
                TripScoutError::network(OVERLOADED_MESSAGE)
            })?;

        let status = response.status();
        debug!("Generation response status: {}", status);
        if !status.is_success() {
            let message = response
                .json::<wire::ErrorEnvelope>()
                .await
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|error| error.message)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| OVERLOADED_MESSAGE.to_string());
            warn!("Generation returned HTTP {}: {}", status.as_u16(), message);
            return Err(TripScoutError::network(message));
        }

        let payload: wire::GenerateContentResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse generation response: {}", e.without_url());
            TripScoutError::malformed("Invalid itinerary data received from Gemini")
        })?;

        let text = payload.first_text().ok_or_else(|| {
            TripScoutError::malformed("The itinerary response did not contain any content.")
        })?;

        info!(
            "Generated {} characters with {} in {:.3}s",
            text.len(),
            self.model,
            start_time.elapsed().as_secs_f64()
        );
        Ok(text)
    }
}

/// Gemini request and response structures
mod wire {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize)]
    pub struct GenerateContentRequest<'a> {
        pub contents: Vec<RequestContent<'a>>,
    }

    #[derive(Debug, Serialize)]
    pub struct RequestContent<'a> {
        pub parts: Vec<RequestPart<'a>>,
    }

    #[derive(Debug, Serialize)]
    pub struct RequestPart<'a> {
        pub text: &'a str,
    }

    impl<'a> GenerateContentRequest<'a> {
        pub fn from_prompt(prompt: &'a str) -> Self {
            Self {
                contents: vec![RequestContent {
                    parts: vec![RequestPart { text: prompt }],
                }],
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct GenerateContentResponse {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Candidate {
        pub content: Option<CandidateContent>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CandidateContent {
        #[serde(default)]
        pub parts: Vec<ResponsePart>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponsePart {
        pub text: Option<String>,
    }

    impl GenerateContentResponse {
        /// First candidate's first part, when it is text
        pub fn first_text(self) -> Option<String> {
            self.candidates
                .into_iter()
                .next()?
                .content?
                .parts
                .into_iter()
                .next()?
                .text
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorEnvelope {
        pub error: Option<ErrorBody>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub message: Option<String>,
    }
}
