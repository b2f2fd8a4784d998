//! Itinerary Generator
//!
//! Turns an [`ItineraryRequest`] into a prompt, asks the generative-text
//! provider for a document, and hands back the markup. Segmenting the markup
//! into an accordion is done afterwards by [`accordion::Accordion`].

pub mod accordion;
pub mod prompt;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::models::ItineraryRequest;
use crate::providers::TextGenerator;
use crate::{Result, TripScoutError};

pub use accordion::{Accordion, Block, Section};
pub use prompt::build_prompt;

pub const KEY_MISSING_MESSAGE: &str = "Please add your Gemini API key to generate an itinerary.";

/// Markup returned by the provider, rendered as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ItineraryDocument(String);

impl ItineraryDocument {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    #[must_use]
    pub fn as_markup(&self) -> &str {
        &self.0
    }
}

#[derive(Clone)]
pub struct ItineraryGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl ItineraryGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.generator.is_configured()
    }

    /// Generate the itinerary document for one request.
    ///
    /// The destination is not checked; an empty one is passed into the prompt.
    #[instrument(name = "generate_itinerary", skip(self, request), fields(destination = %request.destination, days = request.days))]
    pub async fn generate(&self, request: &ItineraryRequest) -> Result<ItineraryDocument> {
        if !self.is_configured() {
            warn!("Generative-text credential is a placeholder, skipping network call");
            return Err(TripScoutError::configuration_missing(KEY_MISSING_MESSAGE));
        }
        request.validate()?;

        let prompt = build_prompt(request);
        let text = self.generator.generate_text(&prompt).await?;
        let document = ItineraryDocument::new(strip_code_fence(&text));

        info!(
            "Itinerary for '{}' ready ({} characters)",
            request.destination,
            document.as_markup().len()
        );
        Ok(document)
    }
}

/// Remove a ```html ... ``` wrapper the model was told not to add
fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let body = match rest.split_once('\n') {
        // drop the language tag line
        Some((_, body)) => body,
        // fenced on a single line, the tag is glued to the markup
        None => {
            let untagged = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
            if untagged.starts_with('<') || untagged.starts_with(char::is_whitespace) {
                untagged
            } else {
                rest
            }
        }
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeGenerator {
        configured: bool,
        reply: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        fn new(configured: bool, reply: std::result::Result<&str, &str>) -> Arc<Self> {
            Arc::new(Self {
                configured,
                reply: reply.map(str::to_string).map_err(str::to_string),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn generate_text(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(TripScoutError::network)
        }
    }

    const REPLY: &str = "<h4>Day 1: Old Town</h4><h5>Morning</h5><p>Castle.</p>\
<h5>Afternoon</h5><p>Bridge.</p><h5>Evening</h5><p>Dinner.</p>\
<h4>Day 2: Hills</h4><h5>Morning</h5><p>Hike.</p><h5>Afternoon</h5><p>Picnic.</p>\
<h5>Evening</h5><p>Concert.</p>\
<h4>Day 3: River</h4><h5>Morning</h5><p>Boat.</p><h5>Afternoon</h5><p>Museum.</p>\
<h5>Evening</h5><p>Farewell.</p>";

    #[tokio::test]
    async fn test_generate_three_day_default_interests() {
        let fake = FakeGenerator::new(true, Ok(REPLY));
        let generator = ItineraryGenerator::new(fake.clone());
        let request = ItineraryRequest::new("Prague", 3, Vec::<String>::new()).unwrap();

        let document = generator.generate(&request).await.unwrap();

        let prompts = fake.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("3-day"));
        assert!(prompts[0].contains("general sightseeing"));

        let accordion = Accordion::parse(&document);
        assert_eq!(accordion.sections().len(), 3);
        assert_eq!(accordion.expanded(), None);
    }

    #[tokio::test]
    async fn test_placeholder_key_skips_network() {
        let fake = FakeGenerator::new(false, Ok(REPLY));
        let generator = ItineraryGenerator::new(fake.clone());
        let request = ItineraryRequest::new("Prague", 3, Vec::<String>::new()).unwrap();

        let err = generator.generate(&request).await.unwrap_err();
        assert!(matches!(err, TripScoutError::ConfigurationMissing { .. }));
        assert_eq!(err.user_message(), KEY_MISSING_MESSAGE);
        assert!(fake.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_propagated() {
        let fake = FakeGenerator::new(true, Err("quota exceeded"));
        let generator = ItineraryGenerator::new(fake);
        let request = ItineraryRequest::new("Prague", 2, ["food"]).unwrap();

        let err = generator.generate(&request).await.unwrap_err();
        assert_eq!(err.user_message(), "quota exceeded");
    }

    #[tokio::test]
    async fn test_deserialized_zero_day_request_is_rejected() {
        let fake = FakeGenerator::new(true, Ok(REPLY));
        let generator = ItineraryGenerator::new(fake.clone());
        let request: ItineraryRequest =
            serde_json::from_str(r#"{ "destination": "Prague", "days": 0 }"#).unwrap();

        let err = generator.generate(&request).await.unwrap_err();
        assert!(matches!(err, TripScoutError::Validation { .. }));
        assert!(fake.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_line_fenced_reply_keeps_content() {
        let fake = FakeGenerator::new(true, Ok("```html<h4>Day 1: A</h4><p>x</p><h4>Day 2: B</h4><p>y</p>```"));
        let generator = ItineraryGenerator::new(fake);
        let request = ItineraryRequest::new("Prague", 2, Vec::<String>::new()).unwrap();

        let document = generator.generate(&request).await.unwrap();
        assert_eq!(Accordion::parse(&document).sections().len(), 2);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```html\n<h4>Day 1</h4>\n```"), "<h4>Day 1</h4>");
        assert_eq!(strip_code_fence("```\n<p>x</p>```"), "<p>x</p>");
        assert_eq!(strip_code_fence("  <h4>Day 1</h4>\n"), "<h4>Day 1</h4>");
        assert_eq!(
            strip_code_fence("```<h4>Day 1: A</h4><p>x</p>```"),
            "<h4>Day 1: A</h4><p>x</p>"
        );
        assert_eq!(
            strip_code_fence("```html<h4>Day 1: A</h4>```"),
            "<h4>Day 1: A</h4>"
        );
        assert_eq!(strip_code_fence("```html <p>x</p> ```"), "<p>x</p>");
    }
}
