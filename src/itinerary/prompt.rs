//! Prompt construction for itinerary generation

use crate::models::ItineraryRequest;

/// Build the natural-language prompt for one itinerary request.
///
/// The markup contract here is what [`super::accordion`] parses: `<h4>` day
/// titles, `<h5>` times of day, `<p>` descriptions.
#[must_use]
pub fn build_prompt(request: &ItineraryRequest) -> String {
    format!(
        "You are an expert travel guide. Create a detailed, day-by-day travel itinerary for a \
{days}-day trip to {destination}. The traveler is interested in {interests}.
For each day, suggest a 'Morning', 'Afternoon', and 'Evening' activity with a brief, engaging \
description for each.
At the end, include a \"Good to Know\" section with practical tips about: local currency, 1-2 \
essential phrases in the local language, and common transportation methods.
Format the output in clean HTML. Use <h4> for day titles (e.g., 'Day 1: Arrival and \
Exploration'), <h5> for time of day (e.g., 'Morning'), and <p> for descriptions. The 'Good to \
Know' section should use an <h4> title. Do not include ```html or any markdown.",
        days = request.days,
        destination = request.destination,
        interests = request.interests_phrase(),
    )
}
