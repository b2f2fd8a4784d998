//! View Renderer
//!
//! Pure transformation from fetched data to a view model. Rendering adapters
//! (terminal, web API) consume [`ViewState`] and never touch providers.

use std::fmt::{self, Display};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::{DestinationImage, DestinationResult, WeatherSnapshot};

/// Substituted when a gallery image fails to load
pub const IMAGE_FALLBACK_URL: &str = "https://placehold.co/600x400/e2e8f0/4a5568?text=Image+Not+Found";

/// Alt text for images the provider did not describe
pub const DEFAULT_ALT_TEXT: &str = "Destination image";

pub const NO_IMAGES_MESSAGE: &str = "No images found for this destination.";

/// The four mutually exclusive display states of the result area
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "content", rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    Loading,
    Error(String),
    Loaded(DestinationView),
}

impl ViewState {
    /// Error state with the user-facing `Error:` marker
    #[must_use]
    pub fn error(message: &str) -> Self {
        ViewState::Error(format!("Error: {message}"))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Loading => "loading",
            ViewState::Error(_) => "error",
            ViewState::Loaded(_) => "loaded",
        }
    }
}

/// Condition icon selected from a fixed table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherIcon {
    Sun,
    Cloud,
    HeavyRain,
    Drizzle,
    Bolt,
    Snowflake,
    Smog,
    Unknown,
}

impl WeatherIcon {
    /// Map a provider condition keyword to its icon
    #[must_use]
    pub fn from_condition(condition: &str) -> Self {
        match condition {
            "Clear" => WeatherIcon::Sun,
            "Clouds" => WeatherIcon::Cloud,
            "Rain" => WeatherIcon::HeavyRain,
            "Drizzle" => WeatherIcon::Drizzle,
            "Thunderstorm" => WeatherIcon::Bolt,
            "Snow" => WeatherIcon::Snowflake,
            "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" => WeatherIcon::Smog,
            _ => WeatherIcon::Unknown,
        }
    }

    /// Icon font class used by the browser page
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            WeatherIcon::Sun => "fa-sun text-yellow-400",
            WeatherIcon::Cloud => "fa-cloud text-gray-400",
            WeatherIcon::HeavyRain => "fa-cloud-showers-heavy text-blue-500",
            WeatherIcon::Drizzle => "fa-cloud-rain text-blue-400",
            WeatherIcon::Bolt => "fa-bolt text-yellow-500",
            WeatherIcon::Snowflake => "fa-snowflake text-blue-200",
            WeatherIcon::Smog => "fa-smog text-gray-500",
            WeatherIcon::Unknown => "fa-question-circle text-gray-400",
        }
    }

    /// Glyph used by the terminal renderer
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            WeatherIcon::Sun => "☀️",
            WeatherIcon::Cloud => "☁️",
            WeatherIcon::HeavyRain => "🌧️",
            WeatherIcon::Drizzle => "🌦️",
            WeatherIcon::Bolt => "⚡",
            WeatherIcon::Snowflake => "❄️",
            WeatherIcon::Smog => "🌫️",
            WeatherIcon::Unknown => "❓",
        }
    }
}

/// Weather block of a loaded destination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub temperature_c: i64,
    pub condition: String,
    pub description: String,
    pub icon: WeatherIcon,
    pub icon_class: &'static str,
    pub humidity: u8,
    pub wind_speed_ms: f64,
    pub local_time: String,
}

impl WeatherView {
    #[must_use]
    pub fn build(weather: &WeatherSnapshot, now: DateTime<Utc>) -> Self {
        let icon = WeatherIcon::from_condition(&weather.condition);
        Self {
            temperature_c: weather.rounded_temperature(),
            condition: weather.condition.clone(),
            description: weather.format_description(),
            icon,
            icon_class: icon.css_class(),
            humidity: weather.humidity,
            wind_speed_ms: weather.wind_speed_ms,
            local_time: local_time(now, weather.timezone_offset_seconds),
        }
    }
}

/// One gallery tile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageTile {
    pub src: String,
    pub alt: String,
    /// Shown instead of `src` if the image fails to load
    pub fallback_src: &'static str,
}

impl From<&DestinationImage> for ImageTile {
    fn from(image: &DestinationImage) -> Self {
        Self {
            src: image.url.clone(),
            alt: image
                .alt_text
                .clone()
                .unwrap_or_else(|| DEFAULT_ALT_TEXT.to_string()),
            fallback_src: IMAGE_FALLBACK_URL,
        }
    }
}

/// Image gallery, never an empty grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gallery {
    Empty { message: &'static str },
    Tiles { tiles: Vec<ImageTile> },
}

impl Gallery {
    #[must_use]
    pub fn build(images: &[DestinationImage]) -> Self {
        if images.is_empty() {
            Gallery::Empty {
                message: NO_IMAGES_MESSAGE,
            }
        } else {
            Gallery::Tiles {
                tiles: images.iter().map(ImageTile::from).collect(),
            }
        }
    }
}

/// Everything shown for a loaded destination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationView {
    /// Canonical name from the weather provider
    pub name: String,
    pub weather: WeatherView,
    pub gallery: Gallery,
    pub map_url: String,
}

impl DestinationView {
    #[must_use]
    pub fn build(result: &DestinationResult, now: DateTime<Utc>) -> Self {
        Self {
            name: result.weather.name.clone(),
            weather: WeatherView::build(&result.weather, now),
            gallery: Gallery::build(&result.images),
            map_url: map_url(&result.weather.name),
        }
    }
}

/// Local wall-clock time at a UTC offset, formatted on a 12-hour clock
#[must_use]
pub fn local_time(now: DateTime<Utc>, offset_seconds: i32) -> String {
    let shifted = now + Duration::seconds(i64::from(offset_seconds));
    shifted.format("%I:%M %p").to_string()
}

/// Map search link for a destination name
#[must_use]
pub fn map_url(destination: &str) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        urlencoding::encode(destination)
    )
}

impl Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewState::Idle => writeln!(f, "Search for a destination to get started."),
            ViewState::Loading => writeln!(f, "⏳ Loading..."),
            ViewState::Error(message) => writeln!(f, "❌ {message}"),
            ViewState::Loaded(view) => write!(f, "{view}"),
        }
    }
}

impl Display for DestinationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weather = &self.weather;
        writeln!(f, "📍 {}", self.name)?;
        writeln!(
            f,
            "   {} {}°C  {}",
            weather.icon.glyph(),
            weather.temperature_c,
            weather.description
        )?;
        writeln!(f, "   💧 Humidity: {}%", weather.humidity)?;
        writeln!(f, "   💨 Wind: {} m/s", weather.wind_speed_ms)?;
        writeln!(f, "   🕒 Local Time: {}", weather.local_time)?;
        writeln!(f, "   🗺️ Map: {}", self.map_url)?;
        writeln!(f)?;
        match &self.gallery {
            Gallery::Empty { message } => writeln!(f, "   {message}"),
            Gallery::Tiles { tiles } => {
                writeln!(f, "   🖼️ Photos:")?;
                for tile in tiles {
                    writeln!(f, "   - {} ({})", tile.alt, tile.src)?;
                }
                Ok(())
            }
        }
    }
}
