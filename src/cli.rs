//! Command-line interface definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Destination weather, photos and AI itineraries from one search
#[derive(Parser, Debug)]
#[command(name = "tripscout")]
#[command(author, version, about)]
#[command(long_about = r#"
Look up current weather and photos for a destination, then generate a
day-by-day itinerary for it.

Configuration is loaded from (in priority order):
1. TRIPSCOUT_* environment variables (e.g. TRIPSCOUT_WEATHER__API_KEY)
2. --config <path>
3. ~/.config/tripscout/config.toml, else ./config.toml

Example:
  tripscout search "Lisbon"
  tripscout plan "Kyoto" --days 4 --interest food --interest temples
  tripscout serve --port 3000
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show weather, photos and a map link for a destination
    Search {
        /// Destination name
        query: String,
    },

    /// Generate an itinerary for a named destination
    Itinerary {
        /// Destination the itinerary is for
        #[arg(short, long)]
        destination: String,

        #[command(flatten)]
        trip: TripArgs,

        /// Write the plain-text itinerary to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print section titles only
        #[arg(long)]
        outline: bool,
    },

    /// Search a destination, then plan a trip to the resolved place
    Plan {
        /// Destination name
        query: String,

        #[command(flatten)]
        trip: TripArgs,

        /// Show the outline with this section (1-based) expanded
        #[arg(long, value_name = "SECTION", value_parser = clap::value_parser!(u32).range(1..))]
        open: Option<u32>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on, overrides the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Args, Debug)]
pub struct TripArgs {
    /// Trip length in days
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: u32,

    /// Interest to focus on (can be specified multiple times)
    #[arg(short, long = "interest", value_name = "TAG")]
    pub interests: Vec<String>,
}
