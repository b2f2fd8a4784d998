use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tripscout::api::AppState;
use tripscout::cli::{Cli, Command, TripArgs};
use tripscout::itinerary::Accordion;
use tripscout::models::ItineraryRequest;
use tripscout::session::{ItineraryPanel, SearchSession};
use tripscout::view::ViewState;
use tripscout::{TripScoutConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = TripScoutConfig::load_from_path(cli.config.clone())?;
    let _telemetry = telemetry::init(&config.logging, cli.verbose)?;
    info!(
        search_configured = config.search_configured(),
        itinerary_configured = config.itinerary_configured(),
        "Starting TripScout {}",
        tripscout::VERSION
    );

    let state = AppState::from_config(&config)?;

    match cli.command {
        Command::Search { query } => {
            let mut session = SearchSession::new();
            let view = session.search(&state.fetcher, &query).await;
            print!("{view}");
            Ok(exit_code(matches!(view, ViewState::Loaded(_))))
        }
        Command::Itinerary {
            destination,
            trip,
            output,
            outline,
        } => {
            let request = ItineraryRequest::new(destination, trip.days, trip.interests)?;
            match state.generator.generate(&request).await {
                Ok(document) => {
                    let accordion = Accordion::parse(&document);
                    print_itinerary(&accordion, outline);
                    if let Some(path) = output {
                        save(&accordion, &path)?;
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    eprintln!("❌ Error: {}", err.user_message());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Plan {
            query,
            trip: TripArgs { days, interests },
            open,
        } => {
            let mut session = SearchSession::new();
            let view = session.search(&state.fetcher, &query).await;
            print!("{view}");
            if !matches!(view, ViewState::Loaded(_)) {
                return Ok(ExitCode::FAILURE);
            }

            println!();
            println!("🗺️  {days}-day itinerary for {}", session.current_destination());
            session.plan_itinerary(&state.generator, days, interests).await;
            if let (Some(section), ItineraryPanel::Ready(accordion)) = (open, session.itinerary_mut()) {
                accordion.toggle(section as usize - 1)?;
            }

            match session.itinerary() {
                ItineraryPanel::Ready(accordion) => {
                    print_itinerary(accordion, open.is_some());
                    Ok(ExitCode::SUCCESS)
                }
                ItineraryPanel::Error(message) => {
                    eprintln!("❌ {message}");
                    Ok(ExitCode::FAILURE)
                }
                ItineraryPanel::Hidden | ItineraryPanel::Loading => Ok(ExitCode::FAILURE),
            }
        }
        Command::Serve { port } => {
            if let Some(port) = port {
                config.web.port = port;
            }
            config.validate()?;
            web::run(&config.web, state).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_itinerary(accordion: &Accordion, outline: bool) {
    if outline {
        print!("{accordion}");
    } else {
        println!("{}", accordion.plain_text());
    }
}

fn save(accordion: &Accordion, path: &Path) -> Result<()> {
    accordion
        .write_plain_text(path)
        .with_context(|| format!("Failed to write itinerary to {}", path.display()))?;
    println!("📋 Itinerary copied to {}", path.display());
    Ok(())
}
