mod api;
mod config;
mod controller;
mod input;
mod models;
mod view;

use anyhow::{Context, Result};
use api::HttpSchoolApi;
use clap::Parser;
use config::Settings;
use controller::Controller;
use input::Command;
use models::LocationField;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Register schools and list them by distance from your location
#[derive(Debug, Parser)]
#[command(name = "school-locator", version)]
struct Args {
    /// Base URL of the school API (overrides config and environment)
    #[arg(long, value_name = "URL")]
    api_base_url: Option<String>,

    /// Config file, defaults to ./school-locator.toml when present
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Your latitude; with --longitude, lists schools right away
    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<String>,

    /// Your longitude
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the screen on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("🏫 School Locator");

    let settings = Settings::load(args.config.as_deref(), args.api_base_url)?;
    let api = HttpSchoolApi::new(&settings)?;
    info!("Using school API at {}", api.base_url());

    let mut controller = Controller::new(api);

    if let Some(latitude) = args.latitude {
        let latitude = input::numeric_value("--latitude", latitude.trim())?;
        controller.update_location_field(LocationField::Latitude, latitude);
    }
    if let Some(longitude) = args.longitude {
        let longitude = input::numeric_value("--longitude", longitude.trim())?;
        controller.update_location_field(LocationField::Longitude, longitude);
    }

    println!("{}", input::HELP);
    println!();
    print!("{}", view::render(controller.state()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };

                match input::parse_command(&line) {
                    Ok(None) => continue,
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => {
                        println!("{}", input::HELP);
                        continue;
                    }
                    Ok(Some(command)) => apply(&mut controller, command),
                    Err(err) => {
                        println!("{}", err);
                        continue;
                    }
                }
            }
            _ = controller.process_next() => {}
        }

        println!();
        print!("{}", view::render(controller.state()));
    }

    info!("👋 Bye");
    Ok(())
}

fn apply(controller: &mut Controller<HttpSchoolApi>, command: Command) {
    match command {
        Command::Draft(field, value) => controller.update_draft_field(field, value),
        Command::Location(field, value) => controller.update_location_field(field, value),
        Command::Submit => {
            if let Err(err) = controller.submit_draft() {
                println!("Cannot submit: {}", err);
            }
        }
        Command::Refresh => {
            if !controller.state().location.is_complete() {
                println!("Enter your latitude and longitude first");
            }
            controller.refresh_schools();
        }
        Command::Show | Command::Help | Command::Quit => {}
    }
}
