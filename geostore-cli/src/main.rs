//! geostore CLI - command-line interface
//!
//! Resolves coordinates against the reference datasets and converts entity
//! documents between foreign and normalized layouts.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{convert, lookup};
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "geostore")]
#[command(version = geostore::VERSION)]
#[command(about = "Geo-entity containers with country and city resolution", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.geostore/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find the country containing a coordinate
    Country {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Find the city closest to a coordinate
    NearestCity {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in kilometres (default: city_radius_km from config)
        #[arg(long)]
        max_km: Option<f64>,
    },
    /// List cities whose name contains a fragment
    SearchCities {
        /// Case-insensitive name fragment
        query: String,
        /// Maximum number of results
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Import an entity document and write it back out normalized
    ///
    /// Relative paths are resolved against `data_dir` from the [storage]
    /// section of the configuration.
    Convert {
        /// Source JSON document
        input: PathBuf,
        /// Destination JSON document (default: <data_dir>/<container>.json)
        output: Option<PathBuf>,
        /// Container name used while converting
        #[arg(long, default_value = "default")]
        container: String,
        /// Resolve country and city attributes before writing
        #[arg(long)]
        enrich: bool,
    },
    /// Check whether the reference data source is reachable
    Probe,
    /// Write a default configuration file if none exists
    Init,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::Init = cli.command {
        return commands::init::run();
    }

    let runner = CliRunner::new(cli.config.as_deref())?;
    runner.log_startup();

    match cli.command {
        Command::Country { lat, lon } => lookup::country(&runner, lat, lon),
        Command::NearestCity { lat, lon, max_km } => {
            lookup::nearest_city(&runner, lat, lon, max_km)
        }
        Command::SearchCities { query, limit } => lookup::search_cities(&runner, &query, limit),
        Command::Convert {
            input,
            output,
            container,
            enrich,
        } => convert::run(&runner, &input, output.as_deref(), &container, enrich),
        Command::Probe => lookup::probe(&runner),
        Command::Init => commands::init::run(),
    }
}
