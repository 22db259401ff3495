//! SuitMe CLI: offline tools around the measurement pipeline.
//!
//! Usage:
//!   suitme replay <FILE> --shoulder-width <CM>   Replay a landmark recording
//!   suitme classify --shoulders --torso --legs   Size a set of measurements
//!   suitme chart                                 Print the size charts
//!   suitme config [--init]                       Show or create the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use suitme_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "suitme",
    about = "Body measurement and garment sizing from pose landmarks",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded landmark stream through a measurement session
    Replay {
        /// Path to the JSONL recording
        path: PathBuf,

        /// The subject's real shoulder width (cm)
        #[arg(long, default_value = "40.0")]
        shoulder_width: f64,

        /// Camera distance (m); defaults to the configured distance
        #[arg(long)]
        distance: Option<f64>,

        /// The subject's real height (cm)
        #[arg(long)]
        height: Option<f64>,

        /// Print only the final capture, as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify measurements (cm) against the size charts
    Classify {
        /// Shoulder width (cm)
        #[arg(long)]
        shoulders: f64,

        /// Torso length (cm)
        #[arg(long)]
        torso: f64,

        /// Leg length (cm)
        #[arg(long)]
        legs: f64,
    },

    /// Print the size charts
    Chart,

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    suitme_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Replay {
            path,
            shoulder_width,
            distance,
            height,
            json,
        } => commands::replay::run(
            path,
            config.measurement,
            shoulder_width,
            distance,
            height,
            json,
        ),
        Commands::Classify {
            shoulders,
            torso,
            legs,
        } => commands::classify::run(shoulders, torso, legs),
        Commands::Chart => commands::chart::run(),
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
