// In app/src/main.rs

use anyhow::Result;
use app_config::Settings;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use engine::Engine;
use std::str::FromStr;
use tracing_subscriber::prelude::*;

mod report;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Scans a stock universe for V20 momentum signals.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs one scan of the configured universe and prints the ranked signals.
    Scan {
        /// Overrides the configured minimum streak move, in percent.
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Scans as if today were this date (YYYY-MM-DD).
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Prints the signals as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Serves the ranked signals over HTTP.
    Serve,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let mut settings = app_config::load_settings()?;
    init_tracing(&settings.app.log_level);
    tracing::info!(environment = %settings.app.environment, "Starting V20 scanner");

    match cli.command {
        Commands::Scan {
            threshold,
            as_of,
            json,
        } => {
            if let Some(threshold) = threshold {
                override_threshold(&mut settings, threshold);
            }
            handle_scan(&settings, as_of, json).await?;
        }
        Commands::Serve => {
            handle_serve(settings).await?;
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let level = tracing::Level::from_str(log_level).unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new()
            .with_target("hyper", tracing::Level::WARN)
            .with_target("reqwest", tracing::Level::WARN)
            .with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Replaces `threshold_percent` in the strategy's raw parameter table.
fn override_threshold(settings: &mut Settings, threshold: f64) {
    if !settings.strategy.params.is_table() {
        settings.strategy.params = toml::Value::Table(toml::map::Map::new());
    }
    if let Some(table) = settings.strategy.params.as_table_mut() {
        table.insert("threshold_percent".to_string(), toml::Value::Float(threshold));
    }
}

// --- "Scan" Subcommand Logic ---

async fn handle_scan(settings: &Settings, as_of: Option<NaiveDate>, json: bool) -> Result<()> {
    let engine = Engine::from_settings(settings)?;

    let results = match as_of {
        Some(date) => engine.run_strategy_as_of(date).await,
        None => engine.run_strategy().await,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("{}", report::render_table(&results));
    }

    Ok(())
}

// --- "Serve" Subcommand Logic ---

async fn handle_serve(settings: Settings) -> Result<()> {
    let engine = Engine::from_settings(&settings)?;
    web_server::run(settings.server, engine).await?;
    Ok(())
}
