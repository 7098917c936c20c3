mod cli;
mod commands;
mod console;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use halo_runner::{Services, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Loads .env, so it runs before the exporter endpoint is read.
    let settings = Settings::from_env();
    init_logging();

    let result = run(cli.command, settings).await;
    halo_telemetry::shutdown_telemetry();
    result
}

fn init_logging() {
    let initialized = match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Ok(endpoint) if !endpoint.trim().is_empty() => halo_telemetry::init_with_otlp("halo", &endpoint),
        _ => halo_telemetry::init_telemetry("halo"),
    };
    if let Err(e) = initialized {
        eprintln!("Failed to initialize telemetry: {e}");
    }
}

async fn run(command: Commands, settings: Settings) -> Result<()> {
    let services = Services::from_settings(settings).await?;

    match command {
        Commands::Chat { session, channel } => {
            let runner = services.runner()?;
            console::run_chat(&runner, &session, &channel).await
        }
        Commands::Ingest { file, collection, replace } => {
            commands::ingest(&services, &file, collection.as_deref(), replace).await
        }
        Commands::Search { query, k, collection } => {
            commands::search(&services, &query, k, collection.as_deref()).await
        }
        Commands::Stats { collection } => commands::stats(&services, collection.as_deref()).await,
    }
}
