use std::path::PathBuf;

use anyhow::{Context, Result};
use atpl_extractor::config::{resolve_config, Config};
use atpl_extractor::db::{default_database_path, Database};
use atpl_extractor::ExtractionService;
use atpl_extractor_server::{build_router, logging, AppState};
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(name = "atpl-extractor-server")]
#[command(version, about = "HTTP API for the ATPL extractor dashboard")]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long, env = "ATPL_EXTRACTOR_CONFIG")]
    config: Option<PathBuf>,
}

fn database_path(config: &Config) -> Result<PathBuf> {
    config
        .database_path
        .clone()
        .or_else(default_database_path)
        .context("Could not determine a database location; set database_path")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = resolve_config(args.config.as_deref()).context("Failed to load configuration")?;
    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    info!("Starting ATPL extractor v{}", env!("CARGO_PKG_VERSION"));

    let db_path = database_path(&config)?;
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    let service = ExtractionService::new(db, config.simulation.clone());
    let interrupted = service
        .reconcile_interrupted()
        .context("Failed to reconcile interrupted jobs")?;
    if !interrupted.is_empty() {
        info!("Jobs paused after restart: {}", interrupted.join(", "));
    }

    let app = build_router(AppState::new(service.clone()));
    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    service.shutdown().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
