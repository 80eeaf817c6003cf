//! labeler-web - Segment labeling service
//!
//! Lists unlabeled image segments from the hosted segment table, stages
//! labels entered in the web UI, and on commit writes them back to the table
//! and regenerates the offline spreadsheet.

use anyhow::Result;
use clap::Parser;
use labeler_common::config::LabelerConfig;
use labeler_common::logging::init_logging;
use labeler_web::cli::Cli;
use labeler_web::export::XlsxExporter;
use labeler_web::store::PostgrestStore;
use labeler_web::{build_router, AppState};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration is needed before logging so the log level can come from it
    let config = LabelerConfig::resolve(cli.into())?;

    init_logging(&config.log_level);

    info!(
        "Starting segment labeler (labeler-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config.config_file {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file found; using arguments, environment and defaults"),
    }
    info!("Configuration: {:?}", config);
    info!("Segment store: {} (table {})", config.store_url, config.table);
    info!("Storage bucket: {}", config.bucket);
    info!("Export path: {}", config.export_path.display());

    let store = match PostgrestStore::from_config(&config) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to create segment store client: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(Arc::new(store), XlsxExporter::new(&config.export_path));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("labeler-web listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
