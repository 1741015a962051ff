mod config;
mod db;
mod errors;
mod extraction;
mod jobs;
mod matching;
mod models;
mod routes;
mod scans;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::HttpSkillExtractor;
use crate::matching::synonyms::SynonymTable;
use crate::matching::MatchingEngine;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vigyantra API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Synonym table is published once and never mutated afterwards
    let synonyms = match &config.synonyms_path {
        Some(path) => SynonymTable::from_file(path)?,
        None => SynonymTable::builtin()?,
    };
    info!(
        "Synonym table loaded: {} canonical skills, {} aliases",
        synonyms.canonical_count(),
        synonyms.alias_count()
    );
    let engine = MatchingEngine::new(Arc::new(synonyms));

    // Initialize extraction client
    let extractor = HttpSkillExtractor::new(
        config.extraction_service_url.clone(),
        Duration::from_secs(config.extraction_timeout_secs),
    )?;
    info!(
        "Extraction client initialized (endpoint: {})",
        config.extraction_service_url
    );

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        engine,
        extractor: Arc::new(extractor),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
