mod analysis;
mod config;
mod db;
mod errors;
mod inference;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::engine::Analyzer;
use crate::analysis::store::{MemoryReportStore, PgReportStore, ReportStore};
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::inference::InferenceClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting caption analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Report storage: Postgres when configured, otherwise process memory
    let store: Arc<dyn ReportStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgReportStore::new(pool))
        }
        None => {
            info!("DATABASE_URL not set; reports are kept in memory");
            Arc::new(MemoryReportStore::default())
        }
    };

    // Model collaborators, created once and shared by every request
    let inference = Arc::new(InferenceClient::from_config(&config));
    info!(
        "Inference client initialized (sentiment: {}, paraphrase: {})",
        inference.sentiment_model(),
        inference.paraphrase_model()
    );
    let analyzer = Analyzer::new(inference.clone(), inference, config.timezone.clone());
    info!("Default posting timezone: {}", config.timezone);

    let state = AppState {
        analyzer,
        store,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
