mod analytics;
mod config;
mod db;
mod document;
mod errors;
mod llm_client;
mod postings;
mod render;
mod routes;
mod state;
mod storage;
mod tailoring;
mod tracker;
mod versions;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analytics::AnalyticsStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::GeminiClient;
use crate::postings::PostingScraper;
use crate::render::rendercv::RenderCvRenderer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tracker::JsonFileStore;
use crate::versions::VersionStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume tailoring API v{}", env!("CARGO_PKG_VERSION"));

    // Analytics (SQLite)
    let pool = create_pool(&config.analytics_db()).await?;
    let analytics = AnalyticsStore::open(pool).await?;
    info!("Analytics store ready");

    // LLM client
    let llm = GeminiClient::new(&config.gemini_api_base)?;
    if config.gemini_api_key.is_none() {
        info!("GEMINI_API_KEY not set; requests must supply api_key");
    }
    info!("LLM client initialized (default model: {})", config.default_model);

    let renderer = RenderCvRenderer::new(config.rendercv_bin.clone());
    info!("Resume renderer: {}", config.rendercv_bin);

    let versions = VersionStore::new(config.versions_dir());
    info!("Resume versions stored in {}", versions.dir().display());

    let state = AppState {
        llm: Arc::new(llm),
        renderer: Arc::new(renderer),
        applications: Arc::new(JsonFileStore::new(config.applications_db.clone())),
        versions: Arc::new(versions),
        analytics,
        scraper: PostingScraper::new()?,
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
