mod analysis;
mod config;
mod documents;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod validation;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; malformed numeric env vars abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting ATS Optimizer API v{} ({})",
        env!("CARGO_PKG_VERSION"),
        config.app_env
    );

    // Initialize LLM client
    let llm = LlmClient::anthropic(config.anthropic_api_key.clone())?;
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else if config.is_production() {
        error!("ANTHROPIC_API_KEY is not set in production; /api/analyze will answer 503");
    } else {
        warn!("ANTHROPIC_API_KEY is not set; analysis requests will fail until it is provided");
    }

    // Build app state (pipeline services are created once and shared)
    let state = AppState::new(llm, config.clone());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
