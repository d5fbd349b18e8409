mod config;
mod errors;
mod generation;
mod llm_client;
mod pipeline;
mod resolver;
mod routes;
mod schema;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::pipeline::{Pipeline, SessionStore};
use crate::resolver::{ScrapingWebSearch, SearchResolver, YouTubeSearch};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pathway API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_max_retries)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize search providers
    let videos = YouTubeSearch::new(config.youtube_api_key.clone(), &config.youtube_api_url)?;
    let web = ScrapingWebSearch::new(&config.web_search_url)?;
    let resolver = SearchResolver::new(
        Arc::new(videos),
        Arc::new(web),
        config.web_search_lang.clone(),
        Duration::from_millis(config.search_pause_ms),
    );
    info!(
        "Resource resolver initialized (web search: {}, pause: {}ms)",
        config.web_search_url, config.search_pause_ms
    );

    // Build app state
    let state = AppState {
        pipeline: Pipeline::new(Arc::new(llm), Arc::new(resolver)),
        sessions: SessionStore::new(chrono::Duration::seconds(config.session_ttl_secs)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web front end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
