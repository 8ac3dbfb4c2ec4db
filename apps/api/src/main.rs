mod config;
mod db;
mod email;
mod errors;
mod llm_client;
mod matching;
mod models;
mod profile;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::email::assembler::{EmailAssembler, TemplateAssembler};
use crate::email::llm_assembler::LlmAssembler;
use crate::llm_client::LlmClient;
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

    info!("Starting Outreach API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Pick the email assembler. The LLM-backed assembler degrades to the
    // template path on failure, so enabling it never makes generation
    // less reliable — only slower and better-worded.
    let assembler: Arc<dyn EmailAssembler> = if config.enable_llm_emails {
        let llm = LlmClient::new(config.anthropic_api_key.clone());
        info!(
            "Email assembler: LLM-backed with template fallback (model: {})",
            llm_client::MODEL
        );
        Arc::new(LlmAssembler::new(llm))
    } else {
        info!("Email assembler: deterministic templates");
        Arc::new(TemplateAssembler)
    };

    // Build app state
    let state = AppState { db, assembler };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
