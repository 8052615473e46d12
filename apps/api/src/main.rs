mod analysis;
mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::enhance::{Augmenter, OpenAiAugmenter};
use crate::analysis::engine::AnalysisEngine;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::AnalysisStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Auspex API v{}", env!("CARGO_PKG_VERSION"));

    // Open the JSON-file analysis history
    let store = Arc::new(AnalysisStore::open(config.analysis_store_path.clone())?);
    info!("Analysis store ready at {}", store.path().display());

    // Optional OpenAI enhancement pass
    let augmenter: Option<Arc<dyn Augmenter>> = if config.use_openai() {
        let client = LlmClient::new(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.llm_timeout(),
        );
        info!("LLM augmentation enabled (model: {})", config.openai_model);
        Some(Arc::new(OpenAiAugmenter::new(client, config.llm_timeout())))
    } else {
        info!("LLM augmentation disabled, serving heuristic analysis only");
        None
    };

    let engine = Arc::new(AnalysisEngine::new(augmenter, Arc::clone(&store)));

    let state = AppState {
        config: config.clone(),
        engine,
        store,
    };

    // Body limit leaves headroom for multipart framing around the file cap.
    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes + 64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
