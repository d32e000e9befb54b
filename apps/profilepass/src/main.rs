mod config;
mod errors;
mod llm_client;
mod models;
mod passwords;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::passwords::suggester::{LlmSuggester, PasswordSuggester};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on an unsatisfiable policy)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting profilepass v{}", env!("CARGO_PKG_VERSION"));

    let policy = &config.engine.policy;
    info!(
        "Password policy: {}-{} chars, symbols {:?}, {} per profile",
        policy.min_len(),
        policy.max_len(),
        policy.symbols().iter().collect::<String>(),
        config.engine.count
    );
    if config.engine.seed.is_some() {
        info!("Fixed seed configured — output is reproducible");
    }

    // Initialize the LLM suggester only when enabled
    let suggester = build_suggester(&config)?;

    let state = AppState {
        config: config.clone(),
        suggester,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the demo frontend has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_suggester(config: &Config) -> Result<Option<Arc<dyn PasswordSuggester>>> {
    let api_key = match (&config.anthropic_api_key, config.engine.use_suggester) {
        (Some(key), true) => key.clone(),
        _ => {
            info!("LLM suggester disabled — using local synthesis");
            return Ok(None);
        }
    };

    let llm = LlmClient::new(
        api_key,
        config.llm_model.clone(),
        config.engine.suggester_timeout,
    )?;
    info!("LLM suggester initialized (model: {})", llm.model());

    let suggester: Arc<dyn PasswordSuggester> =
        Arc::new(LlmSuggester::new(llm, config.engine.policy.clone()));
    Ok(Some(suggester))
}
