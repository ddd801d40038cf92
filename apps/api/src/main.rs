mod config;
mod conversation;
mod errors;
mod job;
mod llm_client;
mod profile;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::conversation::coordinator::TurnCoordinator;
use crate::conversation::intent::IntentClassifier;
use crate::conversation::responders::ResponderRegistry;
use crate::job::fit_scoring::{FitScorer, KeywordFitScorer};
use crate::llm_client::{LlmClient, TextGenerator};
use crate::profile::source::HttpProfileSource;
use crate::routes::build_router;
use crate::session::registry::SessionRegistry;
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

    info!("Starting Coach API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize text generation
    let generator: Arc<dyn TextGenerator> =
        Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize profile source
    let profile_source = Arc::new(HttpProfileSource::new(
        config.profile_source_url.clone(),
        config.profile_source_token.clone(),
    )?);
    info!("Profile source: {}", config.profile_source_url);

    // Fit scorer shared by the Job-Fit and Career-Coach responders
    let fit_scorer: Arc<dyn FitScorer> = Arc::new(KeywordFitScorer);

    let coordinator = TurnCoordinator::new(
        IntentClassifier::new(generator.clone(), config.classifier_history_turns),
        ResponderRegistry::new(generator, fit_scorer),
        config.turn_timeout,
    );
    info!("Turn timeout: {}s", config.turn_timeout.as_secs());

    // Build app state
    let state = AppState {
        sessions: Arc::new(SessionRegistry::new()),
        coordinator: Arc::new(coordinator),
        profile_source,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
