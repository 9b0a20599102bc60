//! Intent router HTTP server
//!
//! Axum-based server exposing the multi-agent router over a REST API.
//! One shared model backs the classifier and every agent.

mod config;
mod handlers;
mod memory;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{IntentClassifier, LlmProvider, Orchestrator};
use agent_runtime::{LlamaCppProvider, OllamaProvider};

use crate::config::{ProviderKind, ServerConfig};
use crate::memory::ConversationStore;
use crate::state::AppState;

fn build_provider(config: &ServerConfig) -> anyhow::Result<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::Ollama => Arc::new(OllamaProvider::from_config(config.ollama.clone())?),
        ProviderKind::LlamaCpp => Arc::new(LlamaCppProvider::from_config(config.llamacpp.clone())?),
    };
    Ok(provider)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Initialize LLM provider
    let provider = build_provider(&config)?;

    // Verify connection
    match provider.health_check().await {
        Ok(true) => tracing::info!(provider = %provider.name(), "✓ Connected to model backend"),
        Ok(false) | Err(_) => {
            tracing::warn!(provider = %provider.name(), "⚠ Model backend not available - replies will degrade");
        }
    }

    // Classifier + agent roster, all over the same provider
    let classifier = IntentClassifier::new(provider.clone())
        .with_model(&config.model)
        .with_max_tokens(config.classifier_max_tokens);
    let mut orchestrator = Orchestrator::new(classifier);
    math_agents::register_default_agents(&mut orchestrator, &provider, &config.model)?;

    for definition in orchestrator.intents() {
        tracing::info!("  • {} - {}", definition.name, definition.description);
    }

    let conversations = ConversationStore::new(config.memory_turns);
    let app = routes::router(AppState::new(orchestrator, provider, conversations));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 intent router running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  GET  /api/intents     - Registered intents");
    tracing::info!("  POST /api/chat        - Send message");
    tracing::info!("  GET  /api/conversations/{{id}} - Conversation history");
    tracing::info!("  DELETE /api/conversations/{{id}} - Forget a conversation");

    axum::serve(listener, app).await?;

    Ok(())
}
