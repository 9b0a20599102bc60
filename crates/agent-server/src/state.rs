//! Application State

use std::sync::Arc;

use agent_core::{LlmProvider, Orchestrator};
use tokio::sync::Mutex;

use crate::memory::ConversationStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Router over the shared model. One request at a time holds it, so
    /// generation calls never overlap on the single model handle.
    pub orchestrator: Arc<Mutex<Orchestrator>>,

    /// LLM provider (Ollama, llama.cpp)
    pub provider: Arc<dyn LlmProvider>,

    /// Rolling history per conversation id
    pub conversations: Arc<ConversationStore>,
}

impl AppState {
    pub fn new(
        orchestrator: Orchestrator,
        provider: Arc<dyn LlmProvider>,
        conversations: ConversationStore,
    ) -> Self {
        Self {
            orchestrator: Arc::new(Mutex::new(orchestrator)),
            provider,
            conversations: Arc::new(conversations),
        }
    }
}
