//! Test support: a provider with a fixed script and a ready-made state.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use agent_core::{AgentError, Completion, GenerationOptions, LlmProvider, Result};
use async_trait::async_trait;

use crate::memory::ConversationStore;
use crate::state::AppState;

/// Returns scripted replies in order, then provider errors
pub struct CannedProvider {
    replies: Mutex<VecDeque<String>>,
}

impl CannedProvider {
    pub fn new<const N: usize>(replies: [&str; N]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(ToString::to_string).collect()),
        })
    }
}

#[async_trait]
impl LlmProvider for CannedProvider {
    fn name(&self) -> &str {
        "canned"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn generate(&self, _prompt: &str, options: &GenerationOptions) -> Result<Completion> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .map(|reply| Completion::text(reply, &options.model))
            .ok_or_else(|| AgentError::Provider("offline".into()))
    }
}

/// State holding the default roster over `provider`
pub fn state_with(provider: Arc<CannedProvider>) -> AppState {
    let provider: Arc<dyn LlmProvider> = provider;
    let orchestrator = math_agents::default_orchestrator(provider.clone(), "llama3.2").unwrap();
    AppState::new(orchestrator, provider, ConversationStore::default())
}
