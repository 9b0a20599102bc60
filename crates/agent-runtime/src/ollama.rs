//! Ollama LLM Provider
//!
//! Implementation of `LlmProvider` for local Ollama inference through the
//! raw completion endpoint.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use ollama_rs::{
    Ollama,
    generation::completion::{GenerationResponse, request::GenerationRequest},
    models::ModelOptions,
};

/// Ollama provider configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
            timeout_secs: 120,
        }
    }
}

impl OllamaConfig {
    fn validate(&self) -> Result<()> {
        let mut url = reqwest::Url::parse(&self.host)
            .map_err(|e| AgentError::Config(format!("invalid OLLAMA_HOST '{}': {e}", self.host)))?;
        url.set_port(Some(self.port))
            .map_err(|()| AgentError::Config(format!("OLLAMA_HOST '{}' cannot carry a port", self.host)))
    }
}

/// Ollama LLM provider
pub struct OllamaProvider {
    client: Ollama,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create a new Ollama provider with custom host/port
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        Self::from_config(OllamaConfig {
            host: host.into(),
            port,
            ..Default::default()
        })
    }

    /// Create from configuration
    pub fn from_config(config: OllamaConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        Ok(Self {
            client: Ollama::new_with_client(config.host.clone(), config.port, http),
            config,
        })
    }

    pub const fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Build Ollama model options
    fn build_options(opts: &GenerationOptions) -> ModelOptions {
        let options = ModelOptions::default()
            .temperature(opts.temperature)
            .top_p(opts.top_p)
            .num_predict(i32::try_from(opts.max_tokens).unwrap_or(i32::MAX));

        if opts.stop_sequences.is_empty() {
            options
        } else {
            options.stop(opts.stop_sequences.clone())
        }
    }

    /// Convert Ollama response to agent completion
    fn convert_completion(response: GenerationResponse, model: &str) -> Completion {
        let usage = match (response.prompt_eval_count, response.eval_count) {
            (None, None) => None,
            (prompt, eval) => {
                let prompt_tokens = to_u32(prompt.unwrap_or(0));
                let completion_tokens = to_u32(eval.unwrap_or(0));
                Some(TokenUsage {
                    prompt_tokens,
                    completion_tokens,
                    total_tokens: prompt_tokens.saturating_add(completion_tokens),
                })
            }
        };

        Completion {
            content: response.response,
            model: model.to_string(),
            usage,
            finish_reason: Some(FinishReason::Stop),
        }
    }
}

fn to_u32(count: u64) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.list_local_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<Completion> {
        let request = GenerationRequest::new(options.model.clone(), prompt)
            .options(Self::build_options(options));

        tracing::debug!(model = %options.model, max_tokens = options.max_tokens, "Ollama generate");

        let response = self
            .client
            .generate(request)
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))?;

        Ok(Self::convert_completion(response, &options.model))
    }
}
