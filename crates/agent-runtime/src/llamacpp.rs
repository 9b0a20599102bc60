//! llama.cpp server provider
//!
//! Talks to the `llama-server` HTTP API (`POST /completion`, `GET /health`)
//! so a local GGUF model can back the pipeline without Ollama.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// llama.cpp provider configuration
#[derive(Clone, Debug)]
pub struct LlamaCppConfig {
    /// Server base URL, without a trailing slash
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlamaCppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: u32,
    temperature: f32,
    top_p: f32,
    stop: &'a [String],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
    #[serde(default)]
    tokens_evaluated: Option<u32>,
    #[serde(default)]
    tokens_predicted: Option<u32>,
    #[serde(default)]
    stopped_limit: bool,
}

/// llama.cpp server provider
pub struct LlamaCppProvider {
    client: reqwest::Client,
    base_url: String,
}

impl LlamaCppProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(LlamaCppConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    pub fn from_config(config: LlamaCppConfig) -> Result<Self> {
        reqwest::Url::parse(&config.base_url).map_err(|e| {
            AgentError::Config(format!("invalid LLAMACPP_URL '{}': {e}", config.base_url))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request<'a>(prompt: &'a str, opts: &'a GenerationOptions) -> CompletionRequest<'a> {
        CompletionRequest {
            prompt,
            n_predict: opts.max_tokens,
            temperature: opts.temperature,
            top_p: opts.top_p,
            stop: &opts.stop_sequences,
            stream: false,
        }
    }

    fn convert_completion(response: CompletionResponse, model: &str) -> Completion {
        let usage = match (response.tokens_evaluated, response.tokens_predicted) {
            (None, None) => None,
            (prompt, predicted) => {
                let prompt_tokens = prompt.unwrap_or(0);
                let completion_tokens = predicted.unwrap_or(0);
                Some(TokenUsage {
                    prompt_tokens,
                    completion_tokens,
                    total_tokens: prompt_tokens.saturating_add(completion_tokens),
                })
            }
        };

        Completion {
            content: response.content,
            model: model.to_string(),
            usage,
            finish_reason: Some(if response.stopped_limit {
                FinishReason::Length
            } else {
                FinishReason::Stop
            }),
        }
    }
}

#[async_trait]
impl LlmProvider for LlamaCppProvider {
    fn name(&self) -> &str {
        "llamacpp"
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("llama.cpp health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<Completion> {
        let url = format!("{}/completion", self.base_url);
        let body = Self::build_request(prompt, options);

        tracing::debug!(max_tokens = options.max_tokens, "llama.cpp completion");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    AgentError::ProviderUnavailable(e.to_string())
                } else {
                    AgentError::Provider(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %error_body, "llama.cpp returned error");
            return Err(AgentError::Provider(format!("HTTP {status}: {error_body}")));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("Failed to parse response: {e}")))?;

        Ok(Self::convert_completion(parsed, &options.model))
    }
}
