//! LLM Provider Strategy Pattern
//!
//! Defines the single text-generation primitive every pipeline component
//! consumes. The classifier and all agents share one `Arc<dyn LlmProvider>`
//! and call it with their own `GenerationOptions`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{GenerationOptions, LlmProvider};
//!
//! let provider = OllamaProvider::from_config(OllamaConfig::default())?;
//! let completion = provider
//!     .generate("Say hi", &GenerationOptions::deterministic(64))
//!     .await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "llama3.2", "tinyllama")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Stop sequences
    #[serde(default = "default_stop_sequences")]
    pub stop_sequences: Vec<String>,
}

const fn default_temperature() -> f32 { 0.0 }
const fn default_max_tokens() -> u32 { 256 }
const fn default_top_p() -> f32 { 0.9 }

fn default_stop_sequences() -> Vec<String> {
    vec!["User:".into(), "\n\n".into()]
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "llama3.2".into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            stop_sequences: default_stop_sequences(),
        }
    }
}

impl GenerationOptions {
    /// Greedy decoding, used for classification and tool selection
    pub fn deterministic(max_tokens: u32) -> Self {
        Self {
            temperature: 0.0,
            max_tokens,
            ..Default::default()
        }
    }

    /// Sampled decoding, used when phrasing replies
    pub fn sampling(max_tokens: u32, temperature: f32) -> Self {
        Self {
            temperature,
            max_tokens,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

impl Completion {
    /// Plain completion with no usage accounting
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            usage: None,
            finish_reason: Some(FinishReason::Stop),
        }
    }
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new text-generation backends.
/// The pipeline works exclusively through this interface. Calls are
/// independent of each other; the provider keeps no per-request state.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short backend name for logs and health reports
    fn name(&self) -> &str;

    /// Check if the provider is available and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Complete a raw prompt
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<Completion>;
}
