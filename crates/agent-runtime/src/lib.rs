//! # agent-runtime
//!
//! Text-generation backends for the intent router.
//!
//! ## Providers
//!
//! - **Ollama** (default): Local LLM inference via Ollama
//! - **llama.cpp**: a running `llama-server` over HTTP
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{OllamaConfig, OllamaProvider};
//!
//! let provider: Arc<dyn LlmProvider> = Arc::new(OllamaProvider::from_config(OllamaConfig::default())?);
//! let classifier = IntentClassifier::new(provider.clone());
//! ```

pub mod llamacpp;
#[cfg(feature = "ollama")]
pub mod ollama;

pub use llamacpp::{LlamaCppConfig, LlamaCppProvider};
#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use agent_core::{AgentError, GenerationOptions, LlmProvider, Result};
