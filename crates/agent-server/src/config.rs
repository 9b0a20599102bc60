//! Server Configuration
//!
//! The only place the process environment is read (after `.env` is loaded).
//! Backend defaults come from the runtime configs. Numbers that fail to
//! parse fall back to their defaults.

use agent_core::intent::DEFAULT_CLASSIFIER_MAX_TOKENS;
use agent_runtime::{LlamaCppConfig, OllamaConfig};

use crate::memory::DEFAULT_MEMORY_TURNS;

const DEFAULT_MODEL: &str = "llama3.2";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Which text-generation backend to start
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Ollama,
    LlamaCpp,
}

impl ProviderKind {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "ollama" => Ok(Self::Ollama),
            "llamacpp" | "llama.cpp" | "llama_cpp" => Ok(Self::LlamaCpp),
            other => anyhow::bail!("unknown LLM_PROVIDER '{other}' (expected 'ollama' or 'llamacpp')"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub provider: ProviderKind,
    pub ollama: OllamaConfig,
    pub llamacpp: LlamaCppConfig,
    pub model: String,
    pub classifier_max_tokens: u32,
    /// Exchanges kept per conversation
    pub memory_turns: usize,
    pub bind_addr: String,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let provider = ProviderKind::parse(&lookup("LLM_PROVIDER").unwrap_or_default())?;

        let ollama_defaults = OllamaConfig::default();
        let ollama = OllamaConfig {
            host: lookup("OLLAMA_HOST").unwrap_or(ollama_defaults.host),
            port: lookup("OLLAMA_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(ollama_defaults.port),
            ..ollama_defaults
        };

        let llamacpp_defaults = LlamaCppConfig::default();
        let llamacpp = LlamaCppConfig {
            base_url: lookup("LLAMACPP_URL").unwrap_or(llamacpp_defaults.base_url),
            ..llamacpp_defaults
        };

        Ok(Self {
            provider,
            ollama,
            llamacpp,
            model: lookup("MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.into()),
            classifier_max_tokens: lookup("CLASSIFIER_MAX_TOKENS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_CLASSIFIER_MAX_TOKENS),
            memory_turns: lookup("MEMORY_TURNS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_MEMORY_TURNS),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
        })
    }
}
