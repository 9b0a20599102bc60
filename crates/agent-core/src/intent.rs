//! Intent Classification
//!
//! Maps free text onto one of a dynamically registered set of intents by
//! asking the model for a small JSON document. The model is unreliable, so
//! decoding is split into a pure [`decode_classification`] step producing a
//! tagged [`Classification`], and a fallback step that turns every failure
//! into a routable [`Intent`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::prompts::{self, OUT_OF_SCOPE_INTENT};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::sanitize::strip_code_fences;

/// Token budget for a classification reply
pub const DEFAULT_CLASSIFIER_MAX_TOKENS: u32 = 150;

/// Confidence reported when the reply was not JSON at all
pub const UNPARSEABLE_CONFIDENCE: f64 = 0.5;

/// Confidence reported when generation failed or the JSON had the wrong shape
pub const FAILURE_CONFIDENCE: f64 = 0.0;

/// The classified purpose of one user utterance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    pub confidence: f64,
    pub entities: serde_json::Map<String, Value>,
    pub reasoning: String,
}

impl Intent {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
            entities: serde_json::Map::new(),
            reasoning: String::new(),
        }
    }

    #[must_use]
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    #[must_use]
    pub fn with_entity(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entities.insert(key.into(), value.into());
        self
    }
}

/// Outcome of one classification attempt, before any fallback is applied
#[derive(Clone, Debug, PartialEq)]
pub enum Classification {
    /// The reply decoded into a complete intent
    Classified(Intent),
    /// The sanitized reply was not valid JSON
    Unparseable { reason: String },
    /// Valid JSON, but not an object with the required keys and types
    Malformed { reason: String },
    /// The provider call itself failed
    GenerationFailed { reason: String },
}

impl Classification {
    /// Resolve to an intent, substituting `default_intent` on failure
    pub fn into_intent(self, default_intent: &str) -> Intent {
        match self {
            Self::Classified(intent) => intent,
            Self::Unparseable { .. } => Intent::new(default_intent, UNPARSEABLE_CONFIDENCE)
                .with_reasoning("Failed to parse LLM response - using default"),
            Self::Malformed { reason } | Self::GenerationFailed { reason } => {
                Intent::new(default_intent, FAILURE_CONFIDENCE)
                    .with_reasoning(format!("Classification error: {reason}"))
            }
        }
    }
}

/// Wire shape the model is asked to produce
#[derive(Deserialize)]
struct RawIntent {
    intent: String,
    confidence: f64,
    entities: serde_json::Map<String, Value>,
    reasoning: String,
}

/// Decode a raw model reply
///
/// Pure: fence stripping, JSON parsing and shape validation, no I/O.
pub fn decode_classification(raw: &str) -> Classification {
    let cleaned = strip_code_fences(raw);

    let value: Value = match serde_json::from_str(cleaned) {
        Ok(value) => value,
        Err(e) => {
            return Classification::Unparseable {
                reason: e.to_string(),
            };
        }
    };

    let raw_intent: RawIntent = match serde_json::from_value(value) {
        Ok(raw_intent) => raw_intent,
        Err(e) => {
            return Classification::Malformed {
                reason: e.to_string(),
            };
        }
    };

    if !(0.0..=1.0).contains(&raw_intent.confidence) {
        return Classification::Malformed {
            reason: format!("confidence {} outside [0, 1]", raw_intent.confidence),
        };
    }

    Classification::Classified(Intent {
        name: raw_intent.intent,
        confidence: raw_intent.confidence,
        entities: raw_intent.entities,
        reasoning: raw_intent.reasoning,
    })
}

/// One entry of the intent registry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IntentDefinition {
    pub name: String,
    pub description: String,
}

impl IntentDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Insertion-ordered `name -> description` registry
#[derive(Clone, Debug, Default)]
pub struct IntentRegistry {
    definitions: Vec<IntentDefinition>,
}

impl IntentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an intent, or update its description in place if already present
    pub fn register(&mut self, name: &str, description: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(AgentError::InvalidIntent("Intent name cannot be empty.".into()));
        }

        let description = match description.trim() {
            "" => "No description provided.",
            trimmed => trimmed,
        };

        if let Some(existing) = self.definitions.iter_mut().find(|d| d.name == name) {
            existing.description = description.to_string();
        } else {
            self.definitions.push(IntentDefinition::new(name, description));
        }
        Ok(())
    }

    /// Remove an intent; returns whether it was present
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.definitions.len();
        self.definitions.retain(|d| d.name != name);
        self.definitions.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.name == name)
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.description.as_str())
    }

    /// Fallback intent: `out_of_scope` if registered, else the first one
    pub fn default_intent(&self) -> &str {
        if self.contains(OUT_OF_SCOPE_INTENT) {
            return OUT_OF_SCOPE_INTENT;
        }
        self.definitions
            .first()
            .map_or(OUT_OF_SCOPE_INTENT, |d| d.name.as_str())
    }

    pub fn definitions(&self) -> &[IntentDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// LLM-backed intent classifier
pub struct IntentClassifier {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
    registry: IntentRegistry,
}

impl IntentClassifier {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            options: GenerationOptions::deterministic(DEFAULT_CLASSIFIER_MAX_TOKENS),
            registry: IntentRegistry::new(),
        }
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.options.model = model.into();
        self
    }

    /// Register or update an intent definition used for prompting
    pub fn register_intent(&mut self, name: &str, description: &str) -> Result<()> {
        self.registry.register(name, description)?;
        tracing::debug!(intent = %name, "Registered intent");
        Ok(())
    }

    /// Remove an intent definition if it exists
    pub fn unregister_intent(&mut self, name: &str) -> bool {
        let removed = self.registry.unregister(name);
        if removed {
            tracing::debug!(intent = %name, "Unregistered intent");
        }
        removed
    }

    pub fn intent_definitions(&self) -> &[IntentDefinition] {
        self.registry.definitions()
    }

    pub const fn registry(&self) -> &IntentRegistry {
        &self.registry
    }

    pub fn default_intent(&self) -> &str {
        self.registry.default_intent()
    }

    fn build_prompt(&self, user_input: &str) -> String {
        if self.registry.is_empty() {
            tracing::warn!("No intent definitions registered; classification may be unreliable");
            let placeholder = [IntentDefinition::new(
                OUT_OF_SCOPE_INTENT,
                "Default intent when no agents are registered.",
            )];
            return prompts::intent_classification(&placeholder, user_input);
        }
        prompts::intent_classification(self.registry.definitions(), user_input)
    }

    /// Ask the model and decode its reply, without applying any fallback
    pub async fn classify_raw(&self, user_input: &str) -> Classification {
        let prompt = self.build_prompt(user_input);

        let completion = match self.provider.generate(&prompt, &self.options).await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::error!(error = %e, "Intent classification failed");
                return Classification::GenerationFailed {
                    reason: e.to_string(),
                };
            }
        };

        tracing::debug!(raw = %completion.content, "Raw classifier response");

        let classification = decode_classification(&completion.content);
        match &classification {
            Classification::Unparseable { reason } => tracing::warn!(
                %reason,
                cleaned = %strip_code_fences(&completion.content),
                "JSON parsing failed even after cleaning"
            ),
            Classification::Malformed { reason } => {
                tracing::error!(%reason, "Classifier response has the wrong shape");
            }
            _ => {}
        }
        classification
    }

    /// Classify `user_input`; always yields a routable intent
    pub async fn classify(&self, user_input: &str) -> Intent {
        let intent = self
            .classify_raw(user_input)
            .await
            .into_intent(self.default_intent());

        tracing::info!(
            input = %user_input,
            intent = %intent.name,
            confidence = intent.confidence,
            "Classified request"
        );
        intent
    }
}
