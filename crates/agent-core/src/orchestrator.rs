//! Orchestrator
//!
//! Top-level router: classify, look up the agent registered for the intent,
//! delegate, label the reply with the agent's name.
//!
//! ```text
//! user text ─▶ IntentClassifier ─▶ Intent ─▶ agents[intent] ─▶ Agent::execute ─▶ "[Agent] reply"
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::agent::Agent;
use crate::error::Result;
use crate::intent::{Intent, IntentClassifier, IntentDefinition};

/// Everything known about one routed request
#[derive(Clone, Debug, Serialize)]
pub struct Dispatch {
    /// The classification the route was chosen from
    pub intent: Intent,

    /// Display name of the agent that answered, if any
    pub agent: Option<String>,

    /// Displayable reply, already labeled
    pub reply: String,
}

/// Routes user requests to the agent registered for their intent
pub struct Orchestrator {
    classifier: IntentClassifier,
    agents: HashMap<String, Arc<Agent>>,
}

impl Orchestrator {
    pub fn new(classifier: IntentClassifier) -> Self {
        Self {
            classifier,
            agents: HashMap::new(),
        }
    }

    /// Register `agent` as the handler for `intent`.
    ///
    /// The classifier learns the intent in the same call, described by the
    /// agent's description. Nothing is stored if the intent name is rejected.
    pub fn register_agent(&mut self, intent: &str, agent: Arc<Agent>) -> Result<()> {
        let description = if agent.description().trim().is_empty() {
            format!("Agent responsible for '{intent}'")
        } else {
            agent.description().to_string()
        };

        self.classifier.register_intent(intent, &description)?;
        tracing::info!(agent = %agent.name(), %intent, "Registered agent");
        self.agents.insert(intent.to_string(), agent);
        Ok(())
    }

    /// Remove the agent and the intent from both maps
    pub fn unregister_agent(&mut self, intent: &str) -> Option<Arc<Agent>> {
        self.classifier.unregister_intent(intent);
        self.agents.remove(intent)
    }

    /// Agent registered for `intent`
    pub fn agent_for(&self, intent: &str) -> Option<&Arc<Agent>> {
        self.agents.get(intent)
    }

    /// Registered intents in registration order
    pub fn intents(&self) -> &[IntentDefinition] {
        self.classifier.intent_definitions()
    }

    pub const fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Classify and delegate, keeping the routing details
    pub async fn route(&self, user_request: &str) -> Dispatch {
        let intent = self.classifier.classify(user_request).await;

        let Some(agent) = self.agents.get(&intent.name) else {
            tracing::info!(intent = %intent.name, "No agent registered for intent");
            return Dispatch {
                reply: format!("I don't know how to handle: {}", intent.name),
                agent: None,
                intent,
            };
        };

        tracing::info!(intent = %intent.name, agent = %agent.name(), "Routing request");
        let response = agent.execute(user_request, Some(&intent)).await;

        Dispatch {
            reply: format!("[{}] {}", agent.name(), response),
            agent: Some(agent.name().to_string()),
            intent,
        }
    }

    /// Process one request; always returns displayable text
    pub async fn execute(&self, user_request: &str) -> String {
        self.route(user_request).await.reply
    }
}
