//! Agent roster
//!
//! The three agents the router ships with, all sharing one provider:
//!
//! ```text
//! greeting      ─▶ Greeting Agent     (no tools)
//! calculate     ─▶ Calculator Agent   (calculator, advanced_math, trigonometry)
//! out_of_scope  ─▶ OutOfScope Agent   (no tools)
//! ```

use std::sync::Arc;

use agent_core::{
    Agent, IntentClassifier, LlmProvider, Orchestrator, Result,
    prompts::{GREETING_INTENT, OUT_OF_SCOPE_INTENT},
};

use crate::svckit::{advanced_math_tool, calculator_tool, trigonometry_tool};

pub const CALCULATE_INTENT: &str = "calculate";

pub fn greeting_agent(provider: Arc<dyn LlmProvider>, model: &str) -> Result<Agent> {
    Agent::builder("Greeting Agent", provider)
        .description("Handles greetings")
        .model(model)
        .build()
}

pub fn calculator_agent(provider: Arc<dyn LlmProvider>, model: &str) -> Result<Agent> {
    Agent::builder("Calculator Agent", provider)
        .description("Solves math problems using available tools")
        .tools([calculator_tool(), advanced_math_tool(), trigonometry_tool()])
        .model(model)
        .build()
}

pub fn out_of_scope_agent(provider: Arc<dyn LlmProvider>, model: &str) -> Result<Agent> {
    Agent::builder("OutOfScope Agent", provider)
        .description("Handles unsupported requests")
        .model(model)
        .build()
}

/// Register the full roster on an existing orchestrator
pub fn register_default_agents(
    orchestrator: &mut Orchestrator,
    provider: &Arc<dyn LlmProvider>,
    model: &str,
) -> Result<()> {
    orchestrator.register_agent(
        GREETING_INTENT,
        Arc::new(greeting_agent(provider.clone(), model)?),
    )?;
    orchestrator.register_agent(
        CALCULATE_INTENT,
        Arc::new(calculator_agent(provider.clone(), model)?),
    )?;
    orchestrator.register_agent(
        OUT_OF_SCOPE_INTENT,
        Arc::new(out_of_scope_agent(provider.clone(), model)?),
    )?;

    tracing::info!(intents = orchestrator.intents().len(), "Multi-agent system ready");
    Ok(())
}

/// Orchestrator with the default classifier settings and the full roster
pub fn default_orchestrator(provider: Arc<dyn LlmProvider>, model: &str) -> Result<Orchestrator> {
    let classifier = IntentClassifier::new(provider.clone()).with_model(model);
    let mut orchestrator = Orchestrator::new(classifier);
    register_default_agents(&mut orchestrator, &provider, model)?;
    Ok(orchestrator)
}
