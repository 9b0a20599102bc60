//! # agent-core
//!
//! Intent routing over one shared language model.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Orchestrator                          │
//! │  ┌──────────────────┐        ┌────────────────────────────┐  │
//! │  │ IntentClassifier │──────▶ │ intent ─▶ Agent            │  │
//! │  └──────────────────┘        │   ├─ ToolRegistry ─▶ Tool  │  │
//! │            │                 │   └─ response synthesis    │  │
//! │            ▼                 └────────────────────────────┘  │
//! │  ┌─────────────────────────────────────────────────────────┐ │
//! │  │            Arc<dyn LlmProvider> (shared)                │ │
//! │  └─────────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each request costs up to three sequential model calls: classification,
//! tool selection, response synthesis. Every fallible step degrades to a
//! default value, so [`Orchestrator::execute`] always returns text.

pub mod agent;
pub mod error;
pub mod intent;
pub mod orchestrator;
pub mod prompts;
pub mod provider;
pub mod sanitize;
pub mod tool;

#[cfg(test)]
mod test_helpers;

pub use agent::{Agent, AgentBuilder, AgentConfig};
pub use error::{AgentError, Result};
pub use intent::{Classification, Intent, IntentClassifier, IntentDefinition, IntentRegistry};
pub use orchestrator::{Dispatch, Orchestrator};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use tool::{Parameters, Tool, ToolRegistry};
