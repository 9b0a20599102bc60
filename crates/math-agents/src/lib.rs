//! # math-agents
//!
//! The reference tool kit and agent roster for the intent router:
//! a calculator agent with three arithmetic tools, plus tool-less greeting
//! and out-of-scope agents.
//!
//! ## Example: "What is 25 + 17?"
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  classify        → {"intent": "calculate", ...}               │
//! │  select tool     → {"tool_name": "calculator",                │
//! │                     "entities": {"input": "25 + 17"}}         │
//! │  run tool        → "25.0 + 17.0 = 42"                         │
//! │  phrase reply    → "[Calculator Agent] 25 plus 17 is 42."     │
//! └───────────────────────────────────────────────────────────────┘
//! ```

pub mod agents;
pub mod error;
pub mod svckit;

pub use agents::{CALCULATE_INTENT, default_orchestrator, register_default_agents};
pub use error::{MathError, Result};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{advanced_math_tool, calculator_tool, trigonometry_tool};
}
