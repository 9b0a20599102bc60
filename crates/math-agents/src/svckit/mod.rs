//! Service Kit - Agent Tools
//!
//! Arithmetic tools wrapped as `agent_core::Tool`s for the calculator agent.
//! Each tool reads a single free-text expression from its parameter bag.

mod advanced_math;
mod calculator;
mod trigonometry;

use std::sync::LazyLock;

use agent_core::Parameters;
use regex::Regex;
use serde_json::Value;

use crate::error::{MathError, Result};

pub use advanced_math::{advanced_math, advanced_math_tool};
pub use calculator::{calculate, calculator_tool};
pub use trigonometry::{trigonometry, trigonometry_tool};

/// Unsigned decimal literals, in reading order
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("static regex"));

/// Keys tried, in order, before falling back to the first string value
const EXPRESSION_KEYS: &[&str] = &["input", "expression"];

/// Every number mentioned in `text`
fn numbers(text: &str) -> Vec<f64> {
    NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Operands keep their decimal point: `25` renders as `25.0`.
fn operand(value: f64) -> String {
    format!("{value:?}")
}

/// The expression text a tool should evaluate
fn expression(parameters: &Parameters) -> Result<String> {
    for key in EXPRESSION_KEYS {
        match parameters.get(*key) {
            Some(Value::String(text)) => return Ok(text.clone()),
            Some(Value::Number(n)) => return Ok(n.to_string()),
            _ => {}
        }
    }

    parameters
        .values()
        .find_map(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| MathError::MissingParameter("input".into()))
}

/// Adapt an evaluator to the tool calling convention.
///
/// Input problems come back as ordinary text so the agent can relay the
/// guidance; evaluation faults become tool errors.
fn run(parameters: &Parameters, evaluate: fn(&str) -> Result<String>) -> anyhow::Result<String> {
    match expression(parameters).and_then(|text| evaluate(&text)) {
        Ok(output) => Ok(output),
        Err(e) if e.is_input_problem() => Ok(e.to_string()),
        Err(e) => Err(e.into()),
    }
}
