//! Trigonometry Tool
//!
//! `sin`, `cos` and `tan` of an angle given in degrees.

use agent_core::{Parameters, Tool};

use crate::error::{MathError, Result};

use super::{numbers, operand, run};

/// `cos` is matched before `sin` since "cosine" contains "sin".
const FUNCTIONS: [(&str, fn(f64) -> f64); 3] =
    [("cos", f64::cos), ("sin", f64::sin), ("tan", f64::tan)];

pub fn trigonometry(expression: &str) -> Result<String> {
    let expression = expression.trim().to_lowercase();

    let values = numbers(&expression);
    let Some(&degrees) = values.first() else {
        return Err(MathError::UnsupportedOperation("No angle found in input".into()));
    };

    FUNCTIONS
        .iter()
        .find(|(name, _)| expression.contains(*name))
        .map(|(name, function)| {
            format!(
                "{name}({}°) = {:.2}",
                operand(degrees),
                function(degrees.to_radians())
            )
        })
        .ok_or_else(|| {
            MathError::UnsupportedOperation(
                "Unsupported operation. Try: 'sin of 30', 'cos 45', or 'tan 60'".into(),
            )
        })
}

pub fn trigonometry_tool() -> Tool {
    Tool::new(
        "trigonometry",
        "Calculates trigonometric functions (sin, cos, tan) for angles in degrees. Use ONLY when request contains 'sin', 'cos', 'tan', 'sine', 'cosine', or 'tangent'.",
        |parameters: &Parameters| run(parameters, trigonometry),
    )
    .with_parameter(
        "input",
        "Trigonometric expression as a string (e.g., 'sin of 30', 'cos 45', 'tangent of 60')",
    )
}
