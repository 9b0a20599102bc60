//! Advanced Math Tool
//!
//! Square roots and exponentiation.

use agent_core::{Parameters, Tool};

use crate::error::{MathError, Result};

use super::{numbers, operand, run};

pub fn advanced_math(expression: &str) -> Result<String> {
    let expression = expression.trim().to_lowercase();
    let values = numbers(&expression);

    if expression.contains("square root") || expression.contains("sqrt") {
        if let Some(&n) = values.first() {
            return Ok(format!("√{} = {:.2}", operand(n), n.sqrt()));
        }
    }

    if expression.contains("power") || expression.contains('^') {
        if let [base, exponent, ..] = values[..] {
            return Ok(format!(
                "{}^{} = {:.2}",
                operand(base),
                operand(exponent),
                base.powf(exponent)
            ));
        }
    }

    Err(MathError::UnsupportedOperation(
        "Unsupported input. Try: 'square root of 16' or '2 power 3'".into(),
    ))
}

pub fn advanced_math_tool() -> Tool {
    Tool::new(
        "advanced_math",
        "Performs advanced math operations like square root and exponentiation. Use for 'sqrt', 'square root', 'power', or exponents.",
        |parameters: &Parameters| run(parameters, advanced_math),
    )
    .with_parameter(
        "input",
        "Operation description as a string (e.g., 'square root of 16', '2 power 3')",
    )
}
