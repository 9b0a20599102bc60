//! Calculator Tool
//!
//! Two-operand arithmetic from a free-text expression such as `25 + 17`
//! or `8 plus 4`.

use agent_core::{Parameters, Tool};

use crate::error::{MathError, Result};

use super::{numbers, operand, run};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Checked in this order; the first match wins.
    const KEYWORDS: [(Self, &'static [&'static str]); 4] = [
        (Self::Add, &["+", "plus", "add"]),
        (Self::Subtract, &["-", "minus", "subtract"]),
        (Self::Multiply, &["*", "times", "multiply", "multiplied"]),
        (Self::Divide, &["/", "divided", "divide"]),
    ];

    fn detect(expression: &str) -> Option<Self> {
        Self::KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| expression.contains(*w)))
            .map(|(op, _)| *op)
    }

    const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    fn apply(self, a: f64, b: f64) -> Result<f64> {
        match self {
            Self::Add => Ok(a + b),
            Self::Subtract => Ok(a - b),
            Self::Multiply => Ok(a * b),
            Self::Divide if b == 0.0 => Err(MathError::DivisionByZero),
            Self::Divide => Ok(a / b),
        }
    }
}

/// Integral results print without decimals, the rest with two.
fn result(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Evaluate the first two numbers in `expression` with the operator it names
pub fn calculate(expression: &str) -> Result<String> {
    let expression = expression.trim().to_lowercase();

    let values = numbers(&expression);
    let [a, b, ..] = values[..] else {
        return Err(MathError::InvalidExpression("Need two numbers.".into()));
    };

    let op = Operator::detect(&expression).ok_or_else(|| {
        MathError::InvalidExpression(
            "Supported operations: +, -, *, / (or plus, minus, times, divided by)".into(),
        )
    })?;

    let value = op.apply(a, b)?;
    Ok(format!("{} {} {} = {}", operand(a), op.symbol(), operand(b), result(value)))
}

pub fn calculator_tool() -> Tool {
    Tool::new(
        "calculator",
        "Performs ONLY basic arithmetic operations: addition (+), subtraction (-), multiplication (*), division (/). Use ONLY for expressions with these operators.",
        |parameters: &Parameters| run(parameters, calculate),
    )
    .with_parameter(
        "input",
        "Math expression as a string (e.g., '5 + 3', '10 / 2', '8 * 4')",
    )
}
