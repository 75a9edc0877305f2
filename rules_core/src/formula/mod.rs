//! Formula evaluation - expression strings with variables and dice
//!
//! The rules engine never parses formulas itself; it hands a string and a
//! [`FormulaContext`] to a [`FormulaEvaluator`]. [`DiceEvaluator`] is the
//! bundled implementation.

mod context;
mod dice;

pub use context::FormulaContext;
pub use dice::DiceEvaluator;

use thiserror::Error;
use tracing::warn;

/// Result of evaluating a formula
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Numeric total of the expression
    pub total: f64,
    /// Every individual die face rolled, in roll order
    pub dice_faces: Vec<i64>,
}

impl Evaluation {
    /// A dice-free result
    pub fn constant(total: f64) -> Self {
        Evaluation {
            total,
            dice_faces: Vec::new(),
        }
    }

    /// Part of the total that did not come from dice
    pub fn static_part(&self) -> f64 {
        self.total - self.dice_faces.iter().sum::<i64>() as f64
    }
}

/// Formula evaluation failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedChar { found: char, position: usize },
    #[error("Unexpected end of formula")]
    UnexpectedEnd,
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Invalid dice term: {0}")]
    InvalidDice(String),
    #[error("Trailing input at position {0}")]
    TrailingInput(usize),
}

/// Anything that can turn a formula string into a number
pub trait FormulaEvaluator {
    /// Evaluate `expression` against `context`
    fn evaluate(
        &mut self,
        expression: &str,
        context: &FormulaContext,
    ) -> Result<Evaluation, FormulaError>;
}

/// Evaluate a formula, logging and substituting 0 on failure
pub fn evaluate_or_zero(
    evaluator: &mut dyn FormulaEvaluator,
    expression: &str,
    context: &FormulaContext,
) -> Evaluation {
    match evaluator.evaluate(expression, context) {
        Ok(evaluation) => evaluation,
        Err(err) => {
            warn!(formula = expression, error = %err, "formula evaluation failed, using 0");
            Evaluation::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_part() {
        let eval = Evaluation {
            total: 14.0,
            dice_faces: vec![3, 5],
        };
        assert!((eval.static_part() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_formula_falls_back_to_zero() {
        let mut evaluator = DiceEvaluator::seeded(7);
        let context = FormulaContext::new();
        let eval = evaluate_or_zero(&mut evaluator, "3 + * 4", &context);
        assert!(eval.total.abs() < f64::EPSILON);
        assert!(eval.dice_faces.is_empty());
    }

    #[test]
    fn test_unknown_variable_falls_back_to_zero() {
        let mut evaluator = DiceEvaluator::seeded(7);
        let eval = evaluate_or_zero(&mut evaluator, "nope * 2", &FormulaContext::new());
        assert!(eval.total.abs() < f64::EPSILON);
    }
}
