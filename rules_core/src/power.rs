//! Power rolls - damage or healing magnitude from a formula

use crate::buff::SLOT_COUNT;
use crate::formula::{evaluate_or_zero, FormulaContext, FormulaEvaluator};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters of a power roll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerRequest {
    pub formula: String,
    /// Appended to the formula as `+ N`
    #[serde(default)]
    pub flat_modifier: i64,
    /// Multiplies the whole (modified) formula
    #[serde(default)]
    pub charge_multiplier: Option<f64>,
    #[serde(default = "default_base_multiplier")]
    pub base_multiplier: f64,
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,
    #[serde(default)]
    pub flat_crit_bonus: i64,
    /// Separate roll whose dice become buff slot values
    #[serde(default)]
    pub buff_formula: Option<String>,
    /// Attacks are halved while the user is poisoned
    #[serde(default)]
    pub is_attack: bool,
    #[serde(default)]
    pub poisoned: bool,
}

fn default_base_multiplier() -> f64 {
    1.0
}
fn default_crit_multiplier() -> f64 {
    2.0
}

impl PowerRequest {
    pub fn new(formula: impl Into<String>) -> Self {
        PowerRequest {
            formula: formula.into(),
            flat_modifier: 0,
            charge_multiplier: None,
            base_multiplier: default_base_multiplier(),
            crit_multiplier: default_crit_multiplier(),
            flat_crit_bonus: 0,
            buff_formula: None,
            is_attack: false,
            poisoned: false,
        }
    }

    pub fn attack(mut self) -> Self {
        self.is_attack = true;
        self
    }

    /// The formula actually handed to the evaluator
    pub fn expression(&self) -> String {
        let mut expression = self.formula.clone();
        if self.flat_modifier != 0 {
            expression = format!("({expression}) + ({})", self.flat_modifier);
        }
        if let Some(charge) = self.charge_multiplier {
            expression = format!("({expression}) * {charge}");
        }
        expression
    }
}

/// Result of a power roll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerRoll {
    /// Raw formula total, before poison and multipliers
    pub total: f64,
    pub dice_faces: Vec<i64>,
    pub base: i64,
    pub critical: i64,
    /// Buff slot values from the sub-roll, if one was requested
    pub buff_values: Option<[i64; SLOT_COUNT]>,
}

/// Evaluate a power roll.
///
/// Poison halves the formula total (floored) before the base multiplier.
pub fn resolve_power(
    request: &PowerRequest,
    context: &FormulaContext,
    evaluator: &mut dyn FormulaEvaluator,
) -> PowerRoll {
    let evaluation = evaluate_or_zero(evaluator, &request.expression(), context);

    let mut magnitude = evaluation.total;
    if request.poisoned && request.is_attack {
        magnitude = (magnitude / 2.0).floor();
    }
    let base = (magnitude * request.base_multiplier).floor() as i64;
    let critical = ((base as f64) * request.crit_multiplier).floor() as i64 + request.flat_crit_bonus;

    let buff_values = request
        .buff_formula
        .as_deref()
        .map(|formula| buff_slots(evaluator, formula, context));

    debug!(
        formula = %request.formula,
        total = evaluation.total,
        base,
        critical,
        "power rolled"
    );

    PowerRoll {
        total: evaluation.total,
        dice_faces: evaluation.dice_faces,
        base,
        critical,
        buff_values,
    }
}

/// Up to four die faces, with the static part of the total folded into slot 0
fn buff_slots(
    evaluator: &mut dyn FormulaEvaluator,
    formula: &str,
    context: &FormulaContext,
) -> [i64; SLOT_COUNT] {
    let evaluation = evaluate_or_zero(evaluator, formula, context);
    let mut slots = [0; SLOT_COUNT];
    for (slot, face) in slots.iter_mut().zip(&evaluation.dice_faces) {
        *slot = *face;
    }
    slots[0] += evaluation.static_part().floor() as i64;
    slots
}
