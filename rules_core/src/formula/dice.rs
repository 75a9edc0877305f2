//! DiceEvaluator - recursive-descent evaluator for roll formulas
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := NUMBER | NUMBER 'd' NUMBER | 'd' NUMBER
//!          | IDENT | IDENT '(' expr (',' expr)* ')' | '(' expr ')'
//! ```
//!
//! Identifiers may contain letters, digits, `_` and `.`.

use super::{Evaluation, FormulaContext, FormulaError, FormulaEvaluator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Upper bound on dice in a single term
const MAX_DICE: i64 = 1000;

/// Bundled formula evaluator rolling dice with `R`
#[derive(Debug, Clone)]
pub struct DiceEvaluator<R: Rng> {
    rng: R,
}

impl<R: Rng> DiceEvaluator<R> {
    pub fn new(rng: R) -> Self {
        DiceEvaluator { rng }
    }
}

impl DiceEvaluator<StdRng> {
    /// Deterministic evaluator for tests and replays
    pub fn seeded(seed: u64) -> Self {
        DiceEvaluator::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        DiceEvaluator::new(StdRng::from_entropy())
    }
}

impl<R: Rng> FormulaEvaluator for DiceEvaluator<R> {
    fn evaluate(
        &mut self,
        expression: &str,
        context: &FormulaContext,
    ) -> Result<Evaluation, FormulaError> {
        let mut parser = Parser {
            chars: expression.chars().collect(),
            pos: 0,
            context,
            rng: &mut self.rng,
            faces: Vec::new(),
        };
        let total = parser.expression()?;
        parser.skip_whitespace();
        if parser.pos < parser.chars.len() {
            return Err(FormulaError::TrailingInput(parser.pos));
        }
        Ok(Evaluation {
            total,
            dice_faces: parser.faces,
        })
    }
}

struct Parser<'a, R: Rng> {
    chars: Vec<char>,
    pos: usize,
    context: &'a FormulaContext,
    rng: &'a mut R,
    faces: Vec<i64>,
}

impl<R: Rng> Parser<'_, R> {
    fn expression(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some('+') => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some('-') => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some('/') => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(FormulaError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, FormulaError> {
        if self.peek() == Some('-') {
            self.pos += 1;
            return Ok(-self.unary()?);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<f64, FormulaError> {
        match self.peek() {
            None => Err(FormulaError::UnexpectedEnd),
            Some('(') => {
                self.pos += 1;
                let value = self.expression()?;
                self.expect(')')?;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => {
                let number = self.number();
                if self.chars.get(self.pos) == Some(&'d')
                    && self.chars.get(self.pos + 1).is_some_and(|c| c.is_ascii_digit())
                {
                    self.pos += 1;
                    let sides = self.number();
                    self.roll(number, sides)
                } else {
                    number.parse::<f64>().map_err(|_| FormulaError::InvalidNumber(number))
                }
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let ident = self.identifier();
                if let Some(sides) = ident.strip_prefix('d').filter(|s| {
                    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
                }) {
                    let sides = sides.to_string();
                    return self.roll("1".to_string(), sides);
                }
                if self.peek() == Some('(') {
                    self.pos += 1;
                    return self.call(&ident);
                }
                self.context
                    .get(&ident)
                    .ok_or(FormulaError::UnknownVariable(ident))
            }
            Some(found) => Err(FormulaError::UnexpectedChar {
                found,
                position: self.pos,
            }),
        }
    }

    fn call(&mut self, name: &str) -> Result<f64, FormulaError> {
        let mut args = vec![self.expression()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            args.push(self.expression()?);
        }
        self.expect(')')?;

        let first = args[0];
        match name {
            "floor" => Ok(first.floor()),
            "ceil" => Ok(first.ceil()),
            "round" => Ok(first.round()),
            "abs" => Ok(first.abs()),
            "min" => Ok(args.iter().copied().fold(f64::INFINITY, f64::min)),
            "max" => Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            _ => Err(FormulaError::UnknownFunction(name.to_string())),
        }
    }

    fn roll(&mut self, count: String, sides: String) -> Result<f64, FormulaError> {
        let term = format!("{count}d{sides}");
        let count: i64 = count.parse().map_err(|_| FormulaError::InvalidDice(term.clone()))?;
        let sides: i64 = sides.parse().map_err(|_| FormulaError::InvalidDice(term.clone()))?;
        if sides < 1 || !(0..=MAX_DICE).contains(&count) {
            return Err(FormulaError::InvalidDice(term));
        }

        let mut total = 0;
        for _ in 0..count {
            let face = self.rng.gen_range(1..=sides);
            self.faces.push(face);
            total += face;
        }
        Ok(total as f64)
    }

    fn number(&mut self) -> String {
        let start = self.pos;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_digit() || *c == '.')
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn identifier(&mut self) -> String {
        let start = self.pos;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn expect(&mut self, wanted: char) -> Result<(), FormulaError> {
        match self.peek() {
            Some(c) if c == wanted => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(FormulaError::UnexpectedChar {
                found,
                position: self.pos,
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    /// Next non-whitespace character, without consuming it
    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> Result<Evaluation, FormulaError> {
        let ctx = FormulaContext::new()
            .with_value("strength", 10.0)
            .with_value("level", 4.0)
            .with_value("weapon.power", 7.0);
        DiceEvaluator::seeded(42).evaluate(expr, &ctx)
    }

    #[test]
    fn test_arithmetic_precedence() {
        let result = eval("2 + 3 * 4 - (6 / 2)").unwrap();
        assert!((result.total - 11.0).abs() < f64::EPSILON);
        assert!(result.dice_faces.is_empty());
    }

    #[test]
    fn test_variables_and_functions() {
        let result = eval("floor(strength / 3) + max(level, 2) + weapon.power").unwrap();
        assert!((result.total - 14.0).abs() < f64::EPSILON);

        let result = eval("-abs(-3) + min(5, 2, 9)").unwrap();
        assert!((result.total + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dice_faces_are_reported() {
        let result = eval("3d6 + 2").unwrap();
        assert_eq!(result.dice_faces.len(), 3);
        assert!(result.dice_faces.iter().all(|f| (1..=6).contains(f)));
        let sum: i64 = result.dice_faces.iter().sum();
        assert!((result.total - (sum + 2) as f64).abs() < f64::EPSILON);
        assert!((result.static_part() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bare_die() {
        let result = eval("d10 * 2").unwrap();
        assert_eq!(result.dice_faces.len(), 1);
        assert!((result.total - (result.dice_faces[0] * 2) as f64).abs() < f64::EPSILON);
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let a = eval("4d8").unwrap();
        let b = eval("4d8").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_errors() {
        assert_eq!(eval("").unwrap_err(), FormulaError::UnexpectedEnd);
        assert_eq!(eval("1 / 0").unwrap_err(), FormulaError::DivisionByZero);
        assert_eq!(
            eval("charisma").unwrap_err(),
            FormulaError::UnknownVariable("charisma".to_string())
        );
        assert_eq!(
            eval("sqrt(4)").unwrap_err(),
            FormulaError::UnknownFunction("sqrt".to_string())
        );
        assert!(matches!(eval("2d0"), Err(FormulaError::InvalidDice(_))));
        assert!(matches!(eval("3 4"), Err(FormulaError::TrailingInput(_))));
        assert!(matches!(eval("(1 + 2"), Err(FormulaError::UnexpectedEnd)));
    }
}
