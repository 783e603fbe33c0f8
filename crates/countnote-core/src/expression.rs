//! # Expression Evaluator
//!
//! Turns free-form count input into a non-negative integer count.
//!
//! ## Evaluation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw text "+ 13", current count 10                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  strip whitespace ──────────────► "+13"                                 │
//! │       │                                                                 │
//! │       ├── empty? ───────────────► keep current count (no mutation)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  leading '+'/'-'? ──────────────► anchor to current: "10+13"            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_arithmetic() ────────────► 23.0                                  │
//! │       │                                                                 │
//! │       ├── error? ───────────────► keep current count (fail closed)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NegativePolicy + floor ────────► 23                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Grammar
//! Only `0-9 . + - * / ( )` are accepted, plus `%` in the calculator
//! grammar. There are no identifiers, no function calls and nothing is ever
//! handed to a general code evaluator. Two adjacent identical signs (`--`,
//! `++`) are rejected; count input has its whitespace stripped first, so
//! `3 - -5` typed into a count field fails closed too.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | '(' expr ')'
//! number  := digits ['.' digits] | digits '.' | '.' digits
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExpressionError;
use crate::MAX_COUNT;

/// Nesting limit for parentheses and unary signs.
const MAX_DEPTH: usize = 64;

// =============================================================================
// Negative Policy
// =============================================================================

/// What to do when an expression evaluates below zero (e.g. `-100` typed
/// against a count of 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativePolicy {
    /// Take the absolute value: `3 - 100` becomes 97.
    #[default]
    Magnitude,

    /// Clamp at zero: `3 - 100` becomes 0.
    ClampToZero,
}

impl fmt::Display for NegativePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NegativePolicy::Magnitude => write!(f, "magnitude"),
            NegativePolicy::ClampToZero => write!(f, "clamp_to_zero"),
        }
    }
}

impl FromStr for NegativePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "magnitude" | "abs" => Ok(NegativePolicy::Magnitude),
            "clamp_to_zero" | "clamp" | "zero" => Ok(NegativePolicy::ClampToZero),
            other => Err(format!(
                "Unknown negative policy: '{}'. Valid options: magnitude, clamp_to_zero",
                other
            )),
        }
    }
}

// =============================================================================
// Evaluator
// =============================================================================

/// Resolves count input against the current count.
///
/// ## Example
/// ```rust
/// use countnote_core::expression::ExpressionEvaluator;
///
/// let evaluator = ExpressionEvaluator::default();
/// assert_eq!(evaluator.evaluate("+3", 10), 13);
/// assert_eq!(evaluator.evaluate("5", 10), 5);
/// assert_eq!(evaluator.evaluate("", 10), 10);
/// assert_eq!(evaluator.evaluate("abc", 7), 7);
/// assert_eq!(evaluator.evaluate("2*(3+4)", 0), 14);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpressionEvaluator {
    policy: NegativePolicy,
}

impl ExpressionEvaluator {
    /// Creates an evaluator with the given negative-result policy.
    pub const fn new(policy: NegativePolicy) -> Self {
        ExpressionEvaluator { policy }
    }

    /// The configured negative-result policy.
    pub const fn policy(&self) -> NegativePolicy {
        self.policy
    }

    /// Always yields a valid count; falls back to `current` on any failure.
    pub fn evaluate(&self, raw: &str, current: u64) -> u64 {
        self.resolve(raw, current).unwrap_or(current)
    }

    /// Like [`evaluate`](Self::evaluate), but returns `None` when the input
    /// must not mutate anything (empty text or a failed evaluation).
    pub fn resolve(&self, raw: &str, current: u64) -> Option<u64> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return None;
        }

        let expression = if compact.starts_with('+') || compact.starts_with('-') {
            format!("{}{}", current, compact)
        } else {
            compact
        };

        let value = match parse_arithmetic(&expression) {
            Ok(value) => value,
            Err(err) => {
                debug!(input = %raw, error = %err, "Count expression rejected");
                return None;
            }
        };

        let sanitized = match self.policy {
            NegativePolicy::Magnitude => value.abs().floor(),
            NegativePolicy::ClampToZero => value.max(0.0).floor(),
        };

        if sanitized > MAX_COUNT as f64 {
            debug!(input = %raw, value = sanitized, "Count expression exceeds maximum");
            return None;
        }

        Some(sanitized as u64)
    }
}

// =============================================================================
// Arithmetic Parser
// =============================================================================

/// Evaluates a restricted arithmetic expression.
///
/// Whitespace separates tokens but is otherwise ignored. Division results
/// must stay finite. A doubled sign with nothing between (`--`, `++`) is a
/// syntax error, while `2 - -3` is fine.
///
/// ## Example
/// ```rust
/// use countnote_core::expression::parse_arithmetic;
///
/// assert_eq!(parse_arithmetic("3 + 1 + 2").unwrap(), 6.0);
/// assert_eq!(parse_arithmetic("7 / 2").unwrap(), 3.5);
/// assert!(parse_arithmetic("1 / 0").is_err());
/// assert!(parse_arithmetic("3--5").is_err());
/// assert!(parse_arithmetic("alert(1)").is_err());
/// ```
pub fn parse_arithmetic(input: &str) -> Result<f64, ExpressionError> {
    evaluate_with(input, false)
}

/// Calculator grammar: [`parse_arithmetic`] plus `%` (remainder, same
/// precedence as `*` and `/`, sign follows the dividend).
///
/// ```rust
/// use countnote_core::expression::parse_calculation;
///
/// assert_eq!(parse_calculation("10 % 4 * 2").unwrap(), 4.0);
/// assert_eq!(parse_calculation("-7 % 3").unwrap(), -1.0);
/// assert!(parse_calculation("5 % 0").is_err());
/// ```
pub fn parse_calculation(input: &str) -> Result<f64, ExpressionError> {
    evaluate_with(input, true)
}

fn evaluate_with(input: &str, allow_remainder: bool) -> Result<f64, ExpressionError> {
    let chars: Vec<char> = input.chars().collect();
    if chars.iter().all(|c| c.is_whitespace()) {
        return Err(ExpressionError::Empty);
    }

    if let Some((position, &ch)) = chars.iter().enumerate().find(|(_, &c)| {
        !(c.is_whitespace()
            || matches!(c, '0'..='9' | '.' | '+' | '-' | '*' | '/' | '(' | ')')
            || (allow_remainder && c == '%'))
    }) {
        return Err(ExpressionError::UnexpectedChar { ch, position });
    }

    let mut parser = Parser {
        chars: &chars,
        pos: 0,
        depth: 0,
        allow_remainder,
    };
    let value = parser.expr()?;

    if parser.peek().is_some() {
        return Err(parser.syntax("unexpected trailing input"));
    }
    if !value.is_finite() {
        return Err(ExpressionError::NonFinite);
    }

    Ok(value)
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    depth: usize,
    allow_remainder: bool,
}

impl Parser<'_> {
    /// Next token character, skipping whitespace.
    fn peek(&mut self) -> Option<char> {
        while matches!(self.chars.get(self.pos), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
        self.chars.get(self.pos).copied()
    }

    fn syntax(&self, reason: &str) -> ExpressionError {
        ExpressionError::Syntax {
            position: self.pos,
            reason: reason.to_string(),
        }
    }

    fn descend(&mut self) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.syntax("expression nested too deeply"));
        }
        Ok(())
    }

    /// Consumes the sign at `pos`. `--` and `++` are not operators.
    fn take_sign(&mut self, sign: char) -> Result<(), ExpressionError> {
        if self.chars.get(self.pos + 1) == Some(&sign) {
            return Err(self.syntax("doubled sign"));
        }
        self.pos += 1;
        Ok(())
    }

    fn expr(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.take_sign(op)?;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(op @ ('*' | '/')) => op,
                Some('%') if self.allow_remainder => '%',
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                '*' => value * rhs,
                _ => {
                    let result = if op == '/' { value / rhs } else { value % rhs };
                    if !result.is_finite() {
                        return Err(ExpressionError::NonFinite);
                    }
                    result
                }
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, ExpressionError> {
        match self.peek() {
            Some(sign @ ('+' | '-')) => {
                self.take_sign(sign)?;
                self.descend()?;
                let operand = self.unary()?;
                self.depth -= 1;
                Ok(if sign == '-' { -operand } else { operand })
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, ExpressionError> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                self.descend()?;
                let value = self.expr()?;
                self.depth -= 1;
                if self.peek() != Some(')') {
                    return Err(self.syntax("expected ')'"));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(_) => Err(self.syntax("expected a number or '('")),
            None => Err(self.syntax("unexpected end of expression")),
        }
    }

    fn number(&mut self) -> Result<f64, ExpressionError> {
        let start = self.pos;
        while matches!(self.chars.get(self.pos), Some(c) if c.is_ascii_digit() || *c == '.') {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();

        if literal == "." || literal.matches('.').count() > 1 {
            return Err(ExpressionError::MalformedNumber(literal));
        }
        literal
            .parse::<f64>()
            .map_err(|_| ExpressionError::MalformedNumber(literal))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
