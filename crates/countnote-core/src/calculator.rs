//! # Calculator
//!
//! The small calculator shown next to the counter. It shares the restricted
//! arithmetic grammar with count input, adds `%` for remainders and, unlike
//! count input, reports failures so the display can show "Error".

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::CoreResult;
use crate::expression::parse_calculation;
use crate::storage::{read_json, write_json, KeyValueStore, CALCULATOR_HISTORY_KEY};
use crate::types::CalculationRecord;

/// Number of calculations kept in history.
pub const CALCULATOR_HISTORY_LIMIT: usize = 10;

/// Evaluates expressions and remembers the most recent ones.
///
/// ## Example
/// ```rust
/// use countnote_core::calculator::Calculator;
/// use countnote_core::storage::MemoryStore;
///
/// let calculator = Calculator::new(MemoryStore::new());
/// let record = calculator.calculate("12 × 3 ÷ 8").unwrap();
/// assert_eq!(record.result, "4.5");
/// assert!(calculator.calculate("1 ÷ 0").is_err());
/// assert_eq!(calculator.history().len(), 1);
/// ```
#[derive(Debug)]
pub struct Calculator<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> Calculator<S> {
    pub fn new(storage: S) -> Self {
        Calculator { storage }
    }

    /// Evaluates `expression` and records it at the front of the history.
    ///
    /// `×` and `÷` are accepted as aliases of `*` and `/`, and `%` is the
    /// remainder (`10 % 3` is `1`, `1 % 0` is an error). Failed
    /// expressions are returned as errors and not recorded.
    pub fn calculate(&self, expression: &str) -> CoreResult<CalculationRecord> {
        let normalized = expression.replace('×', "*").replace('÷', "/");
        let value = parse_calculation(&normalized)?;

        let record = CalculationRecord {
            expression: expression.trim().to_string(),
            result: render_number(value),
            timestamp: Utc::now(),
        };
        debug!(expression = %record.expression, result = %record.result, "Calculated");

        let mut history = self.history();
        history.insert(0, record.clone());
        history.truncate(CALCULATOR_HISTORY_LIMIT);
        if let Err(err) = write_json(&self.storage, CALCULATOR_HISTORY_KEY, &history) {
            warn!(error = %err, "Failed to persist calculator history");
        }

        Ok(record)
    }

    /// Recent calculations, newest first. Unreadable history reads as empty.
    pub fn history(&self) -> Vec<CalculationRecord> {
        match read_json(&self.storage, CALCULATOR_HISTORY_KEY) {
            Ok(history) => history.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "Ignoring unreadable calculator history");
                Vec::new()
            }
        }
    }

    pub fn clear_history(&self) -> CoreResult<()> {
        self.storage.remove_item(CALCULATOR_HISTORY_KEY)?;
        Ok(())
    }
}

/// Shortest decimal form: `3`, `0.5`, `-2.25`.
fn render_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::storage::MemoryStore;

    #[test]
    fn test_calculate_renders_shortest_form() {
        let calculator = Calculator::new(MemoryStore::new());
        assert_eq!(calculator.calculate("1+2").unwrap().result, "3");
        assert_eq!(calculator.calculate("1/2").unwrap().result, "0.5");
        assert_eq!(calculator.calculate("2-4.25").unwrap().result, "-2.25");
        assert_eq!(calculator.calculate("-0").unwrap().result, "0");
    }

    #[test]
    fn test_calculate_remainder() {
        let calculator = Calculator::new(MemoryStore::new());
        assert_eq!(calculator.calculate("10 % 3").unwrap().result, "1");
        assert_eq!(calculator.calculate("-7 % 2").unwrap().result, "-1");
        assert_eq!(calculator.calculate("9 × 5 % 7").unwrap().result, "3");
        assert!(calculator.calculate("4 % 0").is_err());
        assert_eq!(calculator.history().len(), 3);
    }

    #[test]
    fn test_errors_are_not_recorded() {
        let calculator = Calculator::new(MemoryStore::new());
        let err = calculator.calculate("5/0").unwrap_err();
        assert!(matches!(err, CoreError::Expression(_)));
        assert!(calculator.calculate("2+").is_err());
        assert!(calculator.history().is_empty());
    }

    #[test]
    fn test_history_is_capped_newest_first() {
        let calculator = Calculator::new(MemoryStore::new());
        for n in 1..=12 {
            calculator.calculate(&format!("{}*2", n)).unwrap();
        }

        let history = calculator.history();
        assert_eq!(history.len(), CALCULATOR_HISTORY_LIMIT);
        assert_eq!(history[0].expression, "12*2");
        assert_eq!(history[0].result, "24");
        assert_eq!(history[9].expression, "3*2");
    }

    #[test]
    fn test_clear_history() {
        let storage = MemoryStore::new();
        let calculator = Calculator::new(&storage);
        calculator.calculate("7 × 6").unwrap();
        assert_eq!(calculator.history()[0].result, "42");

        calculator.clear_history().unwrap();
        assert!(calculator.history().is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_unreadable_history_reads_empty() {
        let storage = MemoryStore::new();
        storage
            .set_item(CALCULATOR_HISTORY_KEY, r#"[{"expression":"1+1","result":"2","timestamp":"3/4/2024, 10:00:00 AM"}]"#)
            .unwrap();
        let calculator = Calculator::new(&storage);
        assert!(calculator.history().is_empty());

        calculator.calculate("1+1").unwrap();
        assert_eq!(calculator.history().len(), 1);
    }
}
