//! The embedded calculator.

use std::io::Write;

use countnote_core::storage::KeyValueStore;

use super::App;
use crate::error::AppResult;
use crate::render::render_calculation;

impl<S: KeyValueStore + Clone> App<S> {
    pub(super) fn calc<W: Write>(&self, expression: &str, out: &mut W) -> AppResult<()> {
        let record = self.calculator.calculate(expression)?;
        writeln!(out, "{}", record.result)?;
        Ok(())
    }

    pub(super) fn calc_history<W: Write>(&self, clear: bool, out: &mut W) -> AppResult<()> {
        if clear {
            self.calculator.clear_history()?;
            writeln!(out, "Calculator history cleared")?;
            return Ok(());
        }

        for record in self.calculator.history() {
            writeln!(out, "{}", render_calculation(&record))?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::tests::{run, test_app};
    use crate::cli::Command;
    use crate::config::AppConfig;

    fn calc(words: &[&str]) -> Command {
        Command::Calc {
            expression: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn test_calc_and_history() {
        let (_, mut app) = test_app(AppConfig::default());

        assert_eq!(run(&mut app, &calc(&["12", "×", "3"])).unwrap(), "36\n");
        assert_eq!(run(&mut app, &calc(&["1/2"])).unwrap(), "0.5\n");
        assert!(run(&mut app, &calc(&["1/0"])).is_err());
        assert_eq!(run(&mut app, &calc(&["17", "%", "5"])).unwrap(), "2\n");

        let out = run(&mut app, &Command::CalcHistory { clear: false }).unwrap();
        assert_eq!(out, "17 % 5 = 2\n1/2 = 0.5\n12 × 3 = 36\n");

        run(&mut app, &Command::CalcHistory { clear: true }).unwrap();
        let out = run(&mut app, &Command::CalcHistory { clear: false }).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_calc_does_not_touch_counts() {
        let (_, mut app) = test_app(AppConfig::default());
        run(&mut app, &calc(&["500", "*", "7"])).unwrap();
        assert_eq!(app.session().total_count(), 0);
    }
}
