//! # Commands
//!
//! Every subcommand runs against an [`App`], which owns the counting session
//! and the calculator over one key-value store.
//!
//! ## Command Flow
//! ```text
//! Command ──► App::execute ──► counter / history / calc handler
//!                                   │
//!                                   ▼
//!                          CounterSession / Calculator
//!                                   │
//!                                   ▼
//!                           render::* ──► out
//! ```
//!
//! Handlers write to any `io::Write` so tests can capture the output.

mod calc;
mod counter;
mod history;

use std::io::Write;

use countnote_core::calculator::Calculator;
use countnote_core::history::StoredHistoryArchive;
use countnote_core::session::CounterSession;
use countnote_core::storage::KeyValueStore;
use countnote_core::ExpressionEvaluator;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::error::AppResult;

/// Session type every command works with.
pub type Session<S> = CounterSession<S, StoredHistoryArchive<S>>;

/// Command context: one session and one calculator sharing a store.
pub struct App<S: KeyValueStore + Clone> {
    session: Session<S>,
    calculator: Calculator<S>,
    hide_amounts: bool,
}

impl<S: KeyValueStore + Clone> App<S> {
    /// Opens the session for the configured currency.
    pub fn new(storage: S, config: &AppConfig) -> Self {
        let archive =
            StoredHistoryArchive::new(storage.clone()).with_limit(config.history_limit());
        let session = CounterSession::open(storage.clone(), archive, config.currency)
            .with_evaluator(ExpressionEvaluator::new(config.negative_policy));

        App {
            session,
            calculator: Calculator::new(storage),
            hide_amounts: config.hide_amounts,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Runs one command, writing its output to `out`.
    pub fn execute<W: Write>(&mut self, command: &Command, out: &mut W) -> AppResult<()> {
        match command {
            Command::Show => self.show(out),
            Command::Count { denomination, input } => self.count(*denomination, input, out),
            Command::Inc { denomination } => self.increment(*denomination, out),
            Command::Dec { denomination } => self.decrement(*denomination, out),
            Command::Reset { yes } => self.reset(*yes, out),
            Command::Save { note } => self.save(note.as_deref(), out),
            Command::History(args) => self.history(&args.command, out),
            Command::Calc { expression } => self.calc(&expression.join(" "), out),
            Command::CalcHistory { clear } => self.calc_history(*clear, out),
        }
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use std::rc::Rc;

    use countnote_core::storage::MemoryStore;

    use super::App;
    use crate::cli::Command;
    use crate::config::AppConfig;
    use crate::error::AppResult;

    pub(crate) type TestStore = Rc<MemoryStore>;

    /// An app over a fresh in-memory store, plus a handle on that store.
    pub(crate) fn test_app(config: AppConfig) -> (TestStore, App<TestStore>) {
        let store = Rc::new(MemoryStore::new());
        let app = App::new(store.clone(), &config);
        (store, app)
    }

    /// Runs a command and returns what it printed.
    pub(crate) fn run(app: &mut App<TestStore>, command: &Command) -> AppResult<String> {
        let mut out = Vec::new();
        app.execute(command, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Output split into lines.
    pub(crate) fn output(text: &str) -> Vec<&str> {
        text.lines().collect()
    }
}
