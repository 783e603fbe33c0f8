//! # Count Input
//!
//! Per-denomination text field behaviour, independent of any UI toolkit.
//!
//! ```text
//!            focus()                      change("12")
//!  Idle ─────────────► Editing ─────────────────────────► record_count("12")
//!   ▲                    │   change("+3") ──► buffer only, wait
//!   │                    │
//!   │   enter() / blur() │
//!   └────────────────────┘  record_count(buffer)
//!                           (blur on empty buffer: revert, no mutation)
//! ```

use crate::error::CoreResult;
use crate::history::HistoryArchive;
use crate::session::CounterSession;
use crate::storage::KeyValueStore;
use crate::types::DenominationValue;

/// Text field bound to one denomination of the active currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountInput {
    denomination: DenominationValue,
    buffer: String,
    editing: bool,
}

impl CountInput {
    pub fn new(denomination: DenominationValue) -> Self {
        CountInput {
            denomination,
            buffer: String::new(),
            editing: false,
        }
    }

    pub fn denomination(&self) -> DenominationValue {
        self.denomination
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// What the field shows: the buffer while editing, the count otherwise.
    pub fn display<S, A>(&self, session: &CounterSession<S, A>) -> String
    where
        S: KeyValueStore + Clone,
        A: HistoryArchive,
    {
        if self.editing {
            self.buffer.clone()
        } else {
            session.get(self.denomination).to_string()
        }
    }

    /// Enters editing mode with the current count in the buffer.
    pub fn focus<S, A>(&mut self, session: &CounterSession<S, A>)
    where
        S: KeyValueStore + Clone,
        A: HistoryArchive,
    {
        self.buffer = session.get(self.denomination).to_string();
        self.editing = true;
    }

    /// Updates the buffer. Plain digits commit right away; anything else
    /// waits for [`enter`](Self::enter) or [`blur`](Self::blur).
    pub fn change<S, A>(&mut self, session: &mut CounterSession<S, A>, text: &str) -> CoreResult<()>
    where
        S: KeyValueStore + Clone,
        A: HistoryArchive,
    {
        self.buffer = text.to_string();
        self.editing = true;

        let trimmed = text.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            session.record_count(self.denomination, trimmed)?;
        }
        Ok(())
    }

    /// Commits the buffer and leaves editing mode.
    pub fn enter<S, A>(&mut self, session: &mut CounterSession<S, A>) -> CoreResult<u64>
    where
        S: KeyValueStore + Clone,
        A: HistoryArchive,
    {
        self.commit(session)
    }

    /// Like [`enter`](Self::enter), except an empty buffer just reverts.
    pub fn blur<S, A>(&mut self, session: &mut CounterSession<S, A>) -> CoreResult<u64>
    where
        S: KeyValueStore + Clone,
        A: HistoryArchive,
    {
        if self.buffer.trim().is_empty() {
            self.editing = false;
            self.buffer.clear();
            return Ok(session.get(self.denomination));
        }
        self.commit(session)
    }

    fn commit<S, A>(&mut self, session: &mut CounterSession<S, A>) -> CoreResult<u64>
    where
        S: KeyValueStore + Clone,
        A: HistoryArchive,
    {
        let count = session.record_count(self.denomination, &self.buffer)?;
        self.buffer = count.to_string();
        self.editing = false;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::StoredHistoryArchive;
    use crate::storage::MemoryStore;
    use crate::types::Currency;

    fn hundred() -> DenominationValue {
        DenominationValue::from_major(100)
    }

    #[test]
    fn test_plain_digits_commit_immediately() {
        let storage = MemoryStore::new();
        let mut session =
            CounterSession::open(&storage, StoredHistoryArchive::new(&storage), Currency::Inr);
        let mut input = CountInput::new(hundred());

        input.focus(&session);
        assert_eq!(input.display(&session), "0");

        input.change(&mut session, "1").unwrap();
        input.change(&mut session, "12").unwrap();
        assert_eq!(session.get(hundred()), 12);
        assert_eq!(input.display(&session), "12");
    }

    #[test]
    fn test_expression_waits_for_enter() {
        let storage = MemoryStore::new();
        let mut session =
            CounterSession::open(&storage, StoredHistoryArchive::new(&storage), Currency::Inr);
        session.record_count(hundred(), "10").unwrap();
        let mut input = CountInput::new(hundred());

        input.focus(&session);
        input.change(&mut session, "+").unwrap();
        input.change(&mut session, "+13").unwrap();
        assert_eq!(session.get(hundred()), 10);
        assert_eq!(input.display(&session), "+13");

        assert_eq!(input.enter(&mut session).unwrap(), 23);
        assert!(!input.is_editing());
        assert_eq!(input.display(&session), "23");
    }

    #[test]
    fn test_blur_commits_expression() {
        let storage = MemoryStore::new();
        let mut session =
            CounterSession::open(&storage, StoredHistoryArchive::new(&storage), Currency::Inr);
        let mut input = CountInput::new(hundred());

        input.focus(&session);
        input.change(&mut session, "2*(3+4)").unwrap();
        assert_eq!(input.blur(&mut session).unwrap(), 14);
        assert_eq!(session.get(hundred()), 14);
    }

    #[test]
    fn test_blur_on_empty_buffer_reverts() {
        let storage = MemoryStore::new();
        let mut session =
            CounterSession::open(&storage, StoredHistoryArchive::new(&storage), Currency::Inr);
        session.record_count(hundred(), "7").unwrap();
        let mut input = CountInput::new(hundred());

        input.focus(&session);
        input.change(&mut session, "   ").unwrap();
        assert_eq!(input.blur(&mut session).unwrap(), 7);
        assert_eq!(session.get(hundred()), 7);
        assert_eq!(input.display(&session), "7");
    }

    #[test]
    fn test_garbage_keeps_count() {
        let storage = MemoryStore::new();
        let mut session =
            CounterSession::open(&storage, StoredHistoryArchive::new(&storage), Currency::Inr);
        session.record_count(hundred(), "4").unwrap();
        let mut input = CountInput::new(hundred());

        input.focus(&session);
        input.change(&mut session, "4a").unwrap();
        assert_eq!(input.enter(&mut session).unwrap(), 4);
        assert_eq!(input.display(&session), "4");
    }
}
