//! Live counting: show, count, inc, dec, reset, save.

use std::io::Write;

use countnote_core::money::format_amount;
use countnote_core::storage::KeyValueStore;
use countnote_core::DenominationValue;

use super::App;
use crate::error::{AppError, AppResult};
use crate::render::{denomination_label, render_counts, render_totals};

impl<S: KeyValueStore + Clone> App<S> {
    pub(super) fn show<W: Write>(&self, out: &mut W) -> AppResult<()> {
        let counts = self.session.store().counts();
        write!(
            out,
            "{}",
            render_counts(self.session.currency(), counts, self.hide_amounts)
        )?;
        Ok(())
    }

    pub(super) fn count<W: Write>(
        &mut self,
        value: DenominationValue,
        input: &str,
        out: &mut W,
    ) -> AppResult<()> {
        let count = self.session.record_count(value, input)?;
        self.print_line(value, count, out)
    }

    pub(super) fn increment<W: Write>(
        &mut self,
        value: DenominationValue,
        out: &mut W,
    ) -> AppResult<()> {
        let count = self.session.increment(value)?;
        self.print_line(value, count, out)
    }

    pub(super) fn decrement<W: Write>(
        &mut self,
        value: DenominationValue,
        out: &mut W,
    ) -> AppResult<()> {
        let count = self.session.decrement(value)?;
        self.print_line(value, count, out)
    }

    pub(super) fn reset<W: Write>(&mut self, confirmed: bool, out: &mut W) -> AppResult<()> {
        if !confirmed {
            return Err(AppError::ConfirmationRequired {
                action: "reset every count",
            });
        }
        self.session.reset();
        writeln!(out, "{} counts reset", self.session.currency())?;
        Ok(())
    }

    pub(super) fn save<W: Write>(&self, note: Option<&str>, out: &mut W) -> AppResult<()> {
        let snapshot = self.session.save_snapshot(note)?;
        writeln!(out, "Saved {}", snapshot.id)?;
        write!(
            out,
            "{}",
            render_totals(snapshot.currency, snapshot.totals(), self.hide_amounts)
        )?;
        Ok(())
    }

    /// `₹500 × 7 = ₹3,500` followed by the running total.
    fn print_line<W: Write>(&self, value: DenominationValue, count: u64, out: &mut W) -> AppResult<()> {
        let currency = self.session.currency();
        writeln!(
            out,
            "{} × {} = {}",
            denomination_label(currency, value),
            count,
            format_amount(currency, value.times(count), self.hide_amounts)
        )?;
        write!(
            out,
            "{}",
            render_totals(currency, self.session.totals(), self.hide_amounts)
        )?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
