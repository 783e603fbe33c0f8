//! Saved counts: list, show, delete, clear, load.

use std::io::Write;

use countnote_core::history::HistoryArchive;
use countnote_core::storage::KeyValueStore;
use countnote_core::validation::validate_snapshot_id;
use countnote_core::CoreError;

use super::App;
use crate::cli::HistoryCommand;
use crate::error::{AppError, AppResult};
use crate::render::{render_counts, render_snapshot_detail, render_snapshot_line};

impl<S: KeyValueStore + Clone> App<S> {
    pub(super) fn history<W: Write>(&mut self, command: &HistoryCommand, out: &mut W) -> AppResult<()> {
        match command {
            HistoryCommand::List => self.history_list(out),
            HistoryCommand::Show { id } => self.history_show(id, out),
            HistoryCommand::Delete { id } => self.history_delete(id, out),
            HistoryCommand::Clear { yes } => self.history_clear(*yes, out),
            HistoryCommand::Load { id } => self.history_load(id, out),
        }
    }

    fn history_list<W: Write>(&self, out: &mut W) -> AppResult<()> {
        let snapshots = self.session.history()?;
        if snapshots.is_empty() {
            writeln!(out, "No saved {} counts", self.session.currency())?;
            return Ok(());
        }

        for snapshot in &snapshots {
            writeln!(out, "{}", render_snapshot_line(snapshot, self.hide_amounts))?;
        }
        Ok(())
    }

    fn history_show<W: Write>(&self, id: &str, out: &mut W) -> AppResult<()> {
        let id = validate_snapshot_id(id).map_err(CoreError::from)?;
        let snapshot = self
            .session
            .archive()
            .get(self.session.currency(), id)?
            .ok_or_else(|| CoreError::SnapshotNotFound(id.to_string()))?;

        write!(out, "{}", render_snapshot_detail(&snapshot, self.hide_amounts))?;
        Ok(())
    }

    fn history_delete<W: Write>(&self, id: &str, out: &mut W) -> AppResult<()> {
        let id = validate_snapshot_id(id).map_err(CoreError::from)?;
        if !self.session.archive().remove(self.session.currency(), id)? {
            return Err(CoreError::SnapshotNotFound(id.to_string()).into());
        }
        writeln!(out, "Deleted {}", id)?;
        Ok(())
    }

    fn history_clear<W: Write>(&self, confirmed: bool, out: &mut W) -> AppResult<()> {
        if !confirmed {
            return Err(AppError::ConfirmationRequired {
                action: "clear history",
            });
        }
        self.session.archive().clear(self.session.currency())?;
        writeln!(out, "{} history cleared", self.session.currency())?;
        Ok(())
    }

    fn history_load<W: Write>(&mut self, id: &str, out: &mut W) -> AppResult<()> {
        let snapshot = self.session.load_snapshot(id)?;
        writeln!(out, "Loaded {}", snapshot.id)?;
        write!(
            out,
            "{}",
            render_counts(
                self.session.currency(),
                self.session.store().counts(),
                self.hide_amounts
            )
        )?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
