//! # Application Errors
//!
//! Wraps every lower-layer error so commands can use `?` throughout, and
//! maps each failure to a process exit code.
//!
//! ```text
//! CoreError ─┐
//! DbError ───┼──► AppError ──► "error: <message>" on stderr + exit code
//! ConfigError┘
//! ```

use countnote_core::CoreError;
use countnote_db::DbError;
use thiserror::Error;

use crate::config::ConfigError;

/// Exit code for a usage problem, such as a missing `--yes`.
const EXIT_USAGE: u8 = 2;

/// Exit code for configuration errors (sysexits `EX_CONFIG`).
const EXIT_CONFIG: u8 = 78;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// A destructive command was run without `--yes`.
    #[error("Refusing to {action} without --yes")]
    ConfirmationRequired { action: &'static str },
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::ConfirmationRequired { .. } => EXIT_USAGE,
            AppError::Config(_) => EXIT_CONFIG,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err = AppError::ConfirmationRequired { action: "reset" };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Refusing to reset without --yes");

        let err = AppError::from(ConfigError::ZeroHistoryLimit);
        assert_eq!(err.exit_code(), 78);

        let err = AppError::from(CoreError::SnapshotNotFound("abc".into()));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Snapshot not found: abc");
    }
}
