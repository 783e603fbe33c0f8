//! # Count Note CLI
//!
//! Command-line front end for the denomination counter.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         countnote (binary)                              │
//! │                                                                         │
//! │  Cli (clap) ──► AppConfig (defaults → toml → env → flags)               │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  SqliteKeyValueStore ──► App { CounterSession, Calculator }             │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                          render ──► stdout                              │
//! │                                                                         │
//! │  tracing ──► stderr (RUST_LOG, default "warn")                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use countnote_db::{DbConfig, SqliteKeyValueStore};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::App;
use crate::config::AppConfig;
use crate::error::AppResult;

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG` wins when set
/// - otherwise `warn`, or `warn,countnote=debug` with `--verbose`
///
/// Logs go to stderr; stdout carries command output only.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,countnote=debug,sqlx=warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Parses arguments, runs one command and maps the outcome to an exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "Command failed");
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn execute(cli: &Cli) -> AppResult<()> {
    let mut config = AppConfig::load(cli.config.clone())?;
    config.apply_cli(cli);
    config.validate()?;

    let db_path = config.resolve_database_path()?;
    info!(path = ?db_path, currency = %config.currency, "Opening count database");
    let store = SqliteKeyValueStore::open(DbConfig::new(db_path))?;

    let mut app = App::new(store.clone(), &config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app.execute(&cli.command, &mut out)?;
    out.flush()?;

    store.close();
    Ok(())
}
