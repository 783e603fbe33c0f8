//! # Command-Line Arguments
//!
//! ```text
//! countnote [--currency INR|USD] [--db PATH] [--config PATH] [--hide-amounts]
//!   show
//!   count <denomination> <input>      count 500 5 | count 500 +2 | count 10 -3
//!   inc <denomination>
//!   dec <denomination>
//!   reset --yes
//!   save [--note TEXT]
//!   history list | show <id> | delete <id> | clear --yes | load <id>
//!   calc <expression...>
//!   calc-history [--clear]
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use countnote_core::{Currency, DenominationValue};

#[derive(Parser, Debug)]
#[command(name = "countnote")]
#[command(about = "Count cash by denomination, keep totals and history", version)]
pub struct Cli {
    /// Currency to count in (overrides the configured default).
    #[arg(long, global = true)]
    pub currency: Option<Currency>,

    /// SQLite database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Mask every amount in the output.
    #[arg(long, global = true)]
    pub hide_amounts: bool,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show counts, line totals and aggregates.
    Show,

    /// Record a count: a number, `+n`/`-n` relative to the current count,
    /// or arithmetic such as `2*10`.
    Count {
        denomination: DenominationValue,
        #[arg(allow_hyphen_values = true)]
        input: String,
    },

    /// Add one note or coin.
    Inc { denomination: DenominationValue },

    /// Remove one note or coin (stays at zero).
    Dec { denomination: DenominationValue },

    /// Zero every count of the active currency.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },

    /// Save the current counts to history.
    Save {
        #[arg(long)]
        note: Option<String>,
    },

    /// Browse and manage saved counts.
    History(HistoryArgs),

    /// Evaluate an arithmetic expression (`+ - * / %`, `×`, `÷`).
    Calc {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,
    },

    /// Show (or clear) recent calculations.
    CalcHistory {
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum HistoryCommand {
    /// List saved counts, newest first.
    List,

    /// Show one saved count in detail.
    Show { id: String },

    /// Delete one saved count.
    Delete { id: String },

    /// Delete every saved count of the active currency.
    Clear {
        #[arg(long)]
        yes: bool,
    },

    /// Replace the live counts with a saved count.
    Load { id: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
