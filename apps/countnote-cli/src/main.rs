//! # Count Note Entry Point
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (logging)
//! 3. Load configuration (file, environment, flags)
//! 4. Open the database & run migrations
//! 5. Run the requested command

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    countnote_cli::run()
}
