//! CLI module
//!
//! Provides command-line interface for:
//! - serve: Boot storage and the HTTP server
//! - migrate: Bring the SQLite schema up to date

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{migrate, run_command, serve};
pub use errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command).await
}
