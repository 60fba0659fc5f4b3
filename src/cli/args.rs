//! CLI argument definitions using clap
//!
//! Commands:
//! - agrifarm serve --config <path> [--port <port>]
//! - agrifarm migrate --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Technology registry for the agriculture farm API
#[derive(Parser, Debug)]
#[command(name = "agrifarm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./agrifarm.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Path to configuration file
        #[arg(long, default_value = "./agrifarm.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
