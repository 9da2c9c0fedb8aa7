//! Command-line interface definition and parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the catalog server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, env = "APP_CONFIG")]
    pub config: Option<PathBuf>,

    /// What to do; defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// The subcommands of the catalog server.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server.
    Serve {
        /// Load the sample products before accepting requests.
        #[arg(long)]
        seed: bool,
    },
    /// Replace the catalog's contents with the sample products, then exit.
    Seed,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn import() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// The requested subcommand, falling back to serving without seeding.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve { seed: false })
    }
}
