//! CLI argument definitions using clap
//!
//! Commands:
//! - roster init --config <path>
//! - roster serve --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// roster - a minimal, self-hostable user directory service
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file and create the database schema
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./roster.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./roster.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
