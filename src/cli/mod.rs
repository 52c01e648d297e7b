//! CLI module for roster
//!
//! Provides command-line interface for:
//! - init: Write a default config and create the database schema
//! - serve: Boot the HTTP server and enter the serving loop

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve};
pub use errors::{CliError, CliResult};
