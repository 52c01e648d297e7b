//! CLI-specific error types
//!
//! Every CLI failure is fatal: the error is printed to stderr by main
//! and the process exits non-zero.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::db::StoreError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be read, parsed, or validated
    #[error("config error ({path}): {message}")]
    Config { path: PathBuf, message: String },

    /// The user store could not be opened
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The server failed to bind or serve
    #[error("server error: {0}")]
    Server(#[from] io::Error),
}

impl CliError {
    /// Config error for the given file
    pub fn config(path: &Path, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}
