//! Error types for the CLI application.
//!
//! Every command handler returns `Result<(), CliError>`; [`crate::run`] maps
//! the error to an exit code.
//!
//! ## Batch Validation Errors
//!
//! `BatchValidationError<T>` collects per-item failures for commands that
//! walk many records (verify) so that one bad line does not hide the rest.

use std::fmt;

use fivepiles_engine::errors::GameError;
use thiserror::Error;

use crate::config::ConfigError;

/// Custom error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid user input or command-line arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A move the rules engine refused
    #[error("Engine error: {0}")]
    Engine(#[from] GameError),

    /// Operation was stopped before it finished (quit, closed input)
    #[error("Interrupted: {0}")]
    Interrupted(String),
}

/// Generic error type for batch validation operations.
///
/// # Examples
///
/// ```rust
/// use fivepiles_cli::BatchValidationError;
///
/// let error = BatchValidationError {
///     item_context: 5,
///     message: "recorded result differs from replay".to_string(),
/// };
/// assert_eq!(error.to_string(), "5: recorded result differs from replay");
/// ```
#[derive(Debug)]
pub struct BatchValidationError<T> {
    /// Context identifying the item that failed validation
    pub item_context: T,
    pub message: String,
}

impl<T: fmt::Display> fmt::Display for BatchValidationError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item_context, self.message)
    }
}
