//! Error types for the simulation driver

use thiserror::Error;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors that can occur while driving the simulation loop
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A fault raised by the tick engine itself
    #[error("core error: {0}")]
    Core(#[from] rstdp_core::CoreError),

    /// A transient I/O fault at a boundary (snapshot or log sink)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A command line from the host boundary could not be parsed
    #[error("invalid command: {line}")]
    InvalidCommand {
        /// The offending line, verbatim
        line: String,
    },
}

impl RuntimeError {
    /// Create an invalid-command error
    pub fn invalid_command(line: impl Into<String>) -> Self {
        Self::InvalidCommand { line: line.into() }
    }
}
