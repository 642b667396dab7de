//! Error handling for the `rstdp-sim` binary.

use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI-layer errors: everything from the runtime wrapped, plus argument and
/// config problems that never reach the simulation core.
#[derive(Error, Debug)]
pub enum CliError {
    /// A runtime (driver/control/command) error.
    #[error("runtime error: {0}")]
    Runtime(#[from] rstdp_runtime::RuntimeError),

    /// A `Params` value failed validation before the driver was built.
    #[error("core error: {0}")]
    Core(#[from] rstdp_core::CoreError),

    /// An IO fault opening the log file, config file, or snapshot stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The optional TOML config overlay failed to parse.
    #[error("invalid config file: {0}")]
    Config(String),

    /// Command-line arguments were individually well-formed but mutually
    /// inconsistent.
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }
}
