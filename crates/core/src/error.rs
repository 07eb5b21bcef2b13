//! Error types for configuration and validation

use thiserror::Error;

/// Errors raised while building or validating startup configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration value out of range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Watched path missing or unreadable.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Glob pattern failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;
