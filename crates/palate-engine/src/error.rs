//! Error types for engine operations

use thiserror::Error;

/// Errors that can occur during engine operations
///
/// Only `InvalidInput` is ever returned from a ranking operation, and
/// `Config` from construction. `DataUnavailable` is raised by the read
/// layer and replaced by that read's default before it leaves the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Malformed or missing identifier
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A store read failed, panicked or timed out
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
