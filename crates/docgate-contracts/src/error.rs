//! Error types for the docgate hook layer.
//!
//! Schema violations and logging I/O failures are deliberately absent here:
//! the former become deny decisions, the latter are counted by the logger.
//! What remains are failures that abort setup or an offline replay.

use thiserror::Error;

/// The unified error type for docgate.
#[derive(Debug, Error)]
pub enum DocgateError {
    /// The requested agent role is not one the composer knows how to wire.
    #[error("unknown agent role '{role}'")]
    UnknownAgentRole { role: String },

    /// A log destination could not be created or opened.
    #[error("failed to set up log destination '{path}': {reason}")]
    LogSetup { path: String, reason: String },

    /// A structured log line could not be parsed back into a record.
    #[error("malformed tool log at line {line}: {reason}")]
    MalformedLog { line: usize, reason: String },

    /// A hook configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A filesystem operation outside the audit sinks failed.
    #[error("io error: {reason}")]
    Io { reason: String },
}

/// Convenience alias used throughout the docgate crates.
pub type DocgateResult<T> = Result<T, DocgateError>;
