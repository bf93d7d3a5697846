//! Error types for the animated button.

use std::time::Duration;
use thiserror::Error;

/// Errors talking to a button runtime.
#[derive(Debug, Error)]
pub enum ButtonError {
    /// Channel communication error.
    #[error("Channel error: {0}")]
    Channel(String),

    /// The runtime thread could not be started.
    #[error("Failed to spawn button runtime: {0}")]
    Spawn(String),

    /// The runtime thread has shut down.
    #[error("Button runtime unavailable")]
    RuntimeUnavailable,

    /// The runtime did not answer in time. Animations themselves never time out.
    #[error("Button runtime did not reply within {duration:?}")]
    Timeout { duration: Duration },
}

/// Errors from the transition runner.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunnerError {
    /// A session is still outstanding.
    #[error("Transition already in flight (session {session})")]
    InFlight { session: u64 },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}
