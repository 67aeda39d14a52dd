//! Error types for the updater
//!
//! Post-startup errors are all recoverable: the scheduling loop logs them
//! and waits for the next tick. Only [`Error::Config`] is fatal, and only
//! at startup.

use thiserror::Error;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the updater
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration, fatal at startup
    #[error("configuration error: {0}")]
    Config(String),

    /// Network or decode failure talking to a remote endpoint
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote API reported a failure or answered with a bad status
    #[error("provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// No address record matched the configured name
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// The discovery service offered neither an IPv4 nor an IPv6 address
    #[error("no public address available")]
    NoAddress,
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a "record not found" error
    pub fn record_not_found(name: impl Into<String>) -> Self {
        Self::RecordNotFound(name.into())
    }
}
