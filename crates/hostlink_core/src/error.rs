//! # Bridge Error Types
//!
//! All errors that can surface from the bridge plumbing.
//!
//! None of them is fatal: callers log and fall through. The only intentional
//! shutdown path is a user-confirmed destroy request, which is a signal, not an
//! error.

use thiserror::Error;

/// Errors that can occur in the bridge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The UI executor is gone or not accepting tasks yet.
    #[error("UI executor unavailable")]
    UiUnavailable,

    /// A blocking operation was requested from the UI thread itself.
    #[error("blocking call from the UI thread would deadlock: {operation}")]
    CalledFromUiThread {
        /// The operation that was refused.
        operation: &'static str,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("cannot read config {path}: {reason}")]
    ConfigIo {
        /// Path that was read.
        path: String,
        /// Underlying IO error text.
        reason: String,
    },

    /// The configuration file is not valid TOML for `BridgeConfig`.
    #[error("cannot parse config: {0}")]
    ConfigParse(String),

    /// The dedicated UI thread could not be started.
    #[error("cannot spawn thread: {0}")]
    ThreadSpawn(String),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
