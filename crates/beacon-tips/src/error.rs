//! Error types for beacon-tips.

use thiserror::Error;

/// Result type for beacon-tips operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur at the edges of the tip engine.
///
/// The engine itself never propagates these from a tick; they come out of
/// parsing and out of [`KeyValueStore`](crate::KeyValueStore) implementations.
#[derive(Debug, Error)]
pub enum Error {
    /// Backing store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Platform name not recognised
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    /// Scope name not recognised
    #[error("unknown scope: {0}")]
    UnknownScope(String),

    /// Malformed tip identifier or qualified tip name
    #[error("invalid tip: {0}")]
    InvalidTip(String),
}
