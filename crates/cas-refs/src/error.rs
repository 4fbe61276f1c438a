//! Error types for namespace operations.

use thiserror::Error;

/// Errors that can occur during namespace operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// The namespace has never been updated.
    #[error("namespace not found: {namespace}")]
    NotFound { namespace: String },

    /// An owner or slug is not a safe name.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A pointer or history record could not be parsed.
    #[error("corrupt namespace {namespace}: {reason}")]
    Corrupt { namespace: String, reason: String },

    /// A lock guarding namespace state was poisoned by a panicking writer.
    #[error("namespace lock poisoned: {0}")]
    Poisoned(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error during file-based namespace operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for namespace operations.
pub type Result<T> = std::result::Result<T, RefError>;
