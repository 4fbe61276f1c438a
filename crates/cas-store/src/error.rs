use cas_types::Cid;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(Cid),

    /// The object exists but has no recorded author.
    #[error("no author recorded for object {0}")]
    AuthorNotFound(Cid),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The object's files are incomplete or unreadable.
    #[error("corrupt object {cid}: {reason}")]
    CorruptObject { cid: Cid, reason: String },

    /// An in-memory backend lock was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

impl StoreError {
    /// Returns `true` for the expected "absent" outcomes.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::AuthorNotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
