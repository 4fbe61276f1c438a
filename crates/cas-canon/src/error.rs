use thiserror::Error;

/// Reasons a document is rejected before it can be canonicalized.
///
/// Every variant is raised before hashing or storage work starts and is
/// never worth retrying: the same input always fails the same way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The raw input exceeds the configured size limit.
    #[error("document is {size} bytes, exceeding the {limit}-byte limit")]
    TooLarge { size: usize, limit: usize },

    /// The raw input is not well-formed JSON.
    #[error("malformed JSON: {0}")]
    Parse(String),

    /// The document root is not an object.
    #[error("document root must be an object, found {found}")]
    RootNotObject { found: &'static str },

    /// The schema-context field is absent.
    #[error("missing schema-context field {field:?}")]
    MissingContext { field: String },

    /// The schema-context field has an unsupported shape.
    #[error("schema-context field {field:?} must be a string, object, or array, found {found}")]
    InvalidContext { field: String, found: &'static str },

    /// Containers are nested deeper than the configured limit.
    #[error("nesting depth exceeds {limit} at {path}")]
    DepthExceeded { limit: usize, path: String },

    /// An object key contains a disallowed control character.
    #[error("key {key:?} at {path} contains control character U+{code:04X}")]
    InvalidKey { path: String, key: String, code: u32 },

    /// Writing the canonical bytes failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for canonicalization.
pub type CanonResult<T> = Result<T, ValidationError>;
