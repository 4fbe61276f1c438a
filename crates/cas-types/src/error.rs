use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid content identifier {input:?}: {reason}")]
    InvalidCid { input: String, reason: String },

    #[error("unsupported CID version in {0:?}: only CIDv1 is accepted")]
    UnsupportedVersion(String),

    #[error("non-canonical CID text {input:?}, expected {expected:?}")]
    NonCanonical { input: String, expected: String },
}
