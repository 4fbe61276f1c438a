use cas_types::{Cid, Identity};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid document: {0}")]
    Validation(#[from] cas_canon::ValidationError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{requester} may not modify {cid}: {reason}")]
    Forbidden {
        cid: Cid,
        requester: Identity,
        reason: cas_gate::DenyReason,
    },

    #[error("stored bytes of {cid} do not match its identifier")]
    Corrupt { cid: Cid },

    #[error("invalid identifier: {0}")]
    InvalidCid(#[from] cas_types::TypeError),

    #[error("hash error: {0}")]
    Hasher(#[from] cas_crypto::HasherError),

    #[error("store error: {0}")]
    Store(cas_store::StoreError),

    #[error("namespace error: {0}")]
    Ref(cas_refs::RefError),

    #[error("config error: {0}")]
    Config(String),
}

impl SdkError {
    /// Returns `true` for the expected "absent" outcomes.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<cas_store::StoreError> for SdkError {
    fn from(e: cas_store::StoreError) -> Self {
        match e {
            cas_store::StoreError::NotFound(cid) => Self::NotFound(cid.to_string()),
            other => Self::Store(other),
        }
    }
}

impl From<cas_refs::RefError> for SdkError {
    fn from(e: cas_refs::RefError) -> Self {
        match e {
            cas_refs::RefError::NotFound { namespace } => Self::NotFound(namespace),
            other => Self::Ref(other),
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
