//! High-level SDK for CAS, the content-addressed document store.
//!
//! [`Repository`] is the entry point for applications embedding CAS. It
//! canonicalizes incoming JSON documents, derives their content identifiers,
//! stores them idempotently, tracks per-`(owner, slug)` latest pointers and
//! history, and gates deletion on authorship.
//!
//! ```rust
//! use cas_sdk::{Identity, Repository, RepositoryConfig};
//!
//! let repo = Repository::in_memory(RepositoryConfig::default());
//! let author = Identity::new("alice", 123);
//! let cid = repo
//!     .publish("alice", "note1", br#"{"@context":"https://schema.org","b":2,"a":1}"#, &author)
//!     .unwrap();
//!
//! assert_eq!(repo.read_latest("alice", "note1").unwrap(), cid);
//! assert!(repo.delete(&cid, &Identity::new("mallory", 456)).is_err());
//! ```

pub mod config;
pub mod error;
pub mod repository;

pub use config::RepositoryConfig;
pub use error::{SdkError, SdkResult};
pub use repository::Repository;

// Re-export key types
pub use cas_canon::{CanonConfig, Document, ValidationError};
pub use cas_crypto::HashAlg;
pub use cas_gate::{DenyReason, OwnershipGate};
pub use cas_refs::HistoryEntry;
pub use cas_types::{Cid, Identity};
