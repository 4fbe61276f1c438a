//! Namespace pointers for CAS.
//!
//! A namespace is a human-chosen `(owner, slug)` pair. Each namespace has a
//! mutable "latest" pointer to one immutable object and an append-only
//! history of every CID it has pointed to.
//!
//! # Architecture
//!
//! - **Latest** is overwritten unconditionally; the last writer wins and
//!   there is no optimistic-lock token.
//! - **History** is a superseded-value log: entries are only ever appended,
//!   never rewritten or reordered, and read back oldest-first.
//! - Pointer updates and history appends are not transactionally coupled.
//!   Callers that want "latest is always in history" append first.
//!
//! # Modules
//!
//! - [`error`]: Error types for namespace operations
//! - [`types`]: [`Namespace`] and [`HistoryEntry`]
//! - [`traits`]: The [`NamespaceStore`] trait defining the storage interface
//! - [`names`]: Owner/slug validation
//! - [`fs`]: [`FsNamespaceStore`] on the local filesystem
//! - [`memory`]: In-memory [`InMemoryNamespaceStore`] for tests

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use fs::FsNamespaceStore;
pub use memory::InMemoryNamespaceStore;
pub use names::validate_name;
pub use traits::NamespaceStore;
pub use types::{HistoryEntry, Namespace};
