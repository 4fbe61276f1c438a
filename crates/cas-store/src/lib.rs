//! Content-addressed object storage for CAS.
//!
//! Every saved document is stored as an immutable object keyed by its
//! [`Cid`](cas_types::Cid): the raw bytes as submitted, the canonical bytes
//! the CID was derived from, and an optional author record.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FsObjectStore`] -- one directory on the local filesystem
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. `put` on an existing CID is a silent no-op.
//! 3. Writes go to a temporary file and are renamed into place, so readers
//!    never observe a partially written object.
//! 4. `delete` is unconditional here; ownership checks live in `cas-gate`.
//! 5. The store never interprets object contents.
//! 6. All I/O errors are propagated, never silently ignored or retried.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{ObjectMeta, StoredObject};
pub use traits::ObjectStore;
