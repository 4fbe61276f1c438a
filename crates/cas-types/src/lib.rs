//! Foundation types for the content-addressed document store (CAS).
//!
//! This crate provides the identifier and identity types shared by every
//! other CAS crate.
//!
//! # Key Types
//!
//! - [`Cid`]: Validated, self-describing content identifier (CIDv1, base32)
//! - [`Identity`]: Author or requester identity (handle and/or numeric ID)
//! - [`TypeError`]: Parse failures for the types above

pub mod content_id;
pub mod error;
pub mod identity;

pub use content_id::Cid;
pub use error::TypeError;
pub use identity::Identity;
