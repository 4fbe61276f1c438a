//! Content identifier derivation for CAS.
//!
//! Turns canonical document bytes into a self-describing [`Cid`]:
//!
//! ```text
//! multibase-b32( 0x01 ‖ varint(codec) ‖ varint(hash code) ‖ varint(len) ‖ digest )
//! ```
//!
//! Derivation is pure and has no I/O. Any implementation that hashes the same
//! canonical bytes with the same algorithm and codec produces the same string.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.
//!
//! [`Cid`]: cas_types::Cid

pub mod alg;
pub mod hasher;

pub use alg::HashAlg;
pub use hasher::{ContentHasher, HasherError};
