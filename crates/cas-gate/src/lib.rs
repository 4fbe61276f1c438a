//! Ownership gate for CAS.
//!
//! Destructive operations on an object are allowed only for its recorded
//! author. The gate compares the stored author against the requester using an
//! ordered list of match strategies; the first strategy that can decide wins.
//!
//! The default order is:
//!
//! 1. [`NumericIdMatch`]: if both sides carry a platform numeric ID, compare
//!    those and ignore handles entirely.
//! 2. [`HandleMatch`]: otherwise compare human-readable handles.
//!
//! If no strategy can decide, or the object has no recorded author, the gate
//! denies. It never fails open.
//!
//! # Quick Start
//!
//! ```rust
//! use cas_gate::OwnershipGate;
//! use cas_types::Identity;
//!
//! let gate = OwnershipGate::default();
//! let author = Identity::new("alice", 123);
//! assert!(gate.authorize(Some(&author), &Identity::new("alice-renamed", 123)));
//! assert!(!gate.authorize(Some(&author), &Identity::new("alice", 456)));
//! assert!(!gate.authorize(None, &Identity::new("alice", 123)));
//! ```

pub mod gate;
pub mod strategies;
pub mod strategy;

// Re-exports for convenience.
pub use gate::{DenyReason, GateDecision, OwnershipGate};
pub use strategies::handle::HandleMatch;
pub use strategies::numeric_id::NumericIdMatch;
pub use strategy::{MatchOutcome, MatchStrategy};
