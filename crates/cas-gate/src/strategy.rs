use cas_types::Identity;
use serde::{Deserialize, Serialize};

/// The outcome of a single match strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Both sides are comparable and equal.
    Matched,
    /// Both sides are comparable and differ.
    Mismatched,
    /// At least one side lacks what this strategy compares.
    Indeterminate,
}

impl MatchOutcome {
    /// Returns `true` if the strategy reached a verdict.
    pub fn is_decisive(&self) -> bool {
        !matches!(self, Self::Indeterminate)
    }
}

/// One way of deciding whether a requester is the stored author.
///
/// Strategies are evaluated in order by the
/// [`OwnershipGate`](crate::OwnershipGate). A strategy must return
/// `Indeterminate` whenever it cannot compare, so the next one gets a turn.
///
/// The trait is object-safe and `Send + Sync` so strategies can be stored in
/// a `Vec<Box<dyn MatchStrategy>>`.
pub trait MatchStrategy: Send + Sync {
    /// Human-readable name of this strategy (e.g., "numeric-id").
    fn name(&self) -> &str;

    /// Compare the stored author with the requester.
    fn evaluate(&self, stored: &Identity, requester: &Identity) -> MatchOutcome;
}
