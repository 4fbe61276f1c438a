use std::fmt;

use cas_types::Identity;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::strategies::{HandleMatch, NumericIdMatch};
use crate::strategy::{MatchOutcome, MatchStrategy};

/// Why the gate refused a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenyReason {
    /// The object has no recorded author.
    NoRecordedAuthor,
    /// A strategy compared both sides and found them different.
    Mismatch { strategy: String },
    /// No strategy had enough information to compare.
    Indeterminate,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRecordedAuthor => write!(f, "object has no recorded author"),
            Self::Mismatch { strategy } => write!(f, "{strategy} does not match the author"),
            Self::Indeterminate => write!(f, "requester identity cannot be compared with the author"),
        }
    }
}

/// Final decision of the gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateDecision {
    /// The requester is the author, as decided by `strategy`.
    Allow { strategy: String },
    /// The request is refused.
    Deny { reason: DenyReason },
}

impl GateDecision {
    /// Returns `true` if the decision is `Allow`.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }
}

/// Ordered pipeline of [`MatchStrategy`]s.
///
/// Strategies run in order; the first decisive outcome is final. When every
/// strategy is indeterminate, or the list is empty, the gate denies.
pub struct OwnershipGate {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl OwnershipGate {
    /// Numeric-ID comparison, then handle comparison.
    pub fn with_default_strategies() -> Self {
        Self::with_strategies(vec![Box::new(NumericIdMatch), Box::new(HandleMatch)])
    }

    /// Gate with a caller-supplied strategy order.
    pub fn with_strategies(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Append a strategy at the lowest precedence.
    pub fn add_strategy(&mut self, strategy: Box<dyn MatchStrategy>) {
        self.strategies.push(strategy);
    }

    /// Strategy names in evaluation order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Decide whether `requester` may act on an object authored by `stored`.
    pub fn evaluate(&self, stored: Option<&Identity>, requester: &Identity) -> GateDecision {
        let Some(stored) = stored else {
            debug!(requester = %requester, "denied: no recorded author");
            return GateDecision::Deny {
                reason: DenyReason::NoRecordedAuthor,
            };
        };

        for strategy in &self.strategies {
            match strategy.evaluate(stored, requester) {
                MatchOutcome::Matched => {
                    debug!(strategy = strategy.name(), author = %stored, requester = %requester, "allowed");
                    return GateDecision::Allow {
                        strategy: strategy.name().to_string(),
                    };
                }
                MatchOutcome::Mismatched => {
                    debug!(strategy = strategy.name(), author = %stored, requester = %requester, "denied: mismatch");
                    return GateDecision::Deny {
                        reason: DenyReason::Mismatch {
                            strategy: strategy.name().to_string(),
                        },
                    };
                }
                MatchOutcome::Indeterminate => continue,
            }
        }

        debug!(author = %stored, requester = %requester, "denied: indeterminate");
        GateDecision::Deny {
            reason: DenyReason::Indeterminate,
        }
    }

    /// Boolean form of [`evaluate`](Self::evaluate).
    pub fn authorize(&self, stored: Option<&Identity>, requester: &Identity) -> bool {
        self.evaluate(stored, requester).is_allowed()
    }
}

impl Default for OwnershipGate {
    fn default() -> Self {
        Self::with_default_strategies()
    }
}

impl fmt::Debug for OwnershipGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnershipGate")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
