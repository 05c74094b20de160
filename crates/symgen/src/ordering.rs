//! Candidate ordering strategies for the greedy generator search.
//!
//! The order in which candidates are offered decides which generators the
//! greedy pass keeps. The priority key is an empirical heuristic, so it sits
//! behind a trait and alternatives can be benchmarked against it.

use std::cmp::Reverse;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::algebra::{Operator, OperatorType};

/// Reorders a candidate list in place before the greedy pass.
pub trait CandidateOrdering {
    fn order(&self, candidates: &mut [Operator]);
}

/// Higher order first, then orientation-preserving, then clockwise.
/// Stable: ties keep their input order.
#[derive(Clone, Copy, Debug, Default)]
pub struct PriorityOrdering;

impl CandidateOrdering for PriorityOrdering {
    fn order(&self, candidates: &mut [Operator]) {
        candidates.sort_by_cached_key(|op| {
            let t = OperatorType::of(op);
            (Reverse(t.order), !t.orientation_preserving, !t.clockwise)
        });
    }
}

/// Like `PriorityOrdering` but orientation-reversing operators come first
/// within an order. This is the key the legacy batch tables were produced
/// with; kept for comparison runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LegacyOrdering;

impl CandidateOrdering for LegacyOrdering {
    fn order(&self, candidates: &mut [Operator]) {
        candidates.sort_by_cached_key(|op| {
            let t = OperatorType::of(op);
            (Reverse(t.order), t.orientation_preserving, !t.clockwise)
        });
    }
}

/// Seeded random permutation; a baseline for the heuristics above.
#[derive(Clone, Copy, Debug)]
pub struct ShuffledOrdering {
    pub seed: u64,
}

impl CandidateOrdering for ShuffledOrdering {
    fn order(&self, candidates: &mut [Operator]) {
        let mut rng = StdRng::seed_from_u64(self.seed);
        candidates.shuffle(&mut rng);
    }
}

/// Strategy selector carried by `GenerateCfg`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderingStrategy {
    #[default]
    Priority,
    Legacy,
    Shuffled {
        seed: u64,
    },
}

impl OrderingStrategy {
    pub fn as_ordering(&self) -> Box<dyn CandidateOrdering> {
        match *self {
            OrderingStrategy::Priority => Box::new(PriorityOrdering),
            OrderingStrategy::Legacy => Box::new(LegacyOrdering),
            OrderingStrategy::Shuffled { seed } => Box::new(ShuffledOrdering { seed }),
        }
    }
}
