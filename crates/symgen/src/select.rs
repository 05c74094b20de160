//! Greedy selection of point-group generators.
//!
//! Candidates are offered in strategy order; one is kept only if the closure
//! of the generators chosen so far misses it. A fixpoint pass then drops any
//! generator the others already produce. The result is minimal under
//! single-element removal, not necessarily globally minimum.

use crate::algebra::Operator;
use crate::closure::products;
use crate::ordering::CandidateOrdering;

/// Small generating set whose closure covers every candidate coset.
pub fn select_generators(
    dimension: usize,
    candidates: &[Operator],
    ordering: &dyn CandidateOrdering,
) -> Vec<Operator> {
    let mut sorted = candidates.to_vec();
    ordering.order(&mut sorted);

    tracing::debug!(candidates = sorted.len(), "initial guess");
    let mut gens: Vec<Operator> = Vec::new();
    for op in sorted {
        if !products(dimension, &gens).contains(&op) {
            gens.push(op);
        }
    }

    tracing::debug!(generators = gens.len(), "removing redundancies");
    remove_redundant(dimension, &mut gens);
    gens
}

/// Drop generators reproduced by the others until none is.
pub fn remove_redundant(dimension: usize, gens: &mut Vec<Operator>) {
    while let Some(i) = (0..gens.len()).find(|&i| is_redundant(dimension, gens, i)) {
        tracing::trace!(removed = %gens[i].symbol(), "redundant generator");
        gens.remove(i);
    }
}

/// Whether `gens[i]` lies in the closure of the remaining generators.
pub fn is_redundant(dimension: usize, gens: &[Operator], i: usize) -> bool {
    let rest: Vec<Operator> = gens
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(_, g)| g.clone())
        .collect();
    products(dimension, &rest).contains(&gens[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::{PriorityOrdering, ShuffledOrdering};

    fn ops(symbols: &[&str]) -> Vec<Operator> {
        symbols.iter().map(|s| Operator::parse_symbol(s).unwrap()).collect()
    }

    #[test]
    fn trivial_group_needs_no_generators() {
        let gens = select_generators(2, &ops(&["x,y"]), &PriorityOrdering);
        assert!(gens.is_empty());
    }

    #[test]
    fn square_rotation_group_needs_one() {
        let cands = ops(&["x,y", "-x,-y", "-y,x", "y,-x"]);
        let gens = select_generators(2, &cands, &PriorityOrdering);
        assert_eq!(gens.len(), 1);
        assert_eq!(gens[0].operator_type().order, 4);
    }

    #[test]
    fn redundancy_pass_drops_reproduced_generators() {
        // the 2-fold rotation is the square of the 4-fold
        let mut gens = ops(&["-x,-y", "-y,x", "-x,y"]);
        remove_redundant(2, &mut gens);
        assert_eq!(gens, ops(&["-y,x", "-x,y"]));
    }

    #[test]
    fn shuffled_selection_still_generates_everything() {
        let cands = ops(&["x,y", "-x,-y", "-y,x", "y,-x", "-x,y", "x,-y", "y,x", "-y,-x"]);
        for seed in 0..8 {
            let gens = select_generators(2, &cands, &ShuffledOrdering { seed });
            let closure = products(2, &gens);
            assert!(cands.iter().all(|c| closure.contains(c)), "seed {seed}");
            assert!((0..gens.len()).all(|i| !is_redundant(2, &gens, i)), "seed {seed}");
        }
    }
}
