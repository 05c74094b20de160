//! Completion of the translation lattice.
//!
//! Purpose
//! - The closure of the point-group generators only yields the translations
//!   that fall out of products. For centered settings (and for the trivial and
//!   polar groups) more lattice vectors must be added explicitly.
//!
//! Model
//! - A translation set `T` is judged through `conj(T)`: its images under all
//!   linear parts of the group. The lattice must be invariant under the point
//!   group, so rank and covolume are measured on that symmetrized set.
//! - A vector `v` improves `T` if it raises `rank(conj(T))` while that is below
//!   `d`, or lowers `covolume(conj(T))` once the rank is full.
//! - Primitive-cell vectors are offered in two passes: a vector rejected while
//!   the rank was deficient may become useful once the rank is full.
//! - Pruning runs the same test in reverse on the vectors completion added.

use std::collections::HashSet;

use nalgebra::{DMatrix, DVector};

use crate::algebra::{Operator, Q};
use crate::closure::products;
use crate::linalg;

/// Translations known after completion.
#[derive(Clone, Debug, Default)]
pub struct Completion {
    /// Produced by the closure of the point-group generators.
    pub implied: Vec<DVector<Q>>,
    /// Added from the primitive cell.
    pub added: Vec<DVector<Q>>,
}

impl Completion {
    /// `implied` followed by `added`.
    pub fn all(&self) -> Vec<DVector<Q>> {
        self.implied.iter().chain(&self.added).cloned().collect()
    }
}

/// Images of every vector under every linear part in `ops`, deduplicated.
pub fn conjugates(vectors: &[DVector<Q>], ops: &[Operator]) -> Vec<DVector<Q>> {
    let mut seen: HashSet<Vec<Q>> = HashSet::new();
    let mut out = Vec::new();
    for v in vectors {
        for a in ops {
            let w = a.apply_linear(v);
            if seen.insert(w.iter().copied().collect()) {
                out.push(w);
            }
        }
    }
    out
}

/// Rank and covolume of `conj(vectors)`.
pub fn measure(vectors: &[DVector<Q>], ops: &[Operator]) -> (usize, Q) {
    let conj = conjugates(vectors, ops);
    (linalg::rank(&conj), linalg::covolume(&conj))
}

/// Whether adding `v` to `t` enlarges the symmetrized lattice.
pub fn improves(dimension: usize, v: &DVector<Q>, t: &[DVector<Q>], ops: &[Operator]) -> bool {
    let conj0 = conjugates(t, ops);
    let mut extended = t.to_vec();
    extended.push(v.clone());
    let conj1 = conjugates(&extended, ops);

    let r0 = linalg::rank(&conj0);
    if r0 < dimension {
        linalg::rank(&conj1) > r0
    } else {
        linalg::covolume(&conj1) < linalg::covolume(&conj0)
    }
}

/// Seed with the closure translations of `generators`, then offer the rows of
/// `cell` (`passes` times) and keep those that improve the set.
pub fn complete_lattice(
    dimension: usize,
    generators: &[Operator],
    ops: &[Operator],
    cell: &DMatrix<Q>,
    passes: usize,
) -> Completion {
    let implied = products(dimension, generators).translations;
    let mut t = implied.clone();
    let basis = linalg::matrix_rows(cell);

    for pass in 0..passes {
        for v in &basis {
            if improves(dimension, v, &t, ops) {
                tracing::trace!(pass, vector = ?v.as_slice(), "adding translation");
                t.push(v.clone());
            }
        }
    }

    let added = t.split_off(implied.len());
    Completion { implied, added }
}

/// Remove added vectors that the rest of the set already accounts for, one at
/// a time, until none is left. Implied vectors are never removed: the point
/// generators produce them anyway.
pub fn prune_translations(dimension: usize, completion: &mut Completion, ops: &[Operator]) {
    loop {
        let redundant = (0..completion.added.len()).find(|&i| {
            let rest: Vec<DVector<Q>> = completion
                .implied
                .iter()
                .chain(
                    completion
                        .added
                        .iter()
                        .enumerate()
                        .filter(|&(j, _)| j != i)
                        .map(|(_, v)| v),
                )
                .cloned()
                .collect();
            !improves(dimension, &completion.added[i], &rest, ops)
        });
        match redundant {
            Some(i) => {
                let v = completion.added.remove(i);
                tracing::trace!(vector = ?v.as_slice(), "redundant translation");
            }
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    fn ops(symbols: &[&str]) -> Vec<Operator> {
        symbols.iter().map(|s| Operator::parse_symbol(s).unwrap()).collect()
    }

    fn q(n: i64, d: i64) -> Q {
        Q::new(n, d)
    }

    fn unit_cell(d: usize) -> DMatrix<Q> {
        DMatrix::identity(d, d)
    }

    #[test]
    fn trivial_group_takes_both_unit_vectors() {
        let group = ops(&["x,y"]);
        let c = complete_lattice(2, &[], &group, &unit_cell(2), 2);
        assert!(c.implied.is_empty());
        assert_eq!(c.added, vec![dvector![q(1, 1), q(0, 1)], dvector![q(0, 1), q(1, 1)]]);
    }

    #[test]
    fn square_rotation_needs_a_single_vector() {
        let group = ops(&["x,y", "-y,x", "-x,-y", "y,-x"]);
        let c = complete_lattice(2, &ops(&["-y,x"]), &group, &unit_cell(2), 2);
        assert_eq!(c.added, vec![dvector![q(1, 1), q(0, 1)]]);
        assert_eq!(measure(&c.all(), &group), (2, q(1, 1)));
    }

    #[test]
    fn centered_cell_is_recovered() {
        let group = ops(&["x,y", "-x,y"]);
        let cell = DMatrix::from_row_slice(2, 2, &[q(1, 2), q(1, 2), q(0, 1), q(1, 1)]);
        let c = complete_lattice(2, &ops(&["-x,y"]), &group, &cell, 2);
        assert_eq!(c.added, vec![dvector![q(1, 2), q(1, 2)]]);
        assert_eq!(measure(&c.all(), &group), (2, q(1, 2)));
    }

    #[test]
    fn glide_contributes_implied_translation() {
        let group = ops(&["x,y", "-x,y+1/2"]);
        let c = complete_lattice(2, &ops(&["-x,y+1/2"]), &group, &unit_cell(2), 2);
        assert_eq!(c.implied, vec![dvector![q(0, 1), q(1, 1)]]);
        assert_eq!(c.added, vec![dvector![q(1, 1), q(0, 1)]]);
    }

    #[test]
    fn second_pass_catches_vectors_rejected_at_low_rank() {
        // (0,1) only lies in the span of (0,2) when first offered; once (1,1)
        // makes the rank full, the second pass accepts it and halves the covolume.
        let group = ops(&["x,y"]);
        let cell = DMatrix::from_row_slice(
            3,
            2,
            &[q(0, 1), q(2, 1), q(0, 1), q(1, 1), q(1, 1), q(1, 1)],
        );
        let one_pass = complete_lattice(2, &[], &group, &cell, 1);
        let two_pass = complete_lattice(2, &[], &group, &cell, 2);
        assert_eq!(measure(&one_pass.all(), &group), (2, q(2, 1)));
        assert_eq!(measure(&two_pass.all(), &group), (2, q(1, 1)));
    }

    #[test]
    fn pruning_removes_vectors_made_redundant_later() {
        let group = ops(&["x,y"]);
        let mut c = Completion {
            implied: vec![],
            added: vec![
                dvector![q(1, 1), q(1, 1)],
                dvector![q(1, 1), q(0, 1)],
                dvector![q(0, 1), q(1, 1)],
            ],
        };
        prune_translations(2, &mut c, &group);
        assert_eq!(c.added.len(), 2);
        assert_eq!(measure(&c.all(), &group), (2, q(1, 1)));
    }

    #[test]
    fn pruning_keeps_implied_vectors() {
        let group = ops(&["x,y", "-x,y+1/2"]);
        let mut c = Completion {
            implied: vec![dvector![q(0, 1), q(1, 1)]],
            added: vec![dvector![q(1, 1), q(0, 1)], dvector![q(0, 1), q(1, 1)]],
        };
        prune_translations(2, &mut c, &group);
        assert_eq!(c.implied.len(), 1);
        assert_eq!(c.added, vec![dvector![q(1, 1), q(0, 1)]]);
    }
}
