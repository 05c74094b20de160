//! Product closure of a generator set modulo the integer lattice.
//!
//! `products` is the oracle behind both the generator selection and the
//! translation completion. It is recomputed from scratch for every seed set;
//! the cost is bounded by (number of cosets) × (number of generators).

use std::collections::{HashSet, VecDeque};

use nalgebra::DVector;

use crate::algebra::{is_zero, mod_z_vec, Operator, Q};

/// Result of one closure run.
///
/// Invariants:
/// - `cosets` are lattice-reduced, start with the identity and contain no
///   other operator with identity linear part.
/// - `translations` are distinct; each is either lattice-reduced and nonzero,
///   or a nonzero integer vector met before reduction.
#[derive(Clone, Debug)]
pub struct Closure {
    pub cosets: Vec<Operator>,
    pub translations: Vec<DVector<Q>>,
    members: HashSet<Operator>,
}

impl Closure {
    /// Membership of the coset of `op`.
    pub fn contains(&self, op: &Operator) -> bool {
        self.members.contains(&op.mod_z())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cosets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cosets.is_empty()
    }
}

/// Breadth-first closure of `generators` (plus the identity) under
/// composition, modulo integer translations. Products with identity linear
/// part are not cosets; their translations are collected instead.
pub fn products(dimension: usize, generators: &[Operator]) -> Closure {
    let one = Operator::identity(dimension);

    let mut cosets = vec![one.clone()];
    let mut members = HashSet::from([one.clone()]);
    let mut translations: Vec<DVector<Q>> = Vec::new();
    let mut seen_translations: HashSet<Vec<Q>> = HashSet::new();
    let mut queue = VecDeque::from([one]);

    while let Some(a) = queue.pop_front() {
        for b in generators {
            let ab = a.compose(b);
            if ab.is_translation() {
                let t = ab.translation_part();
                let reduced = mod_z_vec(t);
                let found = if is_zero(&reduced) {
                    if is_zero(t) {
                        continue;
                    }
                    t.clone()
                } else {
                    reduced
                };
                if seen_translations.insert(found.iter().copied().collect()) {
                    translations.push(found);
                }
            } else {
                let ab = ab.mod_z();
                if !members.contains(&ab) {
                    members.insert(ab.clone());
                    cosets.push(ab.clone());
                    queue.push_back(ab);
                }
            }
        }
    }

    tracing::trace!(
        generators = generators.len(),
        cosets = cosets.len(),
        translations = translations.len(),
        "closure"
    );
    Closure {
        cosets,
        translations,
        members,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;
    use proptest::prelude::*;

    fn op(s: &str) -> Operator {
        Operator::parse_symbol(s).unwrap()
    }

    fn q(n: i64, d: i64) -> Q {
        Q::new(n, d)
    }

    #[test]
    fn empty_generators_give_identity_only() {
        let c = products(2, &[]);
        assert_eq!(c.cosets, vec![Operator::identity(2)]);
        assert!(c.translations.is_empty());
    }

    #[test]
    fn four_fold_rotation_closes_to_cyclic_group() {
        let c = products(2, &[op("-y,x")]);
        assert_eq!(c.len(), 4);
        for s in ["x,y", "-y,x", "-x,-y", "y,-x"] {
            assert!(c.contains(&op(s)), "missing {s}");
        }
        assert!(!c.contains(&op("-x,y")));
        assert!(c.translations.is_empty());
    }

    #[test]
    fn glide_squares_to_integer_translation() {
        let c = products(2, &[op("-x,y+1/2")]);
        assert_eq!(c.len(), 2);
        assert_eq!(c.translations, vec![dvector![q(0, 1), q(1, 1)]]);
    }

    #[test]
    fn centering_translation_is_reported_reduced() {
        // mirror and a shifted copy of it differ by a centering vector
        let c = products(2, &[op("-x,y"), op("-x+1/2,y+1/2")]);
        assert_eq!(c.len(), 3);
        assert!(c.contains(&op("-x+1/2,y-1/2")));
        assert!(c.translations.contains(&dvector![q(1, 2), q(1, 2)]));
    }

    #[test]
    fn membership_reduces_query() {
        let c = products(2, &[op("-x+1/2,-y")]);
        assert!(c.contains(&op("-x-1/2,-y+3")));
    }

    // Toy point group: the 8 symmetries of the square, with optional half shifts.
    fn toy_operator() -> impl Strategy<Value = Operator> {
        let linear = prop::sample::select(vec![
            "x,y", "-y,x", "-x,-y", "y,-x", "-x,y", "x,-y", "y,x", "-y,-x",
        ]);
        (linear, 0i64..2, 0i64..2).prop_map(|(l, a, b)| {
            let g = op(l);
            Operator::new(g.linear, dvector![q(a, 2), q(b, 2)])
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn closure_is_a_fixpoint(gens in prop::collection::vec(toy_operator(), 0..4)) {
            let c = products(2, &gens);
            for a in &c.cosets {
                for b in &gens {
                    let ab = a.compose(b);
                    if !ab.is_translation() {
                        prop_assert!(c.contains(&ab));
                    }
                }
            }
            for g in &gens {
                if !g.is_translation() {
                    prop_assert!(c.contains(g));
                }
            }
            // bounded by point group order times the 4 half-shift cosets
            prop_assert!(c.len() <= 8 * 4);
        }
    }
}
