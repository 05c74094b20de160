//! Generator-minimization pipeline.
//!
//! Purpose
//! - Turn a `SpaceGroup` into a small generating set: point-group generators
//!   chosen greedily, plus the lattice vectors they do not already imply.
//!
//! Stages
//! 1. `select::select_generators` on the primitive operators.
//! 2. `lattice::complete_lattice` against the primitive cell.
//! 3. `lattice::prune_translations` (unless `TranslationPruning::Skip`).
//! 4. `verify::verify`; no partial result escapes a failed check.
//!
//! Every stage recomputes closures from scratch and owns its state, so
//! `generate` can run concurrently for different groups.

use nalgebra::DVector;

use crate::algebra::{Operator, Q};
use crate::group::SpaceGroup;
use crate::lattice::{complete_lattice, prune_translations};
use crate::ordering::OrderingStrategy;
use crate::select::select_generators;
use crate::verify::{verify, GenerationError};

/// What happens to completion vectors that later became redundant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TranslationPruning {
    /// Remove them one at a time until none is redundant.
    #[default]
    Fixpoint,
    /// Keep every vector completion added (the legacy tables did this).
    Skip,
}

/// Knobs of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerateCfg {
    pub ordering: OrderingStrategy,
    /// Passes over the primitive cell during completion.
    pub translation_passes: usize,
    pub pruning: TranslationPruning,
}

impl Default for GenerateCfg {
    fn default() -> Self {
        Self {
            ordering: OrderingStrategy::Priority,
            translation_passes: 2,
            pruning: TranslationPruning::Fixpoint,
        }
    }
}

/// Accepted output for one group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorSet {
    pub dimension: usize,
    /// Point-group generators.
    pub points: Vec<Operator>,
    /// Lattice vectors added by completion; emitted with the generators.
    pub translations: Vec<DVector<Q>>,
    /// Translations the closure of `points` already yields; not emitted.
    pub implied_translations: Vec<DVector<Q>>,
}

impl GeneratorSet {
    /// `points` followed by each emitted translation as an operator.
    pub fn operators(&self) -> Vec<Operator> {
        self.points
            .iter()
            .cloned()
            .chain(self.translations.iter().cloned().map(Operator::translation))
            .collect()
    }

    /// Implied and emitted translations together.
    pub fn lattice(&self) -> Vec<DVector<Q>> {
        self.implied_translations
            .iter()
            .chain(&self.translations)
            .cloned()
            .collect()
    }

    /// Number of emitted operators.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len() + self.translations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run selection, completion, pruning and verification for `group`.
pub fn generate(group: &SpaceGroup, cfg: &GenerateCfg) -> Result<GeneratorSet, GenerationError> {
    let dimension = group.dimension();
    let candidates = group.primitive_operators();
    let cell = group.primitive_cell();

    let ordering = cfg.ordering.as_ordering();
    let points = select_generators(dimension, candidates, ordering.as_ref());

    tracing::debug!(passes = cfg.translation_passes, "completing translations");
    let mut completion =
        complete_lattice(dimension, &points, candidates, cell, cfg.translation_passes);

    match cfg.pruning {
        TranslationPruning::Fixpoint => {
            tracing::debug!(added = completion.added.len(), "removing redundant translations");
            prune_translations(dimension, &mut completion, candidates);
        }
        TranslationPruning::Skip => {
            tracing::debug!(added = completion.added.len(), "keeping all added translations");
        }
    }

    let set = GeneratorSet {
        dimension,
        points,
        translations: completion.added,
        implied_translations: completion.implied,
    };
    tracing::debug!(generators = set.len(), "checking");
    verify(set, candidates, cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    fn q(n: i64, d: i64) -> Q {
        Q::new(n, d)
    }

    #[test]
    fn trivial_group() {
        let g = SpaceGroup::from_symbols(2, &["x,y"]).unwrap();
        let set = generate(&g, &GenerateCfg::default()).unwrap();
        assert!(set.points.is_empty());
        assert_eq!(
            set.translations,
            vec![dvector![q(1, 1), q(0, 1)], dvector![q(0, 1), q(1, 1)]]
        );
        let expected: Vec<Operator> = ["x+1,y", "x,y+1"]
            .iter()
            .map(|s| Operator::parse_symbol(s).unwrap())
            .collect();
        assert_eq!(set.operators(), expected);
    }

    #[test]
    fn square_rotation_group() {
        let g = SpaceGroup::from_symbols(2, &["-y,x"]).unwrap();
        let set = generate(&g, &GenerateCfg::default()).unwrap();
        assert_eq!(set.points.len(), 1);
        assert_eq!(set.points[0].operator_type().order, 4);
        assert_eq!(set.translations.len(), 1);
        assert_eq!(crate::lattice::measure(&set.lattice(), g.primitive_operators()), (2, q(1, 1)));
    }

    #[test]
    fn glide_translation_is_not_emitted() {
        let g = SpaceGroup::from_symbols(2, &["-x,y+1/2"]).unwrap();
        let set = generate(&g, &GenerateCfg::default()).unwrap();
        assert_eq!(set.implied_translations, vec![dvector![q(0, 1), q(1, 1)]]);
        assert_eq!(set.translations, vec![dvector![q(1, 1), q(0, 1)]]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn default_cfg() {
        let cfg = GenerateCfg::default();
        assert_eq!(cfg.ordering, OrderingStrategy::Priority);
        assert_eq!(cfg.translation_passes, 2);
        assert_eq!(cfg.pruning, TranslationPruning::Fixpoint);
    }
}
