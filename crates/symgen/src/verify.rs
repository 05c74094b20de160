//! Final consistency check of a generator set.
//!
//! Both failures indicate a defect in selection or completion, never bad
//! input: a `SpaceGroup` is validated on construction.

use std::fmt;

use nalgebra::DMatrix;
use num_traits::Signed;

use crate::algebra::{Operator, Q};
use crate::closure::products;
use crate::generate::GeneratorSet;
use crate::lattice::measure;
use crate::linalg;

/// Why a generator set was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationError {
    /// The closure of the point generators misses this candidate.
    MissingOperator { operator: Operator },
    /// The symmetrized translations span the wrong lattice.
    MissingTranslation { rank: usize, covolume: Q, expected: Q },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::MissingOperator { operator } => {
                write!(f, "generators do not produce {}", operator.symbol())
            }
            GenerationError::MissingTranslation {
                rank,
                covolume,
                expected,
            } => write!(
                f,
                "translations span rank {} with covolume {}, expected full rank with covolume {}",
                rank, covolume, expected
            ),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Accept `set` if its point generators reproduce every candidate and its
/// translations span exactly the lattice of `cell`.
pub fn verify(
    set: GeneratorSet,
    candidates: &[Operator],
    cell: &DMatrix<Q>,
) -> Result<GeneratorSet, GenerationError> {
    let closure = products(set.dimension, &set.points);
    if let Some(missing) = candidates.iter().find(|c| !closure.contains(c)) {
        return Err(GenerationError::MissingOperator {
            operator: missing.clone(),
        });
    }

    let (rank, covolume) = measure(&set.lattice(), candidates);
    let expected = linalg::determinant(cell).abs();
    if rank != set.dimension || covolume != expected {
        return Err(GenerationError::MissingTranslation {
            rank,
            covolume,
            expected,
        });
    }
    Ok(set)
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

    fn square_set(points: &[&str], translations: Vec<nalgebra::DVector<Q>>) -> GeneratorSet {
        GeneratorSet {
            dimension: 2,
            points: ops(points),
            translations,
            implied_translations: vec![],
        }
    }

    #[test]
    fn accepts_complete_set() {
        let cands = ops(&["x,y", "-y,x", "-x,-y", "y,-x"]);
        let set = square_set(&["-y,x"], vec![dvector![q(1, 1), q(0, 1)]]);
        assert!(verify(set, &cands, &DMatrix::identity(2, 2)).is_ok());
    }

    #[test]
    fn reports_missing_operator() {
        let cands = ops(&["x,y", "-y,x", "-x,-y", "y,-x"]);
        let set = square_set(&["-x,-y"], vec![dvector![q(1, 1), q(0, 1)]]);
        let err = verify(set, &cands, &DMatrix::identity(2, 2)).unwrap_err();
        assert!(matches!(err, GenerationError::MissingOperator { .. }));
    }

    #[test]
    fn reports_missing_translation() {
        let cands = ops(&["x,y", "-x,y"]);
        let cell = DMatrix::from_row_slice(2, 2, &[q(1, 2), q(1, 2), q(0, 1), q(1, 1)]);
        let set = square_set(
            &["-x,y"],
            vec![dvector![q(1, 1), q(0, 1)], dvector![q(0, 1), q(1, 1)]],
        );
        let err = verify(set, &cands, &cell).unwrap_err();
        assert_eq!(
            err,
            GenerationError::MissingTranslation {
                rank: 2,
                covolume: q(1, 1),
                expected: q(1, 2)
            }
        );
        assert_eq!(
            err.to_string(),
            "translations span rank 2 with covolume 1, expected full rank with covolume 1/2"
        );
    }
}
