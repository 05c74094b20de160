//! Core operator type and vector helpers.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ops::Mul;

use nalgebra::{DMatrix, DVector};
use num_rational::Rational64;
use num_traits::{One, Zero};

use crate::linalg;

/// Exact scalar used throughout the crate.
pub type Q = Rational64;

/// Reduce every component into `[0, 1)`.
pub fn mod_z_vec(v: &DVector<Q>) -> DVector<Q> {
    v.map(|x| x - x.floor())
}

#[inline]
pub fn is_zero(v: &DVector<Q>) -> bool {
    v.iter().all(Zero::is_zero)
}

#[inline]
pub fn is_integral(v: &DVector<Q>) -> bool {
    v.iter().all(|x| x.is_integer())
}

/// Affine map `x ↦ linear·x + shift`.
///
/// Invariants:
/// - `linear` is `d×d` and `shift` has length `d`.
/// - `==` compares raw entries; use `mod_z` first for coset equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operator {
    pub linear: DMatrix<Q>,
    pub shift: DVector<Q>,
}

impl Operator {
    #[inline]
    pub fn new(linear: DMatrix<Q>, shift: DVector<Q>) -> Self {
        debug_assert!(linear.is_square() && linear.nrows() == shift.len());
        Self { linear, shift }
    }

    #[inline]
    pub fn identity(dimension: usize) -> Self {
        Self {
            linear: DMatrix::identity(dimension, dimension),
            shift: DVector::zeros(dimension),
        }
    }

    /// Pure translation by `t`.
    #[inline]
    pub fn translation(t: DVector<Q>) -> Self {
        let d = t.len();
        Self {
            linear: DMatrix::identity(d, d),
            shift: t,
        }
    }

    /// Operator with the given linear part and no translation.
    #[inline]
    pub fn from_linear(linear: DMatrix<Q>) -> Self {
        let d = linear.nrows();
        Self {
            linear,
            shift: DVector::zeros(d),
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.shift.len()
    }

    /// `self ∘ other`: apply `other`, then `self`.
    pub fn compose(&self, other: &Operator) -> Operator {
        Operator {
            linear: &self.linear * &other.linear,
            shift: &self.linear * &other.shift + &self.shift,
        }
    }

    /// Group inverse; `None` only for a singular linear part.
    pub fn inverse(&self) -> Option<Operator> {
        let inv = linalg::inverse(&self.linear)?;
        let shift = -(&inv * &self.shift);
        Some(Operator { linear: inv, shift })
    }

    /// Image of the point `p`.
    #[inline]
    pub fn apply(&self, p: &DVector<Q>) -> DVector<Q> {
        &self.linear * p + &self.shift
    }

    /// Image of the vector `v` (translation ignored).
    #[inline]
    pub fn apply_linear(&self, v: &DVector<Q>) -> DVector<Q> {
        &self.linear * v
    }

    /// Representative of the coset modulo integer translations.
    pub fn mod_z(&self) -> Operator {
        Operator {
            linear: self.linear.clone(),
            shift: mod_z_vec(&self.shift),
        }
    }

    #[inline]
    pub fn linear_part(&self) -> Operator {
        Operator::from_linear(self.linear.clone())
    }

    #[inline]
    pub fn translation_part(&self) -> &DVector<Q> {
        &self.shift
    }

    #[inline]
    pub fn is_translation(&self) -> bool {
        let d = self.dimension();
        self.linear == DMatrix::identity(d, d)
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.is_translation() && is_zero(&self.shift)
    }

    /// Integer entries in the linear part and determinant ±1.
    pub fn is_unimodular(&self) -> bool {
        self.linear.iter().all(|x| x.is_integer()) && {
            let det = linalg::determinant(&self.linear);
            det == Q::one() || det == -Q::one()
        }
    }
}

impl Mul for &Operator {
    type Output = Operator;
    #[inline]
    fn mul(self, rhs: &Operator) -> Operator {
        self.compose(rhs)
    }
}

impl Hash for Operator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimension().hash(state);
        for x in self.linear.iter().chain(self.shift.iter()) {
            x.hash(state);
        }
    }
}

// Lexicographic on (dimension, linear rows, shift); gives catalogue and
// primitive-operator lists a stable order.
impl Ord for Operator {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dimension()
            .cmp(&other.dimension())
            .then_with(|| self.linear.transpose().iter().cmp(other.linear.transpose().iter()))
            .then_with(|| self.shift.iter().cmp(other.shift.iter()))
    }
}

impl PartialOrd for Operator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
