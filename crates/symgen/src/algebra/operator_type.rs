//! Classification of linear parts: order, orientation, rotation sense.

use nalgebra::{DMatrix, DVector};
use num_traits::{Signed, Zero};

use super::types::{Operator, Q};
use crate::linalg;

/// Largest order searched for; crystallographic linear parts never exceed 6.
const MAX_ORDER: u32 = 6;

/// Type of an operator's linear part.
///
/// - `order`: smallest `n <= 6` with `L^n = I`, or 0. In 3D an
///   orientation-reversing part is measured as `-L` (so `-4` has order 4 and
///   the inversion order 1).
/// - `clockwise`: rotation sense for rotations of order > 2 with a single
///   axis, from the sign of `det(axis, v, L·v)` (2D: `det(e₁, L·e₁)`); a
///   positive determinant means clockwise. 2D reflections report `false`;
///   every other operator without a rotation sense reports `true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OperatorType {
    pub dimension: usize,
    pub orientation_preserving: bool,
    pub order: u32,
    pub clockwise: bool,
}

impl OperatorType {
    pub fn of(op: &Operator) -> Self {
        let d = op.dimension();
        let mut m = op.linear.clone();
        let orientation_preserving = !linalg::determinant(&m).is_negative();
        if d == 3 && !orientation_preserving {
            m = -m;
        }
        let order = matrix_order(&m);
        let clockwise = match d {
            2 if orientation_preserving && (order == 0 || order > 2) => {
                let e1 = unit(2, 0);
                sense(&[e1.clone(), &m * &e1])
            }
            3 if order == 0 || order > 2 => match linear_axis(&op.linear) {
                Some(axis) => {
                    let v = if axis[1].is_zero() && axis[2].is_zero() {
                        unit(3, 1)
                    } else {
                        unit(3, 0)
                    };
                    let mv = &m * &v;
                    sense(&[axis, v, mv])
                }
                None => true,
            },
            2 => orientation_preserving,
            _ => true,
        };
        Self {
            dimension: d,
            orientation_preserving,
            order,
            clockwise,
        }
    }
}

impl Operator {
    #[inline]
    pub fn operator_type(&self) -> OperatorType {
        OperatorType::of(self)
    }
}

fn matrix_order(m: &DMatrix<Q>) -> u32 {
    let id = DMatrix::identity(m.nrows(), m.ncols());
    let mut a = m.clone();
    for n in 1..=MAX_ORDER {
        if a == id {
            return n;
        }
        a = &a * m;
    }
    0
}

/// Rotation axis of `linear` (of `-linear` if it reverses orientation in odd
/// dimension), with its first nonzero entry positive. `None` unless the fixed
/// space is one-dimensional.
pub(crate) fn linear_axis(linear: &DMatrix<Q>) -> Option<DVector<Q>> {
    let d = linear.nrows();
    let mut m = linear.clone();
    if d % 2 != 0 && linalg::determinant(&m).is_negative() {
        m = -m;
    }
    let kernel = linalg::null_space(&(m - DMatrix::identity(d, d)));
    if kernel.len() != 1 {
        return None;
    }
    let v = kernel.into_iter().next()?;
    match v.iter().find(|x| !x.is_zero()) {
        Some(first) if first.is_negative() => Some(-v),
        _ => Some(v),
    }
}

fn unit(d: usize, i: usize) -> DVector<Q> {
    let mut v = DVector::zeros(d);
    v[i] = Q::from_integer(1);
    v
}

/// `true` (clockwise) iff the determinant of the given columns is positive.
fn sense(columns: &[DVector<Q>]) -> bool {
    let d = columns.len();
    let m = DMatrix::from_fn(d, d, |i, j| columns[j][i]);
    linalg::determinant(&m).is_positive()
}
