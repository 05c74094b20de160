//! Exact linear algebra over the rationals.
//!
//! Purpose
//! - Rank, covolume, determinant, inverse and null space for small rational
//!   matrices. Every comparison the generator search makes goes through here,
//!   so nothing is allowed to round.
//!
//! Why not nalgebra's decompositions
//! - LU/QR/SVD need a real field (`ComplexField`); `Rational64` is not one. We
//!   keep nalgebra for storage and products and do the row reduction by hand.
//!
//! Conventions
//! - Vector sets are stacked as rows (`n × d`), matching how lattice bases are
//!   stored by `group::SpaceGroup::primitive_cell`.

use nalgebra::{DMatrix, DVector};
use num_traits::{One, Signed, Zero};

use crate::algebra::Q;

/// Row-reduce `a` in place to echelon form and return the determinant sign
/// change caused by row swaps and negations.
///
/// - `integral`: only unimodular row operations (floor quotients, swaps,
///   negations), so the lattice spanned by the rows is preserved. Pivots are
///   chosen by smallest magnitude and the column is cleared Euclid-style.
/// - `clear_above`: also reduce the entries above each pivot (fully for
///   rational elimination, to `[0, pivot)` for integral elimination).
///
/// Pivots end up positive.
pub fn triangulate(a: &mut DMatrix<Q>, integral: bool, clear_above: bool) -> i32 {
    let (nrows, ncols) = a.shape();
    let mut sign = 1;
    let mut row = 0;
    let mut col = 0;

    while row < nrows && col < ncols {
        let pivot = (row..nrows)
            .filter(|&i| !a[(i, col)].is_zero())
            .min_by(|&i, &j| a[(i, col)].abs().cmp(&a[(j, col)].abs()));
        let Some(p) = pivot else {
            col += 1;
            continue;
        };
        if p != row {
            a.swap_rows(row, p);
            sign = -sign;
        }
        if a[(row, col)].is_negative() {
            for j in col..ncols {
                a[(row, j)] = -a[(row, j)];
            }
            sign = -sign;
        }
        for i in row + 1..nrows {
            if !a[(i, col)].is_zero() {
                let f = quotient(a[(i, col)], a[(row, col)], integral);
                subtract_row(a, i, row, f, col);
            }
        }
        // Integral elimination leaves remainders; go around again with a smaller pivot.
        if (row + 1..nrows).all(|i| a[(i, col)].is_zero()) {
            row += 1;
            col += 1;
        }
    }

    if clear_above {
        let mut col = 0;
        for row in 0..nrows {
            while col < ncols && a[(row, col)].is_zero() {
                col += 1;
            }
            if col >= ncols {
                break;
            }
            for i in 0..row {
                if !a[(i, col)].is_zero() {
                    let f = quotient(a[(i, col)], a[(row, col)], integral);
                    subtract_row(a, i, row, f, col);
                }
            }
        }
    }

    sign
}

#[inline]
fn quotient(x: Q, pivot: Q, integral: bool) -> Q {
    if integral {
        (x / pivot).floor()
    } else {
        x / pivot
    }
}

/// `a[target] -= f * a[source]`, touching columns from `from_col` on.
fn subtract_row(a: &mut DMatrix<Q>, target: usize, source: usize, f: Q, from_col: usize) {
    for j in from_col..a.ncols() {
        let s = a[(source, j)];
        a[(target, j)] -= f * s;
    }
}

/// Stack `vectors` as the rows of an `n × d` matrix.
pub fn rows_to_matrix(vectors: &[DVector<Q>], dimension: usize) -> DMatrix<Q> {
    DMatrix::from_fn(vectors.len(), dimension, |i, j| vectors[i][j])
}

/// Rows of `m` as owned vectors.
pub fn matrix_rows(m: &DMatrix<Q>) -> Vec<DVector<Q>> {
    (0..m.nrows())
        .map(|i| DVector::from_iterator(m.ncols(), m.row(i).iter().copied()))
        .collect()
}

fn nonzero_rows(m: &DMatrix<Q>) -> usize {
    (0..m.nrows())
        .filter(|&i| m.row(i).iter().any(|x| !x.is_zero()))
        .count()
}

/// Dimension of the rational span of `vectors`. Empty input has rank 0.
pub fn rank(vectors: &[DVector<Q>]) -> usize {
    let Some(first) = vectors.first() else {
        return 0;
    };
    let mut m = rows_to_matrix(vectors, first.len());
    triangulate(&mut m, false, false);
    nonzero_rows(&m)
}

/// Covolume of the lattice spanned by `vectors`: the product of the pivots of
/// a unimodular triangulation. For rank-deficient input this is the volume of
/// the lattice inside its own span measured against the coordinate pivots; the
/// empty set has covolume 1.
pub fn covolume(vectors: &[DVector<Q>]) -> Q {
    let Some(first) = vectors.first() else {
        return Q::one();
    };
    let mut m = rows_to_matrix(vectors, first.len());
    triangulate(&mut m, true, false);
    let mut vol = Q::one();
    for i in 0..m.nrows() {
        match m.row(i).iter().find(|x| !x.is_zero()) {
            Some(p) => vol *= p.abs(),
            None => break,
        }
    }
    vol
}

/// Determinant of a square matrix.
pub fn determinant(m: &DMatrix<Q>) -> Q {
    debug_assert!(m.is_square(), "determinant of a non-square matrix");
    let mut a = m.clone();
    let sign = triangulate(&mut a, false, false);
    let mut det = Q::from_integer(i64::from(sign));
    for i in 0..a.nrows().min(a.ncols()) {
        det *= a[(i, i)];
    }
    det
}

/// Inverse by Gauss–Jordan elimination on `[m | I]`; `None` if singular.
pub fn inverse(m: &DMatrix<Q>) -> Option<DMatrix<Q>> {
    if !m.is_square() {
        return None;
    }
    let n = m.nrows();
    let mut aug = DMatrix::from_fn(n, 2 * n, |i, j| {
        if j < n {
            m[(i, j)]
        } else if j - n == i {
            Q::one()
        } else {
            Q::zero()
        }
    });
    triangulate(&mut aug, false, true);
    for i in 0..n {
        let p = aug[(i, i)];
        if p.is_zero() {
            return None;
        }
        for j in i..2 * n {
            aug[(i, j)] /= p;
        }
    }
    Some(aug.columns(n, n).into_owned())
}

/// Basis of `{ x : m·x = 0 }`, one vector per free column.
pub fn null_space(m: &DMatrix<Q>) -> Vec<DVector<Q>> {
    let mut a = m.clone();
    triangulate(&mut a, false, true);
    let ncols = a.ncols();

    // pivot column of each nonzero row
    let mut pivots = Vec::new();
    for i in 0..a.nrows() {
        if let Some(j) = (0..ncols).find(|&j| !a[(i, j)].is_zero()) {
            pivots.push((i, j));
        }
    }

    let mut basis = Vec::new();
    for free in (0..ncols).filter(|j| pivots.iter().all(|&(_, pc)| pc != *j)) {
        let mut x = DVector::from_element(ncols, Q::zero());
        x[free] = Q::one();
        for &(r, pc) in &pivots {
            x[pc] = -a[(r, free)] / a[(r, pc)];
        }
        basis.push(x);
    }
    basis
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    fn q(n: i64, d: i64) -> Q {
        Q::new(n, d)
    }

    fn qi(n: i64) -> Q {
        Q::from_integer(n)
    }

    #[test]
    fn rank_detects_dependence() {
        let vs = vec![
            dvector![qi(1), qi(2)],
            dvector![qi(2), qi(4)],
            dvector![qi(-3), qi(-6)],
        ];
        assert_eq!(rank(&vs), 1);
        assert_eq!(rank(&[]), 0);
        let full = vec![dvector![qi(1), qi(0)], dvector![q(1, 2), q(1, 2)]];
        assert_eq!(rank(&full), 2);
    }

    #[test]
    fn covolume_of_centered_square_lattice() {
        // (1/2,1/2) and its mirror image span the centered lattice of index 2.
        let vs = vec![dvector![q(1, 2), q(1, 2)], dvector![q(-1, 2), q(1, 2)]];
        assert_eq!(covolume(&vs), q(1, 2));
        // Adding a vector already in the lattice changes nothing.
        let mut more = vs.clone();
        more.push(dvector![qi(0), qi(1)]);
        more.push(dvector![qi(1), qi(0)]);
        assert_eq!(covolume(&more), q(1, 2));
    }

    #[test]
    fn covolume_needs_unimodular_steps() {
        // 2 and 3 generate Z even though each alone has covolume >= 2.
        let vs = vec![dvector![qi(2)], dvector![qi(3)]];
        assert_eq!(covolume(&vs), qi(1));
        let vs = vec![dvector![qi(4), qi(0)], dvector![qi(6), qi(0)], dvector![qi(0), qi(3)]];
        assert_eq!(covolume(&vs), qi(6));
    }

    #[test]
    fn determinant_and_inverse_agree() {
        let m = DMatrix::from_row_slice(
            3,
            3,
            &[qi(0), qi(-1), qi(0), qi(1), qi(-1), qi(0), qi(0), qi(0), qi(1)],
        );
        assert_eq!(determinant(&m), qi(1));
        let inv = inverse(&m).unwrap();
        assert_eq!(&m * &inv, DMatrix::identity(3, 3));

        let singular = DMatrix::from_row_slice(2, 2, &[qi(1), qi(2), qi(2), qi(4)]);
        assert_eq!(determinant(&singular), qi(0));
        assert!(inverse(&singular).is_none());

        let swap = DMatrix::from_row_slice(2, 2, &[qi(0), qi(1), qi(1), qi(0)]);
        assert_eq!(determinant(&swap), qi(-1));
    }

    #[test]
    fn null_space_of_rotation_minus_identity_is_axis() {
        // 3-fold rotation about [111]: (x,y,z) -> (z,x,y)
        let l = DMatrix::from_row_slice(
            3,
            3,
            &[qi(0), qi(0), qi(1), qi(1), qi(0), qi(0), qi(0), qi(1), qi(0)],
        );
        let k = null_space(&(l - DMatrix::identity(3, 3)));
        assert_eq!(k.len(), 1);
        assert_eq!(k[0], dvector![qi(1), qi(1), qi(1)]);
    }

    #[test]
    fn integral_triangulation_keeps_lattice_basis() {
        let mut m = DMatrix::from_row_slice(3, 2, &[qi(1), qi(0), qi(0), qi(1), q(1, 2), q(1, 2)]);
        triangulate(&mut m, true, true);
        assert_eq!(m.row(0).iter().copied().collect::<Vec<_>>(), vec![q(1, 2), q(1, 2)]);
        assert_eq!(m.row(1).iter().copied().collect::<Vec<_>>(), vec![qi(0), qi(1)]);
        assert!(m.row(2).iter().all(|x| x.is_zero()));
    }
}
