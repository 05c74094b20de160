//! Space groups as finite operator sets modulo the integer lattice.
//!
//! Purpose
//! - Supply what the generator search consumes: the full coset-representative
//!   operator list in primitive form and the primitive cell of the lattice.
//! - Validate input once at construction so downstream code can rely on an
//!   actual group (unimodular linear parts, closed under `a ∘ b⁻¹`).
//!
//! Representation
//! - Operators are stored lattice-reduced and sorted. Pure translations with a
//!   fractional shift (centering vectors) are ordinary members of the set.
//! - The primitive cell is stored as rows (one basis vector per row).
//!
//! References
//! - Code cross-refs: `catalogue::lookup`, `generate::generate`,
//!   `linalg::triangulate`

pub mod catalogue;

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;

use nalgebra::DMatrix;

use crate::algebra::{mod_z_vec, Operator, ParseError, Q};
use crate::linalg;

/// Upper bound on the number of cosets `from_generators` will expand. The
/// largest crystallographic case (Fm-3m in conventional setting) has 192.
pub const MAX_OPERATORS: usize = 4096;

/// Invalid provider input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupError {
    /// An operator symbol could not be read.
    Parse { input: String, reason: String },
    /// An operator has the wrong dimension.
    DimensionMismatch { expected: usize, found: usize },
    /// A linear part is not an integer matrix with determinant ±1.
    NotUnimodular { operator: String },
    /// No operators were given.
    Empty,
    /// The set is not closed under `a ∘ b⁻¹` modulo the lattice.
    NotAGroup { missing: String },
    /// Closure did not terminate within `MAX_OPERATORS` cosets.
    Unbounded { limit: usize },
    /// The translations do not span a full-rank lattice.
    DegenerateLattice { rank: usize },
    /// No catalogue entry under this name.
    UnknownGroup { dimension: usize, name: String },
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupError::Parse { input, reason } => {
                write!(f, "cannot parse operator {:?}: {}", input, reason)
            }
            GroupError::DimensionMismatch { expected, found } => {
                write!(f, "operator of dimension {} in a {}-dimensional group", found, expected)
            }
            GroupError::NotUnimodular { operator } => {
                write!(f, "linear part of {} is not unimodular", operator)
            }
            GroupError::Empty => write!(f, "operator set is empty"),
            GroupError::NotAGroup { missing } => {
                write!(f, "operator set is not closed: {} is missing", missing)
            }
            GroupError::Unbounded { limit } => {
                write!(f, "closure exceeds {} operators (infinite point group?)", limit)
            }
            GroupError::DegenerateLattice { rank } => {
                write!(f, "translation lattice has rank {} only", rank)
            }
            GroupError::UnknownGroup { dimension, name } => {
                write!(f, "no {}-dimensional group named {:?}", dimension, name)
            }
        }
    }
}

impl std::error::Error for GroupError {}

impl From<ParseError> for GroupError {
    fn from(e: ParseError) -> Self {
        GroupError::Parse {
            input: e.input,
            reason: e.reason,
        }
    }
}

/// A crystallographic group given by its operators modulo `Z^d`.
#[derive(Clone, Debug)]
pub struct SpaceGroup {
    dimension: usize,
    operators: Vec<Operator>,
    cell: DMatrix<Q>,
    primitive: Vec<Operator>,
}

impl SpaceGroup {
    /// Validate and store a complete operator list.
    pub fn new(dimension: usize, operators: Vec<Operator>) -> Result<Self, GroupError> {
        let mut set = BTreeSet::new();
        for op in operators {
            check_operator(dimension, &op)?;
            set.insert(op.mod_z());
        }
        if set.is_empty() {
            return Err(GroupError::Empty);
        }
        let operators: Vec<Operator> = set.into_iter().collect();

        let members: HashSet<&Operator> = operators.iter().collect();
        for a in &operators {
            for b in &operators {
                let b_inv = b.inverse().ok_or_else(|| GroupError::NotUnimodular {
                    operator: b.symbol(),
                })?;
                let c = a.compose(&b_inv).mod_z();
                if !members.contains(&c) {
                    return Err(GroupError::NotAGroup { missing: c.symbol() });
                }
            }
        }

        let cell = primitive_cell(dimension, &operators)?;
        let primitive = primitive_operators(&operators, &cell)?;
        tracing::trace!(
            operators = operators.len(),
            primitive = primitive.len(),
            "space group"
        );
        Ok(Self {
            dimension,
            operators,
            cell,
            primitive,
        })
    }

    /// Expand `generators` by breadth-first product closure modulo `Z^d`.
    pub fn from_generators(dimension: usize, generators: &[Operator]) -> Result<Self, GroupError> {
        for g in generators {
            check_operator(dimension, g)?;
        }
        let one = Operator::identity(dimension);
        let mut seen = HashSet::from([one.clone()]);
        let mut all = vec![one.clone()];
        let mut queue = VecDeque::from([one]);
        while let Some(a) = queue.pop_front() {
            for g in generators {
                let ag = a.compose(g).mod_z();
                if seen.insert(ag.clone()) {
                    if seen.len() > MAX_OPERATORS {
                        return Err(GroupError::Unbounded {
                            limit: MAX_OPERATORS,
                        });
                    }
                    all.push(ag.clone());
                    queue.push_back(ag);
                }
            }
        }
        Self::new(dimension, all)
    }

    /// Parse generator symbols and expand them.
    pub fn from_symbols(dimension: usize, symbols: &[&str]) -> Result<Self, GroupError> {
        let generators = symbols
            .iter()
            .map(|s| Operator::parse_symbol(s))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_generators(dimension, &generators)
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// All operators modulo `Z^d`, centering translations included.
    #[inline]
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Pure translations of the group (lattice-reduced, identity included).
    pub fn translations(&self) -> impl Iterator<Item = &Operator> {
        self.operators.iter().filter(|op| op.is_translation())
    }

    /// Basis of the translation lattice, one vector per row.
    #[inline]
    pub fn primitive_cell(&self) -> &DMatrix<Q> {
        &self.cell
    }

    /// One operator per coset of the full translation lattice.
    #[inline]
    pub fn primitive_operators(&self) -> &[Operator] {
        &self.primitive
    }

    /// Number of operators modulo `Z^d`.
    #[inline]
    pub fn order(&self) -> usize {
        self.operators.len()
    }
}

fn check_operator(dimension: usize, op: &Operator) -> Result<(), GroupError> {
    if op.dimension() != dimension {
        return Err(GroupError::DimensionMismatch {
            expected: dimension,
            found: op.dimension(),
        });
    }
    if !op.is_unimodular() {
        return Err(GroupError::NotUnimodular {
            operator: op.symbol(),
        });
    }
    Ok(())
}

// Integer lattice plus centering vectors, triangulated without leaving the
// lattice; the first `d` rows are then a basis.
fn primitive_cell(dimension: usize, operators: &[Operator]) -> Result<DMatrix<Q>, GroupError> {
    let centering: Vec<_> = operators
        .iter()
        .filter(|op| op.is_translation())
        .map(|op| op.shift.clone())
        .collect();
    let mut m = DMatrix::identity(dimension + centering.len(), dimension);
    for (i, t) in centering.iter().enumerate() {
        m.set_row(dimension + i, &t.transpose());
    }
    linalg::triangulate(&mut m, true, true);
    let cell = m.rows(0, dimension).into_owned();
    let rank = linalg::rank(&linalg::matrix_rows(&cell));
    if rank != dimension {
        return Err(GroupError::DegenerateLattice { rank });
    }
    Ok(cell)
}

// Reduce each shift modulo the primitive lattice (in cell coordinates), then
// once more modulo `Z^d` in standard coordinates.
fn primitive_operators(
    operators: &[Operator],
    cell: &DMatrix<Q>,
) -> Result<Vec<Operator>, GroupError> {
    let basis = cell.transpose();
    let to_cell = linalg::inverse(&basis).ok_or_else(|| GroupError::DegenerateLattice {
        rank: linalg::rank(&linalg::matrix_rows(cell)),
    })?;
    let reduced: BTreeSet<Operator> = operators
        .iter()
        .map(|op| {
            let shift = &basis * mod_z_vec(&(&to_cell * &op.shift));
            Operator::new(op.linear.clone(), shift).mod_z()
        })
        .collect();
    Ok(reduced.into_iter().collect())
}
