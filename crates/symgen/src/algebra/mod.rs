//! Affine operators with exact rational entries.
//!
//! Purpose
//! - `Operator` is the single value type the closure, selection and lattice
//!   code passes around: `x ↦ L·x + t` with `L` an integer matrix and `t` a
//!   rational vector.
//! - Equality and hashing are exact. Identification modulo the integer lattice
//!   is always explicit (`mod_z`), never implicit in `==`.
//!
//! Conventions
//! - Column vectors: composition is `(L1,t1)∘(L2,t2) = (L1·L2, L1·t2 + t1)`,
//!   i.e. `a.compose(&b)` applies `b` first.
//! - Two textual forms: coordinate-triplet symbols (`-x+1/2,y`) and the row
//!   layout produced by `Display` (linear rows followed by translations).

mod notation;
mod operator_type;
mod types;

pub use notation::ParseError;
pub use operator_type::OperatorType;
pub use types::{is_integral, is_zero, mod_z_vec, Operator, Q};
