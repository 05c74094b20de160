//! Minimal generating sets for crystallographic space groups.
//!
//! Pipeline: candidate operators (one per coset of the translation lattice)
//! → greedy point-group generators → translation-lattice completion →
//! verification. All arithmetic is exact (`Rational64`).
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; `api`
//!   is the curated surface for the CLI and experiments.

pub mod algebra;
pub mod api;
pub mod closure;
pub mod generate;
pub mod group;
pub mod lattice;
pub mod linalg;
pub mod ordering;
pub mod select;
pub mod verify;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use algebra::{Operator, OperatorType, Q};
pub use generate::{generate, GenerateCfg, GeneratorSet, TranslationPruning};
pub use group::{catalogue, GroupError, SpaceGroup};
pub use verify::GenerationError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::algebra::{Operator, OperatorType, Q};
    pub use crate::generate::{generate, GenerateCfg, GeneratorSet, TranslationPruning};
    pub use crate::group::{catalogue, GroupError, SpaceGroup};
    pub use crate::ordering::{CandidateOrdering, OrderingStrategy};
    pub use crate::verify::GenerationError;
}
