//! Curated internal API (UNSTABLE).
//!
//! Important
//! - Not a public API. A convenience surface for the CLI, benches and ad-hoc
//!   experiments; breaking changes are allowed.

use std::fmt;

// Operators and exact scalars
pub use crate::algebra::{mod_z_vec, Operator, OperatorType, ParseError, Q};
// Groups
pub use crate::group::{catalogue, GroupError, SpaceGroup};
// Core engine
pub use crate::closure::{products, Closure};
pub use crate::generate::{generate, GenerateCfg, GeneratorSet, TranslationPruning};
pub use crate::lattice::{complete_lattice, conjugates, measure, prune_translations, Completion};
pub use crate::ordering::{
    CandidateOrdering, LegacyOrdering, OrderingStrategy, PriorityOrdering, ShuffledOrdering,
};
pub use crate::select::{remove_redundant, select_generators};
pub use crate::verify::{verify, GenerationError};

/// Either failure on the way from a catalogue name to a generator set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamedError {
    Group(GroupError),
    Generation(GenerationError),
}

impl fmt::Display for NamedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedError::Group(e) => write!(f, "{}", e),
            NamedError::Generation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for NamedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NamedError::Group(e) => Some(e),
            NamedError::Generation(e) => Some(e),
        }
    }
}

impl From<GroupError> for NamedError {
    fn from(e: GroupError) -> Self {
        NamedError::Group(e)
    }
}

impl From<GenerationError> for NamedError {
    fn from(e: GenerationError) -> Self {
        NamedError::Generation(e)
    }
}

/// Look up a catalogue group and generate it.
pub fn generate_named(
    dimension: usize,
    name: &str,
    cfg: &GenerateCfg,
) -> Result<GeneratorSet, NamedError> {
    let group = catalogue::lookup(dimension, name)?;
    Ok(generate(&group, cfg)?)
}
