//! Variation, selection and improvement operators.
//!
//! Every operator kind is a trait object built either directly from its
//! typed struct or by name through a factory reading a [`Parameters`] bag.
//!
//! # Key Types
//!
//! - [`Crossover`]: two parents in, two children out
//! - [`Mutation`]: perturbs one solution in place
//! - [`Selection`]: picks the index of one member of a set
//! - [`LocalSearch`]: improves one solution, spending evaluations
//! - [`OperatorSpec`]: a name plus its parameters, as stored in configs
//!
//! # Operators
//!
//! | Name | Kind | Encodings |
//! |---|---|---|
//! | `SBXCrossover` | crossover | real-valued view |
//! | `SinglePointCrossover` | crossover | binary |
//! | `PMXCrossover`, `OrderCrossover` | crossover | permutation |
//! | `PolynomialMutation` | mutation | real-valued view |
//! | `BitFlipMutation` | mutation | binary, integer |
//! | `SwapMutation` | mutation | permutation |
//! | `BinaryTournament`, `BinaryTournament2` | selection | any |
//! | `MutationLocalSearch` | local search | any mutable encoding |

mod crossover;
mod factory;
mod local_search;
mod mutation;
mod parameters;
pub mod permutation;
mod selection;

pub use crossover::{
    OrderCrossover, PmxCrossover, SbxCrossover, SinglePointCrossover,
    DEFAULT_SBX_DISTRIBUTION_INDEX,
};
pub use factory::{
    create_crossover, create_local_search, create_mutation, create_selection, OperatorSpec,
};
pub use local_search::{Improvement, MutationLocalSearch};
pub use mutation::{
    BitFlipMutation, PolynomialMutation, SwapMutation, DEFAULT_MUTATION_DISTRIBUTION_INDEX,
};
pub use parameters::{ParamValue, Parameters};
pub use selection::{BinaryTournament, BinaryTournament2};

use crate::archive::Archive;
use crate::core::{Problem, Solution, SolutionSet};
use crate::error::Result;
use rand::RngCore;
use std::fmt;

/// Recombines two parents into two children.
///
/// Children start as copies of the parents, so an operator that decides
/// not to recombine returns the parents unchanged.
pub trait Crossover: Send + Sync + fmt::Debug {
    /// The operator's registered name.
    fn name(&self) -> &'static str;

    /// Produces two children.
    ///
    /// # Errors
    /// [`MoeaError::UnsupportedEncoding`](crate::MoeaError::UnsupportedEncoding)
    /// when the parents' variables are not of a kind the operator handles.
    fn execute(
        &self,
        parent1: &Solution,
        parent2: &Solution,
        rng: &mut dyn RngCore,
    ) -> Result<[Solution; 2]>;
}

/// Perturbs one solution in place.
pub trait Mutation: Send + Sync + fmt::Debug {
    /// The operator's registered name.
    fn name(&self) -> &'static str;

    /// Mutates `solution`.
    fn execute(&self, solution: &mut Solution, rng: &mut dyn RngCore) -> Result<()>;
}

/// Chooses one member of a solution set.
///
/// Selections may keep state between calls (e.g. a tournament schedule),
/// hence `&mut self`.
pub trait Selection: Send + fmt::Debug {
    /// The operator's registered name.
    fn name(&self) -> &'static str;

    /// Index of the selected member.
    ///
    /// # Panics
    /// Panics if `set` is empty.
    fn execute(&mut self, set: &SolutionSet, rng: &mut dyn RngCore) -> usize;
}

/// Improves a solution by spending problem evaluations.
pub trait LocalSearch: Send + Sync + fmt::Debug {
    /// The operator's registered name.
    fn name(&self) -> &'static str;

    /// Returns the improved solution and the evaluations used.
    ///
    /// Candidates that are neither better nor worse than the incumbent may
    /// be offered to `archive`.
    fn improve(
        &self,
        solution: &Solution,
        problem: &dyn Problem,
        archive: Option<&mut dyn Archive>,
        rng: &mut dyn RngCore,
    ) -> Result<Improvement>;
}
