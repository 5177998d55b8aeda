//! Solution model, problem contract and comparators.
//!
//! # Key Types
//!
//! - [`Variable`]: one decision variable with its domain
//! - [`Solution`]: variables, objectives, and algorithm scratch fields
//! - [`SolutionSet`]: ordered, optionally bounded collection
//! - [`Problem`]: the host-supplied optimization problem
//! - [`SolutionComparator`]: dominance and the total orders used for sorting

mod comparator;
mod problem;
mod solution;
mod solution_set;
mod variable;

pub use comparator::{
    dominance, objectives_equal, pareto_dominance, ConstraintViolationComparator,
    CrowdingDistanceComparator, DominanceComparator, EqualSolutions, FitnessComparator,
    ObjectiveComparator, SolutionComparator,
};
pub use problem::{evaluate_solution, Encoding, Problem};
pub use solution::Solution;
pub use solution_set::SolutionSet;
pub use variable::{decode, Variable, DEFAULT_PRECISION};
