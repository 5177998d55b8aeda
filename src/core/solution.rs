//! Candidate solutions.
//!
//! A [`Solution`] owns its decision [`Variable`]s and objective values,
//! plus the scratch fields algorithms use while it is in flight
//! (fitness, crowding distance, distance to a reference set, the
//! scatter-search `marked` flag).
//!
//! # Real-valued view
//!
//! Real-coded operators (SBX, polynomial mutation, PSO velocity updates,
//! decision-space distances) do not care how a value is stored. They go
//! through [`Solution::real_value`] / [`Solution::set_real_value`], which
//! address a flat index across all variables: scalar reals, integers and
//! binary-coded reals contribute one slot each, `ArrayReal`/`ArrayInt`
//! contribute one slot per element. Pure bit strings and permutations
//! contribute none.

use super::problem::Problem;
use super::variable::Variable;
use rand::RngCore;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A candidate answer to a [`Problem`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    /// Decision variables, one per problem dimension.
    pub variables: Vec<Variable>,

    /// Objective values (minimized).
    pub objectives: Vec<f64>,

    /// Total constraint violation as a non-negative magnitude.
    ///
    /// `0.0` means feasible.
    pub overall_constraint_violation: f64,

    /// Number of constraints the solution violates.
    pub number_of_violated_constraints: usize,

    /// Algorithm-specific scalar fitness (SPEA2 strength fitness in AbYSS).
    pub fitness: f64,

    /// Crowding distance, or hypervolume contribution when a hypervolume
    /// archive is in use.
    pub crowding_distance: f64,

    /// Distance to the nearest member of a reference set (scatter search).
    pub distance_to_set: f64,

    /// Pareto rank, when an algorithm assigns one.
    pub rank: usize,

    /// Whether scatter search already used this solution as a parent.
    pub marked: bool,
}

impl Solution {
    /// Creates an unevaluated solution from explicit variables.
    pub fn new(variables: Vec<Variable>, number_of_objectives: usize) -> Self {
        Self {
            variables,
            objectives: vec![0.0; number_of_objectives],
            overall_constraint_violation: 0.0,
            number_of_violated_constraints: 0,
            fitness: 0.0,
            crowding_distance: 0.0,
            distance_to_set: f64::INFINITY,
            rank: 0,
            marked: false,
        }
    }

    /// Creates a solution with randomly initialized variables.
    pub fn random(problem: &dyn Problem, rng: &mut dyn RngCore) -> Self {
        Self::new(problem.create_variables(rng), problem.number_of_objectives())
    }

    /// Creates a variable-less solution carrying only objective values.
    ///
    /// Used for reference fronts and in indicator computations.
    pub fn from_objectives(objectives: Vec<f64>) -> Self {
        let m = objectives.len();
        let mut s = Self::new(Vec::new(), m);
        s.objectives = objectives;
        s
    }

    /// Number of objectives.
    pub fn number_of_objectives(&self) -> usize {
        self.objectives.len()
    }

    /// Objective `i`.
    ///
    /// # Panics
    /// Panics if `i` is out of range.
    pub fn objective(&self, i: usize) -> f64 {
        self.objectives[i]
    }

    /// Sets objective `i`.
    ///
    /// # Panics
    /// Panics if `i` is out of range.
    pub fn set_objective(&mut self, i: usize, value: f64) {
        self.objectives[i] = value;
    }

    /// Whether the solution violates no constraint.
    pub fn is_feasible(&self) -> bool {
        self.overall_constraint_violation <= 0.0
    }

    /// Clears the `marked` flag.
    pub fn unmark(&mut self) {
        self.marked = false;
    }

    /// Whether every variable exposes real values, so real-coded operators apply.
    pub fn is_real_coded(&self) -> bool {
        !self.variables.is_empty()
            && self.variables.iter().all(|v| {
                v.has_real_value()
                    || matches!(v, Variable::ArrayReal { .. } | Variable::ArrayInt { .. })
            })
    }

    /// Length of the real-valued view.
    pub fn decision_len(&self) -> usize {
        self.variables.iter().map(real_slots).sum()
    }

    /// Value at index `i` of the real-valued view.
    ///
    /// # Panics
    /// Panics if `i >= decision_len()`.
    pub fn real_value(&self, i: usize) -> f64 {
        let (var, elem) = self.locate(i);
        match &self.variables[var] {
            Variable::ArrayReal { values, .. } => values[elem],
            Variable::ArrayInt { values, .. } => values[elem] as f64,
            other => other.value().unwrap_or(f64::NAN),
        }
    }

    /// Sets index `i` of the real-valued view, clamping into its bounds.
    ///
    /// # Panics
    /// Panics if `i >= decision_len()`.
    pub fn set_real_value(&mut self, i: usize, value: f64) {
        let (var, elem) = self.locate(i);
        match &mut self.variables[var] {
            Variable::ArrayReal {
                values,
                lower,
                upper,
            } => values[elem] = value.clamp(lower[elem], upper[elem]),
            Variable::ArrayInt {
                values,
                lower,
                upper,
            } => values[elem] = (value.round() as i64).clamp(lower[elem], upper[elem]),
            other => {
                other.set_value(value);
            }
        }
    }

    /// Lower bound of index `i` of the real-valued view.
    pub fn real_lower(&self, i: usize) -> f64 {
        let (var, elem) = self.locate(i);
        match &self.variables[var] {
            Variable::ArrayReal { lower, .. } => lower[elem],
            Variable::ArrayInt { lower, .. } => lower[elem] as f64,
            other => other.lower_bound().unwrap_or(f64::NEG_INFINITY),
        }
    }

    /// Upper bound of index `i` of the real-valued view.
    pub fn real_upper(&self, i: usize) -> f64 {
        let (var, elem) = self.locate(i);
        match &self.variables[var] {
            Variable::ArrayReal { upper, .. } => upper[elem],
            Variable::ArrayInt { upper, .. } => upper[elem] as f64,
            other => other.upper_bound().unwrap_or(f64::INFINITY),
        }
    }

    /// The real-valued view as a vector.
    pub fn decision_vector(&self) -> Vec<f64> {
        (0..self.decision_len()).map(|i| self.real_value(i)).collect()
    }

    /// Euclidean distance between the objective vectors of two solutions.
    pub fn objective_distance(&self, other: &Solution) -> f64 {
        self.objectives
            .iter()
            .zip(other.objectives.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Euclidean distance in the real-valued decision space.
    pub fn decision_distance(&self, other: &Solution) -> f64 {
        let n = self.decision_len().min(other.decision_len());
        (0..n)
            .map(|i| {
                let d = self.real_value(i) - other.real_value(i);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }

    fn locate(&self, mut i: usize) -> (usize, usize) {
        for (var, v) in self.variables.iter().enumerate() {
            let slots = real_slots(v);
            if i < slots {
                return (var, i);
            }
            i -= slots;
        }
        panic!(
            "real index out of range: decision length is {}",
            self.decision_len()
        );
    }
}

fn real_slots(v: &Variable) -> usize {
    match v {
        Variable::ArrayReal { values, .. } => values.len(),
        Variable::ArrayInt { values, .. } => values.len(),
        other if other.has_real_value() => 1,
        _ => 0,
    }
}
