//! Solution comparators.
//!
//! Every comparator returns a [`std::cmp::Ordering`] where `Less` means
//! "the left solution is better". For dominance, `Less` reads "`a`
//! dominates `b`", `Greater` "`b` dominates `a`" and `Equal` "neither".
//!
//! Dominance is a partial order. It is fine for picking a best element
//! or for pairwise tests, but never hand it to a sort. The total orders
//! here (objective, crowding distance, fitness) are safe to sort with;
//! [`SolutionSet::sort_by`](super::SolutionSet::sort_by) uses a stable
//! sort so ties keep their original order.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - Deb (2000), "An efficient constraint handling method for genetic algorithms"

use super::solution::Solution;
use std::cmp::Ordering;

/// A strategy for ordering two solutions.
pub trait SolutionComparator: Send + Sync {
    /// Compares `a` with `b`. `Less` means `a` is preferred.
    fn compare(&self, a: &Solution, b: &Solution) -> Ordering;
}

/// Pareto dominance (minimization) with constraint handling.
///
/// - If the violations differ and either solution is infeasible, the
///   one with the smaller violation wins. A feasible solution therefore
///   always beats an infeasible one.
/// - Otherwise `a` dominates `b` when it is no worse in every objective and
///   strictly better in at least one.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use u_moea::core::{dominance, Solution};
///
/// let a = Solution::from_objectives(vec![1.0, 1.0]);
/// let b = Solution::from_objectives(vec![2.0, 1.0]);
/// assert_eq!(dominance(&a, &b), Ordering::Less);
/// assert_eq!(dominance(&b, &a), Ordering::Greater);
/// assert_eq!(dominance(&a, &a), Ordering::Equal);
/// ```
pub fn dominance(a: &Solution, b: &Solution) -> Ordering {
    let va = a.overall_constraint_violation;
    let vb = b.overall_constraint_violation;
    if va != vb && (va > 0.0 || vb > 0.0) {
        return va.total_cmp(&vb);
    }
    pareto_dominance(&a.objectives, &b.objectives)
}

/// Pareto dominance on raw objective vectors, ignoring constraints.
pub fn pareto_dominance(a: &[f64], b: &[f64]) -> Ordering {
    let mut a_better = false;
    let mut b_better = false;
    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better = true;
        } else if vb < va {
            b_better = true;
        }
        if a_better && b_better {
            return Ordering::Equal;
        }
    }
    match (a_better, b_better) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Whether every objective of `a` equals the matching objective of `b`.
pub fn objectives_equal(a: &Solution, b: &Solution) -> bool {
    a.objectives.len() == b.objectives.len()
        && a.objectives.iter().zip(b.objectives.iter()).all(|(x, y)| x == y)
}

/// [`dominance`] as a comparator object.
#[derive(Debug, Clone, Copy, Default)]
pub struct DominanceComparator;

impl SolutionComparator for DominanceComparator {
    fn compare(&self, a: &Solution, b: &Solution) -> Ordering {
        dominance(a, b)
    }
}

/// Equality of objective vectors.
///
/// Returns `Equal` only when every objective is exactly equal; otherwise
/// orders by the first differing objective.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualSolutions;

impl SolutionComparator for EqualSolutions {
    fn compare(&self, a: &Solution, b: &Solution) -> Ordering {
        for (x, y) in a.objectives.iter().zip(b.objectives.iter()) {
            match x.total_cmp(y) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        a.objectives.len().cmp(&b.objectives.len())
    }
}

/// Larger crowding distance first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrowdingDistanceComparator;

impl SolutionComparator for CrowdingDistanceComparator {
    fn compare(&self, a: &Solution, b: &Solution) -> Ordering {
        b.crowding_distance.total_cmp(&a.crowding_distance)
    }
}

/// Orders by a single objective.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveComparator {
    /// Objective index.
    pub index: usize,
    /// Larger values first when `true`.
    pub descending: bool,
}

impl ObjectiveComparator {
    /// Ascending order on objective `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            descending: false,
        }
    }

    /// Descending order on objective `index`.
    pub fn descending(index: usize) -> Self {
        Self {
            index,
            descending: true,
        }
    }

    /// Compares optional operands; `None` sorts last in either direction.
    pub fn compare_nullable(&self, a: Option<&Solution>, b: Option<&Solution>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.compare(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl SolutionComparator for ObjectiveComparator {
    fn compare(&self, a: &Solution, b: &Solution) -> Ordering {
        let ord = a.objectives[self.index].total_cmp(&b.objectives[self.index]);
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

/// Smaller overall constraint violation first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintViolationComparator;

impl ConstraintViolationComparator {
    /// Whether the constraint comparison is meaningful: at least one
    /// solution is infeasible. Two feasible solutions are incomparable.
    pub fn needs_to_compare(&self, a: &Solution, b: &Solution) -> bool {
        !a.is_feasible() || !b.is_feasible()
    }
}

impl SolutionComparator for ConstraintViolationComparator {
    fn compare(&self, a: &Solution, b: &Solution) -> Ordering {
        if !self.needs_to_compare(a, b) {
            return Ordering::Equal;
        }
        a.overall_constraint_violation
            .total_cmp(&b.overall_constraint_violation)
    }
}

/// Smaller fitness first.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitnessComparator;

impl SolutionComparator for FitnessComparator {
    fn compare(&self, a: &Solution, b: &Solution) -> Ordering {
        a.fitness.total_cmp(&b.fitness)
    }
}
