//! Ordered, optionally bounded solution collections.

use super::comparator::SolutionComparator;
use super::solution::Solution;
use std::cmp::Ordering;
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An insertion-ordered list of solutions with an optional capacity.
///
/// A bounded set never exceeds its capacity: [`add`](Self::add) refuses
/// the solution and returns `false` instead. Index accessors panic when
/// the index is out of range.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolutionSet {
    solutions: Vec<Solution>,
    capacity: Option<usize>,
}

impl SolutionSet {
    /// An unbounded empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty set holding at most `capacity` solutions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            solutions: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// The capacity, if bounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Number of solutions.
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Whether a bounded set has reached its capacity.
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|c| self.solutions.len() >= c)
    }

    /// Appends a solution. Returns `false` (and drops it) when full.
    pub fn add(&mut self, solution: Solution) -> bool {
        if self.is_full() {
            warn!(
                capacity = self.capacity.unwrap_or_default(),
                "solution set is full; solution dropped"
            );
            return false;
        }
        self.solutions.push(solution);
        true
    }

    /// Appends without the capacity check. Callers restore the bound
    /// before their operation returns.
    pub(crate) fn push(&mut self, solution: Solution) {
        self.solutions.push(solution);
    }

    /// Solution at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn get(&self, index: usize) -> &Solution {
        &self.solutions[index]
    }

    /// Mutable solution at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn get_mut(&mut self, index: usize) -> &mut Solution {
        &mut self.solutions[index]
    }

    /// Removes and returns the solution at `index`, shifting later ones.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> Solution {
        self.solutions.remove(index)
    }

    /// Replaces the solution at `index`, returning the old one.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn replace(&mut self, index: usize, solution: Solution) -> Solution {
        std::mem::replace(&mut self.solutions[index], solution)
    }

    /// Removes every solution.
    pub fn clear(&mut self) {
        self.solutions.clear();
    }

    /// Keeps only the solutions matching `keep`.
    pub fn retain<F: FnMut(&Solution) -> bool>(&mut self, keep: F) {
        self.solutions.retain(keep);
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Solution> {
        self.solutions.iter()
    }

    /// Iterates mutably in insertion order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Solution> {
        self.solutions.iter_mut()
    }

    /// The solutions as a slice.
    pub fn as_slice(&self) -> &[Solution] {
        &self.solutions
    }

    /// The solutions as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [Solution] {
        &mut self.solutions
    }

    /// Consumes the set, returning its solutions.
    pub fn into_vec(self) -> Vec<Solution> {
        self.solutions
    }

    /// Stable in-place sort. `comparator` must be a total order.
    pub fn sort_by(&mut self, comparator: &dyn SolutionComparator) {
        self.solutions.sort_by(|a, b| comparator.compare(a, b));
    }

    /// Index of the first solution no other solution beats.
    pub fn index_best(&self, comparator: &dyn SolutionComparator) -> Option<usize> {
        self.extreme(comparator, Ordering::Less)
    }

    /// Index of the first solution that beats no other solution.
    pub fn index_worst(&self, comparator: &dyn SolutionComparator) -> Option<usize> {
        self.extreme(comparator, Ordering::Greater)
    }

    /// The best solution under `comparator`.
    pub fn best(&self, comparator: &dyn SolutionComparator) -> Option<&Solution> {
        self.index_best(comparator).map(|i| &self.solutions[i])
    }

    /// The worst solution under `comparator`.
    pub fn worst(&self, comparator: &dyn SolutionComparator) -> Option<&Solution> {
        self.index_worst(comparator).map(|i| &self.solutions[i])
    }

    /// A new unbounded set with the solutions of both sets.
    pub fn union(&self, other: &SolutionSet) -> SolutionSet {
        let mut solutions = Vec::with_capacity(self.len() + other.len());
        solutions.extend(self.solutions.iter().cloned());
        solutions.extend(other.solutions.iter().cloned());
        SolutionSet {
            solutions,
            capacity: None,
        }
    }

    /// Objective vectors, one row per solution.
    pub fn objectives_matrix(&self) -> Vec<Vec<f64>> {
        self.solutions.iter().map(|s| s.objectives.clone()).collect()
    }

    fn extreme(&self, comparator: &dyn SolutionComparator, better: Ordering) -> Option<usize> {
        let mut iter = self.solutions.iter().enumerate();
        let (mut idx, mut current) = iter.next()?;
        for (i, s) in iter {
            if comparator.compare(s, current) == better {
                idx = i;
                current = s;
            }
        }
        Some(idx)
    }
}

impl From<Vec<Solution>> for SolutionSet {
    fn from(solutions: Vec<Solution>) -> Self {
        Self {
            solutions,
            capacity: None,
        }
    }
}

impl FromIterator<Solution> for SolutionSet {
    fn from_iter<I: IntoIterator<Item = Solution>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl IntoIterator for SolutionSet {
    type Item = Solution;
    type IntoIter = std::vec::IntoIter<Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.into_iter()
    }
}

impl<'a> IntoIterator for &'a SolutionSet {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}

impl std::ops::Index<usize> for SolutionSet {
    type Output = Solution;

    fn index(&self, index: usize) -> &Solution {
        &self.solutions[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comparator::{CrowdingDistanceComparator, ObjectiveComparator};

    fn sol(objs: &[f64]) -> Solution {
        Solution::from_objectives(objs.to_vec())
    }

    #[test]
    fn test_capacity_enforced() {
        let mut set = SolutionSet::with_capacity(2);
        assert!(set.add(sol(&[1.0])));
        assert!(set.add(sol(&[2.0])));
        assert!(set.is_full());
        assert!(!set.add(sol(&[3.0])));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_unbounded_never_full() {
        let mut set = SolutionSet::new();
        for i in 0..100 {
            assert!(set.add(sol(&[i as f64])));
        }
        assert!(!set.is_full());
    }

    #[test]
    fn test_sort_is_stable() {
        let mut set: SolutionSet = (0..4)
            .map(|i| {
                let mut s = sol(&[i as f64]);
                s.crowding_distance = if i % 2 == 0 { 1.0 } else { 2.0 };
                s
            })
            .collect();
        set.sort_by(&CrowdingDistanceComparator);
        let order: Vec<f64> = set.iter().map(|s| s.objectives[0]).collect();
        assert_eq!(order, vec![1.0, 3.0, 0.0, 2.0]);
    }

    #[test]
    fn test_best_and_worst() {
        let set: SolutionSet = vec![sol(&[3.0]), sol(&[1.0]), sol(&[5.0]), sol(&[1.0])].into();
        let cmp = ObjectiveComparator::new(0);
        assert_eq!(set.index_best(&cmp), Some(1));
        assert_eq!(set.index_worst(&cmp), Some(2));
        assert!(SolutionSet::new().best(&cmp).is_none());
    }

    #[test]
    fn test_remove_and_replace() {
        let mut set: SolutionSet = vec![sol(&[0.0]), sol(&[1.0]), sol(&[2.0])].into();
        let removed = set.remove(1);
        assert_eq!(removed.objectives[0], 1.0);
        let old = set.replace(1, sol(&[9.0]));
        assert_eq!(old.objectives[0], 2.0);
        assert_eq!(set[1].objectives[0], 9.0);
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_range_panics() {
        let set = SolutionSet::new();
        set.get(0);
    }

    #[test]
    fn test_union_and_matrix() {
        let a: SolutionSet = vec![sol(&[1.0, 2.0])].into();
        let b: SolutionSet = vec![sol(&[3.0, 4.0])].into();
        let u = a.union(&b);
        assert_eq!(u.objectives_matrix(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }
}
