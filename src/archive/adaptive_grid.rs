//! Adaptive-grid archive (PAES style).

use super::grid::AdaptiveGrid;
use super::Archive;
use crate::core::{dominance, Solution, SolutionSet};
use std::cmp::Ordering;

/// Bounded non-dominated archive that evicts from the most crowded
/// hypercube of an [`AdaptiveGrid`].
///
/// When full, a candidate that would itself land in the most populated
/// hypercube is rejected. Otherwise exactly one member of the most
/// populated hypercube is evicted to make room.
#[derive(Debug, Clone)]
pub struct AdaptiveGridArchive {
    members: SolutionSet,
    grid: AdaptiveGrid,
    max_size: usize,
}

impl AdaptiveGridArchive {
    /// Creates an empty archive.
    ///
    /// `bisections` is the number of times each objective range is halved.
    pub fn new(max_size: usize, bisections: usize, objectives: usize) -> Self {
        Self {
            members: SolutionSet::new(),
            grid: AdaptiveGrid::new(bisections, objectives),
            max_size,
        }
    }

    /// The grid indexing the current members.
    pub fn grid(&self) -> &AdaptiveGrid {
        &self.grid
    }

    /// Consumes the archive, returning its members.
    pub fn into_solution_set(self) -> SolutionSet {
        self.members
    }

    fn remove_member(&mut self, index: usize) {
        let removed = self.members.remove(index);
        match self.grid.location(&removed) {
            Some(location) if self.grid.density(location) > 1 => {
                self.grid.remove_solution(location);
            }
            _ => self.grid.update_grid(&self.members),
        }
    }
}

impl Archive for AdaptiveGridArchive {
    fn add(&mut self, solution: Solution) -> bool {
        let mut i = 0;
        while i < self.members.len() {
            match dominance(&solution, self.members.get(i)) {
                Ordering::Less => self.remove_member(i),
                Ordering::Greater => return false,
                Ordering::Equal => i += 1,
            }
        }

        if self.members.is_empty() {
            self.members.push(solution);
            self.grid.update_grid(&self.members);
            return true;
        }

        self.grid.update_grid_with(&solution, &self.members);
        let Some(location) = self.grid.location(&solution) else {
            self.members.push(solution);
            self.grid.update_grid(&self.members);
            return true;
        };

        if self.members.len() < self.max_size {
            self.grid.add_solution(location);
            self.members.push(solution);
            return true;
        }

        let crowded = self.grid.most_populated();
        if location == crowded {
            return false;
        }

        let victim = self
            .members
            .iter()
            .position(|s| self.grid.location(s) == Some(crowded));
        if let Some(victim) = victim {
            self.members.remove(victim);
            self.grid.remove_solution(crowded);
        }
        self.grid.add_solution(location);
        self.members.push(solution);
        debug_assert!(self.members.len() <= self.max_size);
        true
    }

    fn solutions(&self) -> &SolutionSet {
        &self.members
    }

    fn max_size(&self) -> usize {
        self.max_size
    }

    fn clear(&mut self) {
        self.members.clear();
        self.grid.update_grid(&self.members);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sol(objs: &[f64]) -> Solution {
        Solution::from_objectives(objs.to_vec())
    }

    #[test]
    fn test_first_member_builds_grid() {
        let mut archive = AdaptiveGridArchive::new(4, 2, 2);
        assert!(archive.add(sol(&[1.0, 1.0])));
        assert_eq!(archive.grid().occupied_hypercubes(), 1);
    }

    #[test]
    fn test_dominated_candidate_rejected() {
        let mut archive = AdaptiveGridArchive::new(4, 2, 2);
        archive.add(sol(&[1.0, 1.0]));
        assert!(!archive.add(sol(&[2.0, 2.0])));
        assert!(archive.add(sol(&[0.0, 0.0])));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_full_archive_evicts_exactly_one_from_crowded_cube() {
        let mut archive = AdaptiveGridArchive::new(4, 1, 2);
        // Extremes fix the limits to [0, 10] on both objectives.
        archive.add(sol(&[0.0, 10.0]));
        archive.add(sol(&[10.0, 0.0]));
        // Two members in the upper-left quadrant.
        archive.add(sol(&[1.0, 8.0]));
        archive.add(sol(&[2.0, 7.0]));
        assert_eq!(archive.len(), 4);

        // Lands in the lower-right quadrant, which is not the most crowded.
        assert!(archive.add(sol(&[7.0, 2.0])));
        assert_eq!(archive.len(), 4);
        let objs = archive.solutions().objectives_matrix();
        assert!(objs.contains(&vec![7.0, 2.0]));
    }

    #[test]
    fn test_full_archive_rejects_candidate_in_crowded_cube() {
        let mut archive = AdaptiveGridArchive::new(4, 1, 2);
        archive.add(sol(&[0.0, 10.0]));
        archive.add(sol(&[10.0, 0.0]));
        archive.add(sol(&[1.0, 8.0]));
        archive.add(sol(&[2.0, 7.0]));
        let before = archive.solutions().clone();
        assert!(!archive.add(sol(&[3.0, 6.0])));
        assert_eq!(archive.solutions(), &before);
    }
}
