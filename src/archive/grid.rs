//! Adaptive hypercube grid over objective space.
//!
//! Each objective range `[min, max]` of the current population is bisected
//! `bisections` times, giving `2^bisections` bands per objective and
//! `2^(bisections·M)` hypercubes overall. The grid only stores a count per
//! hypercube; locations are always recomputed from objective values, so
//! the grid never holds indices into a solution list.
//!
//! # References
//!
//! - Knowles & Corne (2000), "Approximating the Nondominated Front Using
//!   the Pareto Archived Evolution Strategy"

use crate::core::{Solution, SolutionSet};
use crate::random;
use rand::RngCore;

/// Hypercube occupancy counts over an adaptive objective-space grid.
#[derive(Debug, Clone)]
pub struct AdaptiveGrid {
    bisections: usize,
    objectives: usize,
    hypercubes: Vec<usize>,
    lower_limits: Vec<f64>,
    upper_limits: Vec<f64>,
    division_size: Vec<f64>,
    most_populated: usize,
    occupied: Vec<usize>,
}

impl AdaptiveGrid {
    /// Creates an empty grid.
    ///
    /// # Panics
    /// Panics if `bisections · objectives` is too large to index.
    pub fn new(bisections: usize, objectives: usize) -> Self {
        let bits = bisections * objectives;
        assert!(bits < usize::BITS as usize, "grid too fine: 2^{bits} hypercubes");
        Self {
            bisections,
            objectives,
            hypercubes: vec![0; 1usize << bits],
            lower_limits: vec![f64::MAX; objectives],
            upper_limits: vec![f64::MIN; objectives],
            division_size: vec![0.0; objectives],
            most_populated: 0,
            occupied: Vec::new(),
        }
    }

    /// Number of bisections per objective.
    pub fn bisections(&self) -> usize {
        self.bisections
    }

    /// Total number of hypercubes.
    pub fn number_of_hypercubes(&self) -> usize {
        self.hypercubes.len()
    }

    /// Number of solutions counted in hypercube `location`.
    pub fn density(&self, location: usize) -> usize {
        self.hypercubes[location]
    }

    /// The hypercube holding the most solutions.
    pub fn most_populated(&self) -> usize {
        self.most_populated
    }

    /// Number of hypercubes holding at least one solution.
    pub fn occupied_hypercubes(&self) -> usize {
        self.occupied.len()
    }

    /// Average number of solutions per occupied hypercube.
    pub fn average_occupation(&self) -> f64 {
        if self.occupied.is_empty() {
            return 0.0;
        }
        let total: usize = self.occupied.iter().map(|&c| self.hypercubes[c]).sum();
        total as f64 / self.occupied.len() as f64
    }

    /// Rebuilds the grid from scratch for `set`.
    pub fn update_grid(&mut self, set: &SolutionSet) {
        self.update_limits(set);
        self.rebuild(set);
    }

    /// Rebuilds the grid only if `solution` falls outside its current
    /// limits, widening the limits to include it.
    pub fn update_grid_with(&mut self, solution: &Solution, set: &SolutionSet) {
        if self.location(solution).is_some() {
            return;
        }
        self.update_limits(set);
        for (obj, &v) in solution.objectives.iter().enumerate().take(self.objectives) {
            if v < self.lower_limits[obj] {
                self.lower_limits[obj] = v;
            }
            if v > self.upper_limits[obj] {
                self.upper_limits[obj] = v;
            }
        }
        self.rebuild(set);
    }

    /// The hypercube containing `solution`, or `None` when it lies outside
    /// the grid limits.
    pub fn location(&self, solution: &Solution) -> Option<usize> {
        let bands = 1usize << self.bisections;
        let mut location = 0usize;

        for obj in 0..self.objectives {
            let value = solution.objectives[obj];
            let (lower, upper) = (self.lower_limits[obj], self.upper_limits[obj]);
            if !(lower..=upper).contains(&value) {
                return None;
            }

            let position = if value == lower {
                0
            } else if value == upper {
                bands - 1
            } else {
                let mut position = 0usize;
                let mut size = self.division_size[obj];
                let mut ranges = bands;
                let mut account = lower;
                for _ in 0..self.bisections {
                    size /= 2.0;
                    ranges /= 2;
                    if value > account + size {
                        position += ranges;
                        account += size;
                    }
                }
                position
            };

            location += position << (obj * self.bisections);
        }

        Some(location)
    }

    /// Decrements the count of hypercube `location`.
    pub fn remove_solution(&mut self, location: usize) {
        self.hypercubes[location] = self.hypercubes[location].saturating_sub(1);
        if location == self.most_populated {
            self.recompute_most_populated();
        }
        if self.hypercubes[location] == 0 {
            self.recompute_occupied();
        }
    }

    /// Increments the count of hypercube `location`.
    pub fn add_solution(&mut self, location: usize) {
        self.hypercubes[location] += 1;
        if self.hypercubes[location] > self.hypercubes[self.most_populated] {
            self.most_populated = location;
        }
        if self.hypercubes[location] == 1 {
            self.recompute_occupied();
        }
    }

    /// Picks an occupied hypercube with probability proportional to the
    /// inverse of its density.
    pub fn roulette_wheel(&self, rng: &mut dyn RngCore) -> Option<usize> {
        if self.occupied.is_empty() {
            return None;
        }
        let inverse_sum: f64 = self
            .occupied
            .iter()
            .map(|&c| 1.0 / self.hypercubes[c] as f64)
            .sum();
        let target = random::uniform(rng, 0.0, inverse_sum);
        let mut accumulated = 0.0;
        for &cube in &self.occupied {
            accumulated += 1.0 / self.hypercubes[cube] as f64;
            if accumulated > target {
                return Some(cube);
            }
        }
        self.occupied.last().copied()
    }

    /// A uniformly chosen occupied hypercube.
    pub fn random_occupied_hypercube(&self, rng: &mut dyn RngCore) -> Option<usize> {
        if self.occupied.is_empty() {
            None
        } else {
            Some(self.occupied[random::index(rng, self.occupied.len())])
        }
    }

    fn update_limits(&mut self, set: &SolutionSet) {
        self.lower_limits.iter_mut().for_each(|l| *l = f64::MAX);
        self.upper_limits.iter_mut().for_each(|u| *u = f64::MIN);
        for s in set {
            for obj in 0..self.objectives {
                let v = s.objectives[obj];
                if v < self.lower_limits[obj] {
                    self.lower_limits[obj] = v;
                }
                if v > self.upper_limits[obj] {
                    self.upper_limits[obj] = v;
                }
            }
        }
    }

    fn rebuild(&mut self, set: &SolutionSet) {
        for obj in 0..self.objectives {
            self.division_size[obj] = self.upper_limits[obj] - self.lower_limits[obj];
        }
        self.hypercubes.iter_mut().for_each(|c| *c = 0);
        for s in set {
            if let Some(location) = self.location(s) {
                self.hypercubes[location] += 1;
            }
        }
        self.recompute_most_populated();
        self.recompute_occupied();
    }

    fn recompute_most_populated(&mut self) {
        let mut best = 0;
        for (i, &count) in self.hypercubes.iter().enumerate() {
            if count > self.hypercubes[best] {
                best = i;
            }
        }
        self.most_populated = best;
    }

    fn recompute_occupied(&mut self) {
        self.occupied = self
            .hypercubes
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, _)| i)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn sol(objs: &[f64]) -> Solution {
        Solution::from_objectives(objs.to_vec())
    }

    fn square() -> SolutionSet {
        vec![sol(&[0.0, 8.0]), sol(&[8.0, 0.0]), sol(&[3.0, 3.0])].into()
    }

    #[test]
    fn test_hypercube_count() {
        let grid = AdaptiveGrid::new(3, 2);
        assert_eq!(grid.number_of_hypercubes(), 64);
    }

    #[test]
    fn test_location_extremes_and_interior() {
        let mut grid = AdaptiveGrid::new(2, 2);
        grid.update_grid(&square());
        // (0, 8): obj0 lower → 0, obj1 upper → 3 → 0 + 3·4
        assert_eq!(grid.location(&sol(&[0.0, 8.0])), Some(12));
        // (8, 0): 3 + 0
        assert_eq!(grid.location(&sol(&[8.0, 0.0])), Some(3));
        // (3, 3): bands of width 2 → position 1 in both
        assert_eq!(grid.location(&sol(&[3.0, 3.0])), Some(1 + 4));
        assert_eq!(grid.location(&sol(&[9.0, 3.0])), None);
    }

    #[test]
    fn test_update_grid_with_widens_limits() {
        let mut grid = AdaptiveGrid::new(2, 2);
        let set = square();
        grid.update_grid(&set);
        let outside = sol(&[-8.0, 4.0]);
        assert!(grid.location(&outside).is_none());
        grid.update_grid_with(&outside, &set);
        assert!(grid.location(&outside).is_some());
        assert_eq!(grid.occupied_hypercubes(), 3);
    }

    #[test]
    fn test_add_and_remove_track_most_populated() {
        let mut grid = AdaptiveGrid::new(1, 1);
        let set: SolutionSet = vec![sol(&[0.0]), sol(&[10.0])].into();
        grid.update_grid(&set);
        grid.add_solution(1);
        assert_eq!(grid.most_populated(), 1);
        assert_eq!(grid.density(1), 2);
        grid.remove_solution(1);
        grid.remove_solution(1);
        assert_eq!(grid.most_populated(), 0);
        assert_eq!(grid.occupied_hypercubes(), 1);
    }

    #[test]
    fn test_roulette_prefers_sparse_cubes() {
        let mut grid = AdaptiveGrid::new(1, 1);
        let mut members = vec![sol(&[0.0]), sol(&[10.0])];
        for _ in 0..8 {
            members.push(sol(&[10.0]));
        }
        let set: SolutionSet = members.into();
        grid.update_grid(&set);
        let mut rng = create_rng(5);
        let sparse = (0..2000)
            .filter(|_| grid.roulette_wheel(&mut rng) == Some(0))
            .count();
        // 1/1 vs 1/9 → cube 0 chosen ~90% of the time
        assert!(sparse > 1600, "sparse cube chosen {sparse} times");
        assert!(grid.random_occupied_hypercube(&mut rng).is_some());
    }
}
