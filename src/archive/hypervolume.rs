//! Hypervolume-contribution archive.

use super::{screen, Archive, Screening};
use crate::core::{CrowdingDistanceComparator, Solution, SolutionSet};
use crate::indicators::FastHypervolume;

/// Bounded non-dominated archive that, once full, evicts the member
/// contributing the least hypervolume.
///
/// Contributions are written into each member's `crowding_distance`
/// field, so the smallest "crowding distance" is the least contributor.
#[derive(Debug, Clone)]
pub struct HypervolumeArchive {
    members: SolutionSet,
    max_size: usize,
    hypervolume: FastHypervolume,
}

impl HypervolumeArchive {
    /// Creates an empty archive using the default reference offset.
    pub fn new(max_size: usize) -> Self {
        Self::with_hypervolume(max_size, FastHypervolume::new())
    }

    /// Creates an empty archive with a custom hypervolume calculator.
    pub fn with_hypervolume(max_size: usize, hypervolume: FastHypervolume) -> Self {
        Self {
            members: SolutionSet::new(),
            max_size,
            hypervolume,
        }
    }

    /// Consumes the archive, returning its members.
    pub fn into_solution_set(self) -> SolutionSet {
        self.members
    }
}

impl Archive for HypervolumeArchive {
    fn add(&mut self, solution: Solution) -> bool {
        if screen(&mut self.members, &solution, true) == Screening::Reject {
            return false;
        }
        self.members.push(solution);
        if self.members.len() > self.max_size {
            self.hypervolume
                .compute_hv_contributions(self.members.as_mut_slice());
            let candidate = self.members.len() - 1;
            if let Some(worst) = self.members.index_worst(&CrowdingDistanceComparator) {
                self.members.remove(worst);
                return worst != candidate;
            }
        }
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sol(objs: &[f64]) -> Solution {
        Solution::from_objectives(objs.to_vec())
    }

    #[test]
    fn test_evicts_least_contributor() {
        let mut archive = HypervolumeArchive::with_hypervolume(3, FastHypervolume::with_offset(1.0));
        archive.add(sol(&[0.0, 10.0]));
        archive.add(sol(&[10.0, 0.0]));
        archive.add(sol(&[5.0, 5.0]));
        // Sits right next to (5,5); contributes almost nothing.
        assert!(!archive.add(sol(&[5.1, 4.95])));
        assert_eq!(archive.len(), 3);
        let objs = archive.solutions().objectives_matrix();
        assert!(!objs.contains(&vec![5.1, 4.95]));
        assert!(objs.contains(&vec![0.0, 10.0]));
        assert!(objs.contains(&vec![10.0, 0.0]));
    }

    #[test]
    fn test_hypervolume_never_shrinks_below_capacity() {
        let hv = FastHypervolume::new();
        let mut archive = HypervolumeArchive::new(10);
        let mut last = 0.0;
        for i in 0..8 {
            let x = i as f64;
            archive.add(sol(&[x, 7.0 - x]));
            let reference = [50.0, 50.0];
            let now = hv.compute_hypervolume_with_reference(archive.solutions().as_slice(), &reference);
            assert!(now >= last);
            last = now;
        }
    }
}
