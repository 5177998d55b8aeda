//! Crowding-distance archive.

use super::{screen, Archive, Screening};
use crate::core::{CrowdingDistanceComparator, Solution, SolutionSet};
use crate::density::assign_crowding_distance;

/// Bounded non-dominated archive that, once full, evicts the member with
/// the smallest crowding distance.
///
/// Candidates with objectives identical to a member are rejected. When a
/// new member overflows the archive, crowding distances are recomputed
/// over all members (candidate included) and the least crowded-apart one
/// is removed. That may be the candidate itself.
///
/// # Examples
///
/// ```
/// use u_moea::archive::{Archive, CrowdingArchive};
/// use u_moea::core::Solution;
///
/// let mut archive = CrowdingArchive::new(2);
/// assert!(archive.add(Solution::from_objectives(vec![1.0, 3.0])));
/// assert!(!archive.add(Solution::from_objectives(vec![2.0, 4.0]))); // dominated
/// assert!(archive.add(Solution::from_objectives(vec![0.5, 0.5]))); // dominates
/// assert_eq!(archive.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CrowdingArchive {
    members: SolutionSet,
    max_size: usize,
}

impl CrowdingArchive {
    /// Creates an empty archive holding at most `max_size` members.
    pub fn new(max_size: usize) -> Self {
        Self {
            members: SolutionSet::new(),
            max_size,
        }
    }

    /// Recomputes the crowding distance of every member.
    pub fn assign_crowding_distance(&mut self) {
        assign_crowding_distance(self.members.as_mut_slice());
    }

    /// Consumes the archive, returning its members.
    pub fn into_solution_set(self) -> SolutionSet {
        self.members
    }
}

impl Archive for CrowdingArchive {
    fn add(&mut self, solution: Solution) -> bool {
        if screen(&mut self.members, &solution, true) == Screening::Reject {
            return false;
        }
        self.members.push(solution);
        if self.members.len() > self.max_size {
            self.assign_crowding_distance();
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
