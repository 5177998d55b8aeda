//! Bounded non-dominated archives.
//!
//! Every [`Archive`] keeps the invariant that no member Pareto-dominates
//! another. They differ in what they evict once full:
//!
//! - [`CrowdingArchive`]: the member with the smallest crowding distance
//! - [`AdaptiveGridArchive`]: a member of the most populated hypercube of
//!   an [`AdaptiveGrid`]
//! - [`HypervolumeArchive`]: the member contributing the least hypervolume

mod adaptive_grid;
mod crowding;
mod grid;
mod hypervolume;

pub use adaptive_grid::AdaptiveGridArchive;
pub use crowding::CrowdingArchive;
pub use grid::AdaptiveGrid;
pub use hypervolume::HypervolumeArchive;

use crate::core::{dominance, objectives_equal, Solution, SolutionSet};
use std::cmp::Ordering;

/// A bounded container of mutually non-dominated solutions.
pub trait Archive: Send {
    /// Offers a solution. Returns `true` when it is a member afterwards.
    ///
    /// Members the candidate dominates are removed first. A candidate
    /// dominated by a member is rejected. When the archive overflows, the
    /// evicted member may be the candidate itself, and `false` is returned.
    fn add(&mut self, solution: Solution) -> bool;

    /// The current members.
    fn solutions(&self) -> &SolutionSet;

    /// Maximum number of members.
    fn max_size(&self) -> usize;

    /// Removes every member.
    fn clear(&mut self);

    /// Number of members.
    fn len(&self) -> usize {
        self.solutions().len()
    }

    /// Whether the archive is empty.
    fn is_empty(&self) -> bool {
        self.solutions().is_empty()
    }
}

/// Outcome of screening a candidate against the members of an archive.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Screening {
    /// Keep the candidate. Members it dominated are already removed.
    Accept,
    /// A member dominates the candidate, or has identical objectives.
    Reject,
}

/// Removes every member `candidate` dominates; rejects it if a member
/// dominates it or, when `reject_equal` is set, matches it exactly.
pub(crate) fn screen(
    members: &mut SolutionSet,
    candidate: &Solution,
    reject_equal: bool,
) -> Screening {
    let mut i = 0;
    while i < members.len() {
        match dominance(candidate, members.get(i)) {
            Ordering::Greater => return Screening::Reject,
            Ordering::Less => {
                members.remove(i);
            }
            Ordering::Equal => {
                if reject_equal && objectives_equal(members.get(i), candidate) {
                    return Screening::Reject;
                }
                i += 1;
            }
        }
    }
    Screening::Accept
}
