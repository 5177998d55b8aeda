//! Hypervolume of solution sets and per-solution contributions.

use super::front::Front;
use super::wfg::{hv2, WfgHypervolume};
use crate::core::{Solution, SolutionSet};

/// Default distance added beyond the worst objective value to form the
/// reference point.
pub const DEFAULT_OFFSET: f64 = 20.0;

/// Hypervolume of raw solution sets, with a data-derived reference point.
///
/// The reference point is the per-objective maximum (never below 0) plus
/// [`offset`](Self::offset). Two objectives use a closed-form strip sweep;
/// three or more use [`WfgHypervolume`].
#[derive(Debug, Clone, Copy)]
pub struct FastHypervolume {
    /// Distance beyond the worst point at which the reference is placed.
    pub offset: f64,
}

impl Default for FastHypervolume {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
        }
    }
}

impl FastHypervolume {
    /// A calculator with the default offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// A calculator with a custom offset.
    pub fn with_offset(offset: f64) -> Self {
        Self { offset }
    }

    /// Per-objective maximum (floored at 0) plus the offset.
    pub fn reference_point(&self, solutions: &[Solution]) -> Vec<f64> {
        let m = solutions.first().map_or(0, Solution::number_of_objectives);
        let mut reference = vec![0.0f64; m];
        for s in solutions {
            for (r, &v) in reference.iter_mut().zip(&s.objectives) {
                *r = r.max(v);
            }
        }
        reference.iter_mut().for_each(|r| *r += self.offset);
        reference
    }

    /// Hypervolume against the data-derived reference point.
    pub fn compute_hypervolume(&self, set: &SolutionSet) -> f64 {
        let reference = self.reference_point(set.as_slice());
        self.compute_hypervolume_with_reference(set.as_slice(), &reference)
    }

    /// Hypervolume against an explicit reference point.
    pub fn compute_hypervolume_with_reference(
        &self,
        solutions: &[Solution],
        reference: &[f64],
    ) -> f64 {
        if solutions.is_empty() {
            return 0.0;
        }
        let front = Front::from_matrix(solutions.iter().map(|s| s.objectives.clone()).collect());
        if reference.len() == 2 {
            let mut points = front.filtered(reference).to_matrix();
            hv2(&mut points, reference)
        } else {
            WfgHypervolume::new(reference.to_vec()).compute(&front)
        }
    }

    /// Writes each solution's exclusive hypervolume into `crowding_distance`.
    ///
    /// A single solution receives its whole hypervolume.
    pub fn compute_hv_contributions(&self, solutions: &mut [Solution]) {
        if solutions.is_empty() {
            return;
        }
        let reference = self.reference_point(solutions);
        let total = self.compute_hypervolume_with_reference(solutions, &reference);
        let contributions: Vec<f64> = (0..solutions.len())
            .map(|i| {
                let rest: Vec<Solution> = solutions
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, s)| s.clone())
                    .collect();
                total - self.compute_hypervolume_with_reference(&rest, &reference)
            })
            .collect();
        for (s, c) in solutions.iter_mut().zip(contributions) {
            s.crowding_distance = c;
        }
    }
}
