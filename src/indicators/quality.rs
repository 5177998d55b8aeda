//! Quality indicators against a known Pareto front.

use super::front::{max_values, min_values, normalize, read_front, Front};
use super::metrics;
use super::wfg::WfgHypervolume;
use crate::core::SolutionSet;
use crate::error::{MoeaError, Result};
use std::path::Path;

/// Scores approximation fronts against a stored true Pareto front.
///
/// Every indicator first normalizes both the candidate and the true
/// front with the true front's per-objective minimum and maximum, then
/// applies its metric in the unit box.
///
/// # Examples
///
/// ```
/// use u_moea::core::{Solution, SolutionSet};
/// use u_moea::indicators::QualityIndicator;
///
/// let truth = vec![vec![0.0, 1.0], vec![0.5, 0.5], vec![1.0, 0.0]];
/// let qi = QualityIndicator::new(truth).unwrap();
///
/// let front: SolutionSet = vec![
///     Solution::from_objectives(vec![0.0, 1.0]),
///     Solution::from_objectives(vec![1.0, 0.0]),
/// ].into();
/// assert_eq!(qi.gd(&front), 0.0);
/// assert!(qi.igd(&front) > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct QualityIndicator {
    true_front: Vec<Vec<f64>>,
    min: Vec<f64>,
    max: Vec<f64>,
    normalized_true_front: Vec<Vec<f64>>,
    true_front_hypervolume: f64,
}

impl QualityIndicator {
    /// Builds an indicator from the true front's objective vectors.
    pub fn new(true_front: Vec<Vec<f64>>) -> Result<Self> {
        let Some(first) = true_front.first() else {
            return Err(MoeaError::InvalidConfig("true Pareto front is empty".into()));
        };
        let m = first.len();
        if true_front.iter().any(|p| p.len() != m) {
            return Err(MoeaError::Parse(
                "true Pareto front rows differ in length".into(),
            ));
        }
        let min = min_values(&true_front, m);
        let max = max_values(&true_front, m);
        let normalized_true_front = normalize(&true_front, &min, &max);
        let true_front_hypervolume = unit_hypervolume(&normalized_true_front, m);
        Ok(Self {
            true_front,
            min,
            max,
            normalized_true_front,
            true_front_hypervolume,
        })
    }

    /// Loads the true front from a whitespace-separated text file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(read_front(path)?)
    }

    /// The true front as given.
    pub fn true_front(&self) -> &[Vec<f64>] {
        &self.true_front
    }

    /// Hypervolume of the normalized true front (cached).
    pub fn true_front_hypervolume(&self) -> f64 {
        self.true_front_hypervolume
    }

    /// Hypervolume of the normalized front against reference `(1, …, 1)`.
    pub fn hypervolume(&self, set: &SolutionSet) -> f64 {
        unit_hypervolume(&self.normalized(set), self.min.len())
    }

    /// Generational distance of the normalized front.
    pub fn gd(&self, set: &SolutionSet) -> f64 {
        metrics::generational_distance(&self.normalized(set), &self.normalized_true_front)
    }

    /// Inverted generational distance of the normalized front.
    pub fn igd(&self, set: &SolutionSet) -> f64 {
        metrics::inverted_generational_distance(&self.normalized(set), &self.normalized_true_front)
    }

    /// Spread Δ of the normalized front.
    pub fn spread(&self, set: &SolutionSet) -> f64 {
        metrics::spread(&self.normalized(set), &self.normalized_true_front)
    }

    /// Additive ε of the normalized front.
    pub fn epsilon(&self, set: &SolutionSet) -> f64 {
        metrics::additive_epsilon(&self.normalized(set), &self.normalized_true_front)
    }

    fn normalized(&self, set: &SolutionSet) -> Vec<Vec<f64>> {
        normalize(&set.objectives_matrix(), &self.min, &self.max)
    }
}

fn unit_hypervolume(front: &[Vec<f64>], dimensions: usize) -> f64 {
    WfgHypervolume::new(vec![1.0; dimensions]).compute(&Front::from_matrix(front.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Solution;

    fn truth() -> Vec<Vec<f64>> {
        (0..=10)
            .map(|i| {
                let t = i as f64 / 10.0;
                vec![2.0 * t, 4.0 * (1.0 - t)]
            })
            .collect()
    }

    fn set(rows: Vec<Vec<f64>>) -> SolutionSet {
        rows.into_iter().map(Solution::from_objectives).collect()
    }

    #[test]
    fn test_empty_true_front_rejected() {
        assert!(matches!(
            QualityIndicator::new(Vec::new()),
            Err(MoeaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_ragged_true_front_rejected() {
        assert!(QualityIndicator::new(vec![vec![0.0, 1.0], vec![1.0]]).is_err());
    }

    #[test]
    fn test_true_front_scores_perfectly() {
        let qi = QualityIndicator::new(truth()).unwrap();
        let front = set(truth());
        assert_eq!(qi.gd(&front), 0.0);
        assert_eq!(qi.igd(&front), 0.0);
        assert_eq!(qi.epsilon(&front), 0.0);
        assert!((qi.hypervolume(&front) - qi.true_front_hypervolume()).abs() < 1e-12);
    }

    #[test]
    fn test_dominated_front_scores_worse() {
        let qi = QualityIndicator::new(truth()).unwrap();
        let shifted = set(truth().into_iter().map(|p| vec![p[0] + 0.2, p[1] + 0.4]).collect());
        assert!(qi.gd(&shifted) > 0.0);
        assert!(qi.epsilon(&shifted) > 0.09);
        assert!(qi.hypervolume(&shifted) < qi.true_front_hypervolume());
    }

    #[test]
    fn test_from_file_missing() {
        assert!(QualityIndicator::from_file("/no/such/front.pf").is_err());
    }
}
