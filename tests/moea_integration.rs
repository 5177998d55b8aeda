//! End-to-end scenarios on the two-parabola problem and hypervolume oracles.

use u_moea::abyss::{AbyssConfig, AbyssRunner, ScatterSearch};
use u_moea::core::{pareto_dominance, Problem, Solution, SolutionSet};
use u_moea::indicators::{FastHypervolume, Front, QualityIndicator, WfgHypervolume};
use u_moea::smpso::{SmpsoConfig, SmpsoRunner};
use u_moea::Result;

use std::cmp::Ordering;

// ===========================================================================
// Problem: f0 = x², f1 = (x − 2)², x ∈ [−10, 10]
// ===========================================================================

struct Parabolas;

impl Problem for Parabolas {
    fn name(&self) -> &str {
        "parabolas"
    }
    fn number_of_variables(&self) -> usize {
        1
    }
    fn number_of_objectives(&self) -> usize {
        2
    }
    fn lower_limit(&self, _i: usize) -> f64 {
        -10.0
    }
    fn upper_limit(&self, _i: usize) -> f64 {
        10.0
    }
    fn evaluate(&self, s: &mut Solution) -> Result<()> {
        let x = s.real_value(0);
        s.objectives = vec![x * x, (x - 2.0) * (x - 2.0)];
        Ok(())
    }
}

/// The Pareto front sampled at `t ∈ [0, 2]`.
fn true_front(samples: usize) -> Vec<Vec<f64>> {
    (0..=samples)
        .map(|i| {
            let t = 2.0 * i as f64 / samples as f64;
            vec![t * t, (t - 2.0) * (t - 2.0)]
        })
        .collect()
}

fn distance_to_front(objectives: &[f64], front: &[Vec<f64>]) -> f64 {
    front
        .iter()
        .map(|p| {
            p.iter()
                .zip(objectives)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt()
        })
        .fold(f64::INFINITY, f64::min)
}

fn assert_mutually_non_dominated(set: &SolutionSet) {
    let objs = set.objectives_matrix();
    for a in &objs {
        for b in &objs {
            assert_ne!(pareto_dominance(a, b), Ordering::Less, "{a:?} dominates {b:?}");
        }
    }
}

// ===========================================================================
// SMPSO
// ===========================================================================

#[test]
fn test_smpso_converges_on_parabolas() {
    let config = SmpsoConfig::default()
        .with_swarm_size(50)
        .with_archive_size(100)
        .with_max_iterations(250)
        .with_seed(2024);
    let result = SmpsoRunner::run(&Parabolas, &config).unwrap();

    assert!(!result.leaders.is_empty());
    assert!(result.leaders.len() <= 100);
    assert_mutually_non_dominated(&result.leaders);

    let front = true_front(2000);
    let worst = result
        .leaders
        .iter()
        .map(|s| distance_to_front(&s.objectives, &front))
        .fold(0.0, f64::max);
    assert!(worst < 0.5, "worst distance to front: {worst}");
}

// ===========================================================================
// AbYSS
// ===========================================================================

#[test]
fn test_abyss_converges_on_parabolas() {
    let config = AbyssConfig::default()
        .with_max_evaluations(5_000)
        .with_seed(2024);
    let result = AbyssRunner::run(&Parabolas, &config).unwrap();

    assert!(!result.archive.is_empty());
    assert!(result.archive.len() <= 100);
    assert!(result.evaluations >= 5_000);
    assert_mutually_non_dominated(&result.archive);

    let front = true_front(2000);
    let worst = result
        .archive
        .iter()
        .map(|s| distance_to_front(&s.objectives, &front))
        .fold(0.0, f64::max);
    assert!(worst < 0.5, "worst distance to front: {worst}");
}

#[test]
fn test_abyss_ref_set1_replacement() {
    let config = AbyssConfig::default().with_seed(9);
    let mut search = ScatterSearch::new(&Parabolas, &config).unwrap();
    search.initialize().unwrap();
    search.reference_set_update(true).unwrap();
    assert_eq!(search.ref_set1().len(), 10);

    // Unreachable objectives, better than every member in both objectives.
    let mut champion = search.ref_set1().get(0).clone();
    champion.objectives = vec![-1.0, -1.0];

    assert!(search.ref_set1_test(&champion));
    assert_eq!(search.ref_set1().len(), 1);
    assert_eq!(search.ref_set1().get(0).objectives, vec![-1.0, -1.0]);
}

// ===========================================================================
// Hypervolume oracles
// ===========================================================================

#[test]
fn test_hypervolume_two_objectives_oracle() {
    let points = vec![vec![1.0, 4.0], vec![2.0, 2.0], vec![4.0, 1.0]];
    let wfg = WfgHypervolume::new(vec![5.0, 5.0]).compute(&Front::from_matrix(points.clone()));
    assert!((wfg - 11.0).abs() < 1e-12, "{wfg}");

    let solutions: Vec<Solution> = points.into_iter().map(Solution::from_objectives).collect();
    let fast = FastHypervolume::new().compute_hypervolume_with_reference(&solutions, &[5.0, 5.0]);
    assert!((fast - 11.0).abs() < 1e-12, "{fast}");
}

#[test]
fn test_hypervolume_three_objectives_oracle() {
    let front = Front::from_matrix(vec![vec![1.0, 1.0, 1.0], vec![0.5, 2.0, 2.0]]);
    let hv = WfgHypervolume::new(vec![3.0, 3.0, 3.0]).compute(&front);
    // 8 + 2.5 − 2 (overlap)
    assert!((hv - 8.5).abs() < 1e-12, "{hv}");
}

#[test]
fn test_hypervolume_ignores_points_outside_reference() {
    let front = Front::from_matrix(vec![vec![1.0, 1.0], vec![6.0, 0.5]]);
    let hv = WfgHypervolume::new(vec![2.0, 2.0]).compute(&front);
    assert!((hv - 1.0).abs() < 1e-12, "{hv}");
}

#[test]
fn test_quality_of_the_true_front_itself() {
    let truth = true_front(50);
    let qi = QualityIndicator::new(truth.clone()).unwrap();
    let set: SolutionSet = truth.into_iter().map(Solution::from_objectives).collect();

    assert!(qi.gd(&set).abs() < 1e-12);
    assert!(qi.igd(&set).abs() < 1e-12);
    assert!(qi.epsilon(&set).abs() < 1e-12);
    assert!((qi.hypervolume(&set) - qi.true_front_hypervolume()).abs() < 1e-9);
}

#[test]
fn test_smpso_front_quality() {
    let config = SmpsoConfig::default()
        .with_swarm_size(50)
        .with_max_iterations(100)
        .with_seed(7);
    let result = SmpsoRunner::run(&Parabolas, &config).unwrap();
    let qi = QualityIndicator::new(true_front(500)).unwrap();

    assert!(qi.gd(&result.leaders) < 0.05, "gd = {}", qi.gd(&result.leaders));
    assert!(qi.hypervolume(&result.leaders) > 0.5 * qi.true_front_hypervolume());
}
