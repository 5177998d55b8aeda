//! Exact hypervolume in any dimension by WFG slicing.
//!
//! # Algorithm
//!
//! Points are sorted worst-first on the last objective `d`. Sweeping
//! along that objective, point `i` is present in every slice from its own
//! `d`-coordinate up to the reference point, and so are all points after
//! it in the order. The volume therefore splits into
//!
//! ```text
//! HV_d(S) = Σ_i |p_i[d] - r[d]| · exclusive_{d-1}(p_i, {p_j : j > i})
//! exclusive_k(p, Q) = inclusive_k(p) - HV_k(limit(p, Q))
//! limit(p, Q) = non-dominated { max(p, q) : q ∈ Q }
//! ```
//!
//! where `max` is component-wise (the worse coordinate under
//! minimization). The recursion bottoms out in a closed-form 2-D sweep,
//! so its depth is bounded by the number of objectives. Every level works
//! on a freshly built, immutable slice of points.
//!
//! # Complexity
//!
//! Exponential in the number of objectives in the worst case, but the
//! limit sets shrink quickly on typical fronts.
//!
//! # References
//!
//! - While, Bradstreet & Barone (2012), "A Fast Way of Calculating Exact
//!   Hypervolumes", IEEE TEVC 16(1)

use super::front::Front;
use crate::core::pareto_dominance;
use std::cmp::Ordering;

/// WFG hypervolume calculator bound to a reference point.
///
/// The reference point is the supremum of the measured region: only
/// points strictly better than it in every objective contribute.
///
/// # Examples
///
/// ```
/// use u_moea::indicators::{Front, WfgHypervolume};
///
/// let front = Front::from_matrix(vec![vec![1.0, 1.0, 1.0]]);
/// let hv = WfgHypervolume::new(vec![2.0, 3.0, 4.0]).compute(&front);
/// assert!((hv - 6.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct WfgHypervolume {
    reference: Vec<f64>,
}

impl WfgHypervolume {
    /// Creates a calculator for `reference`.
    pub fn new(reference: Vec<f64>) -> Self {
        Self { reference }
    }

    /// The reference point.
    pub fn reference(&self) -> &[f64] {
        &self.reference
    }

    /// Hypervolume dominated by `front` and bounded by the reference point.
    pub fn compute(&self, front: &Front) -> f64 {
        let clean = front.filtered(&self.reference);
        hv(clean.to_matrix(), self.reference.len(), &self.reference)
    }

    /// Volume contributed only by point `index` of `front`.
    pub fn exclusive(&self, front: &Front, index: usize) -> f64 {
        let rest = Front::from_matrix(
            front
                .points()
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, p)| p.objectives.clone())
                .collect(),
        );
        self.compute(front) - self.compute(&rest)
    }
}

/// Hypervolume of mutually non-dominated `points` over the first `dims`
/// coordinates.
fn hv(mut points: Vec<Vec<f64>>, dims: usize, reference: &[f64]) -> f64 {
    match (points.len(), dims) {
        (0, _) | (_, 0) => 0.0,
        (1, _) => inclusive(&points[0], dims, reference),
        (_, 1) => {
            let best = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
            (reference[0] - best).max(0.0)
        }
        (_, 2) => hv2(&mut points, reference),
        _ => {
            sort_worst_first(&mut points, dims);
            let last = dims - 1;
            let mut volume = 0.0;
            for i in 0..points.len() {
                let height = (points[i][last] - reference[last]).abs();
                volume += height * exclusive(&points, i, last, reference);
            }
            volume
        }
    }
}

/// Closed-form sweep for two objectives. `points` must lie strictly inside
/// the reference box; dominated points add nothing.
pub(super) fn hv2(points: &mut [Vec<f64>], reference: &[f64]) -> f64 {
    points.sort_by(|a, b| a[0].total_cmp(&b[0]).then(b[1].total_cmp(&a[1])));
    let mut area = 0.0;
    let mut ceiling = reference[1];
    for p in points.iter() {
        if p[1] < ceiling {
            area += (reference[0] - p[0]) * (ceiling - p[1]);
            ceiling = p[1];
        }
    }
    area
}

/// Volume of the box between `p` and the reference over `dims` coordinates.
fn inclusive(p: &[f64], dims: usize, reference: &[f64]) -> f64 {
    (0..dims).map(|k| (p[k] - reference[k]).abs()).product()
}

/// Volume dominated by `points[i]` but not by any later point, over the
/// first `dims` coordinates.
fn exclusive(points: &[Vec<f64>], i: usize, dims: usize, reference: &[f64]) -> f64 {
    let limited = limit_set(points, i, dims);
    inclusive(&points[i], dims, reference) - hv(limited, dims, reference)
}

/// Later points pushed back to the region `points[i]` dominates, reduced
/// to their non-dominated, duplicate-free subset.
fn limit_set(points: &[Vec<f64>], i: usize, dims: usize) -> Vec<Vec<f64>> {
    let p = &points[i];
    let mut kept: Vec<Vec<f64>> = Vec::with_capacity(points.len() - i - 1);
    for q in &points[i + 1..] {
        let candidate: Vec<f64> = (0..dims).map(|k| p[k].max(q[k])).collect();
        if kept.iter().any(|k| {
            k == &candidate || pareto_dominance(k, &candidate) == Ordering::Less
        }) {
            continue;
        }
        kept.retain(|k| pareto_dominance(&candidate, k) != Ordering::Less);
        kept.push(candidate);
    }
    kept
}

/// Sorts by the last active coordinate descending, earlier ones breaking ties.
fn sort_worst_first(points: &mut [Vec<f64>], dims: usize) {
    points.sort_by(|a, b| {
        for k in (0..dims).rev() {
            match b[k].total_cmp(&a[k]) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use rand::Rng;

    fn front(points: &[&[f64]]) -> Front {
        Front::from_matrix(points.iter().map(|p| p.to_vec()).collect())
    }

    /// Inclusion-exclusion over all non-empty subsets.
    fn brute_force(points: &[Vec<f64>], reference: &[f64]) -> f64 {
        let n = points.len();
        let mut total = 0.0;
        for mask in 1u32..(1 << n) {
            let members: Vec<&Vec<f64>> =
                (0..n).filter(|i| mask & (1 << i) != 0).map(|i| &points[i]).collect();
            let corner: Vec<f64> = (0..reference.len())
                .map(|k| members.iter().map(|p| p[k]).fold(f64::MIN, f64::max))
                .collect();
            let vol: f64 = corner
                .iter()
                .zip(reference)
                .map(|(c, r)| (r - c).max(0.0))
                .product();
            if members.len() % 2 == 1 {
                total += vol;
            } else {
                total -= vol;
            }
        }
        total
    }

    #[test]
    fn test_two_dimensional_strips() {
        let f = front(&[&[1.0, 4.0], &[2.0, 2.0], &[4.0, 1.0]]);
        let hv = WfgHypervolume::new(vec![5.0, 5.0]).compute(&f);
        assert!((hv - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_outside() {
        let wfg = WfgHypervolume::new(vec![1.0, 1.0, 1.0]);
        assert_eq!(wfg.compute(&Front::default()), 0.0);
        assert_eq!(wfg.compute(&front(&[&[2.0, 0.0, 0.0]])), 0.0);
    }

    #[test]
    fn test_three_dimensional_known_value() {
        // Two unit-offset boxes overlapping in a 1x1x1 cube.
        let f = front(&[&[0.0, 1.0, 1.0], &[1.0, 0.0, 1.0]]);
        let hv = WfgHypervolume::new(vec![2.0, 2.0, 2.0]).compute(&f);
        // 2·1·1 + 1·2·1 - 1·1·1
        assert!((hv - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_matches_brute_force_3d_and_4d() {
        let mut rng = create_rng(17);
        for dims in [3usize, 4] {
            for _ in 0..40 {
                let n = rng.random_range(1..=5);
                let points: Vec<Vec<f64>> = (0..n)
                    .map(|_| (0..dims).map(|_| rng.random_range(0.0..10.0)).collect())
                    .collect();
                let reference = vec![10.0; dims];
                let expected = brute_force(&points, &reference);
                let got = WfgHypervolume::new(reference).compute(&Front::from_matrix(points));
                assert!(
                    (got - expected).abs() < 1e-6 * expected.max(1.0),
                    "dims={dims}: {got} vs {expected}"
                );
            }
        }
    }

    #[test]
    fn test_matches_brute_force_2d() {
        let mut rng = create_rng(23);
        for _ in 0..50 {
            let n = rng.random_range(1..=5);
            let points: Vec<Vec<f64>> = (0..n)
                .map(|_| vec![rng.random_range(0.0..5.0), rng.random_range(0.0..5.0)])
                .collect();
            let expected = brute_force(&points, &[5.0, 5.0]);
            let got = WfgHypervolume::new(vec![5.0, 5.0]).compute(&Front::from_matrix(points));
            assert!((got - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_exclusive_contribution() {
        let f = front(&[&[1.0, 4.0], &[2.0, 2.0], &[4.0, 1.0]]);
        let wfg = WfgHypervolume::new(vec![5.0, 5.0]);
        // Removing (2,2) loses the 2x2 square [2,4]x[2,4] region not covered by others.
        assert!((wfg.exclusive(&f, 1) - 4.0).abs() < 1e-12);
    }
}
