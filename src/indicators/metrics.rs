//! Distance-based quality metrics on raw objective matrices.
//!
//! All functions take fronts as `&[Vec<f64>]`, one row per point, and
//! assume minimization. None of them normalize; see
//! [`QualityIndicator`](super::QualityIndicator) for the normalized
//! variants.
//!
//! # References
//!
//! - Van Veldhuizen & Lamont (1998), "Multiobjective Evolutionary Algorithm
//!   Research: A History and Analysis" (generational distance)
//! - Deb et al. (2002), NSGA-II (spread Δ)
//! - Zitzler et al. (2003), "Performance Assessment of Multiobjective
//!   Optimizers: An Analysis and Review" (additive ε)

use std::cmp::Ordering;

/// Euclidean distance between two points.
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Distance from `point` to its nearest neighbour in `front`.
///
/// `f64::INFINITY` when `front` is empty.
pub fn distance_to_closest_point(point: &[f64], front: &[Vec<f64>]) -> f64 {
    front
        .iter()
        .map(|q| distance(point, q))
        .fold(f64::INFINITY, f64::min)
}

/// Generational distance: `sqrt(Σ d(p, true)²) / n` over the `n` points of
/// `front`.
///
/// `f64::INFINITY` when either front is empty.
pub fn generational_distance(front: &[Vec<f64>], true_front: &[Vec<f64>]) -> f64 {
    mean_root_square(front, true_front)
}

/// Inverted generational distance: generational distance with the roles
/// of the two fronts swapped.
pub fn inverted_generational_distance(front: &[Vec<f64>], true_front: &[Vec<f64>]) -> f64 {
    mean_root_square(true_front, front)
}

fn mean_root_square(from: &[Vec<f64>], to: &[Vec<f64>]) -> f64 {
    if from.is_empty() || to.is_empty() {
        return f64::INFINITY;
    }
    let sum: f64 = from
        .iter()
        .map(|p| {
            let d = distance_to_closest_point(p, to);
            d * d
        })
        .sum();
    sum.sqrt() / from.len() as f64
}

/// Deb's spread Δ for two objectives.
///
/// Both fronts are sorted lexicographically. `df` and `dl` are the
/// distances between the first and last points of each front;
/// consecutive distances `d_i` have mean `d̄`:
///
/// ```text
/// Δ = (df + dl + Σ |d_i - d̄|) / (df + dl + (n - 1) · d̄)
/// ```
///
/// Returns 1.0 for fronts with fewer than two points.
pub fn spread(front: &[Vec<f64>], true_front: &[Vec<f64>]) -> f64 {
    if front.len() < 2 || true_front.is_empty() {
        return 1.0;
    }
    let mut front = front.to_vec();
    let mut truth = true_front.to_vec();
    front.sort_by(|a, b| lexicographic(a, b));
    truth.sort_by(|a, b| lexicographic(a, b));

    let n = front.len();
    let df = distance(&front[0], &truth[0]);
    let dl = distance(&front[n - 1], &truth[truth.len() - 1]);

    let gaps: Vec<f64> = front.windows(2).map(|w| distance(&w[0], &w[1])).collect();
    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    let diversity: f64 = gaps.iter().map(|g| (g - mean).abs()).sum();

    let denominator = df + dl + (n - 1) as f64 * mean;
    if denominator > 0.0 {
        (df + dl + diversity) / denominator
    } else {
        1.0
    }
}

/// Additive ε indicator: the smallest shift that makes `front` weakly
/// dominate every point of `true_front`.
///
/// `f64::INFINITY` when either front is empty.
pub fn additive_epsilon(front: &[Vec<f64>], true_front: &[Vec<f64>]) -> f64 {
    if front.is_empty() || true_front.is_empty() {
        return f64::INFINITY;
    }
    true_front
        .iter()
        .map(|t| {
            front
                .iter()
                .map(|a| {
                    a.iter()
                        .zip(t)
                        .map(|(x, y)| x - y)
                        .fold(f64::NEG_INFINITY, f64::max)
                })
                .fold(f64::INFINITY, f64::min)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

fn lexicographic(a: &[f64], b: &[f64]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.total_cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                vec![t, 1.0 - t]
            })
            .collect()
    }

    #[test]
    fn test_gd_zero_on_true_front() {
        let truth = line(11);
        assert_eq!(generational_distance(&truth, &truth), 0.0);
        assert_eq!(inverted_generational_distance(&truth, &truth), 0.0);
    }

    #[test]
    fn test_gd_known_offset() {
        let truth = vec![vec![0.0, 0.0]];
        let front = vec![vec![3.0, 4.0], vec![0.0, 0.0]];
        // sqrt(25 + 0) / 2
        assert!((generational_distance(&front, &truth) - 2.5).abs() < 1e-12);
        // single true point, nearest at distance 0
        assert_eq!(inverted_generational_distance(&front, &truth), 0.0);
    }

    #[test]
    fn test_empty_fronts() {
        assert!(generational_distance(&[], &line(3)).is_infinite());
        assert!(additive_epsilon(&line(3), &[]).is_infinite());
    }

    #[test]
    fn test_spread_uniform_front_is_zero() {
        let truth = line(5);
        assert!(spread(&truth, &truth).abs() < 1e-12);
    }

    #[test]
    fn test_spread_single_point() {
        assert_eq!(spread(&[vec![0.5, 0.5]], &line(5)), 1.0);
    }

    #[test]
    fn test_spread_clustered_front_is_worse() {
        let truth = line(5);
        let clustered = vec![vec![0.4, 0.6], vec![0.45, 0.55], vec![0.5, 0.5]];
        assert!(spread(&clustered, &truth) > spread(&truth, &truth));
    }

    #[test]
    fn test_additive_epsilon() {
        let truth = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let front = vec![vec![0.5, 1.5], vec![1.25, 0.5]];
        // (0,1) needs 0.5 from (0.5,1.5); (1,0) needs 0.5 from (1.25,0.5)
        assert!((additive_epsilon(&front, &truth) - 0.5).abs() < 1e-12);
        assert_eq!(additive_epsilon(&truth, &truth), 0.0);
    }
}
