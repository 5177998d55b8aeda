//! Density estimators and distance utilities.
//!
//! # Algorithms
//!
//! - [`assign_crowding_distance`]: NSGA-II crowding distance
//! - [`assign_spea2_fitness`]: SPEA2 strength + raw fitness + k-th nearest density
//! - [`distance_to_set`]: decision-space distance to the nearest member of a set
//! - [`non_dominated_indices`]: members no other member dominates
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - Zitzler, Laumanns & Thiele (2001), "SPEA2: Improving the Strength Pareto Evolutionary Algorithm"

use crate::core::{dominance, Solution};
use std::cmp::Ordering;

/// Crowding distance for a set of objective vectors.
///
/// Boundary solutions (min/max for any objective) receive `f64::INFINITY`;
/// with two or fewer solutions every distance is infinite. Objectives with
/// zero range contribute nothing to interior solutions.
///
/// # Complexity
///
/// O(m · n log n) for m objectives and n solutions.
///
/// # Example
///
/// ```
/// use u_moea::density::crowding_distances;
///
/// let d = crowding_distances(&[vec![1.0, 5.0], vec![3.0, 3.0], vec![5.0, 1.0]]);
/// assert!(d[0].is_infinite() && d[2].is_infinite());
/// assert!((d[1] - 2.0).abs() < 1e-12);
/// ```
pub fn crowding_distances(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];

    for obj in 0..m {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| objectives[a][obj].total_cmp(&objectives[b][obj]));

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let range = objectives[indices[n - 1]][obj] - objectives[indices[0]][obj];
        if range > 0.0 {
            for i in 1..(n - 1) {
                let prev = objectives[indices[i - 1]][obj];
                let next = objectives[indices[i + 1]][obj];
                distances[indices[i]] += (next - prev) / range;
            }
        }
    }

    distances
}

/// Writes the crowding distance of each solution into `crowding_distance`.
pub fn assign_crowding_distance(solutions: &mut [Solution]) {
    let objectives: Vec<Vec<f64>> = solutions.iter().map(|s| s.objectives.clone()).collect();
    let distances = crowding_distances(&objectives);
    for (s, d) in solutions.iter_mut().zip(distances) {
        s.crowding_distance = d;
    }
}

/// Pairwise Euclidean distances in objective space.
pub fn objective_distance_matrix(solutions: &[Solution]) -> Vec<Vec<f64>> {
    let n = solutions.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = solutions[i].objective_distance(&solutions[j]);
            matrix[i][j] = d;
            matrix[j][i] = d;
        }
    }
    matrix
}

/// SPEA2 fitness, written into each solution's `fitness` (lower is better).
///
/// # Algorithm
///
/// 1. Strength `S(i)` = number of solutions `i` dominates
/// 2. Raw fitness `R(i)` = sum of `S(j)` over every `j` dominating `i`
/// 3. Density `D(i)` = `1 / (σ_k + 2)` with σ_k the distance to the k-th
///    nearest neighbour in objective space (k = 1)
/// 4. `F(i) = R(i) + D(i)`
///
/// Non-dominated solutions therefore always have `F < 1`.
///
/// # Complexity
///
/// O(n² · m + n² log n)
pub fn assign_spea2_fitness(solutions: &mut [Solution]) {
    const K: usize = 1;
    let n = solutions.len();
    if n == 0 {
        return;
    }

    let mut strength = vec![0usize; n];
    for i in 0..n {
        for j in 0..n {
            if dominance(&solutions[i], &solutions[j]) == Ordering::Less {
                strength[i] += 1;
            }
        }
    }

    let mut raw = vec![0.0f64; n];
    for i in 0..n {
        for j in 0..n {
            if dominance(&solutions[i], &solutions[j]) == Ordering::Greater {
                raw[i] += strength[j] as f64;
            }
        }
    }

    let matrix = objective_distance_matrix(solutions);
    for (i, row) in matrix.into_iter().enumerate() {
        let mut row = row;
        row.sort_by(f64::total_cmp);
        // row[0] is the distance to itself.
        let sigma = row.get(K).copied().unwrap_or(0.0);
        solutions[i].fitness = raw[i] + 1.0 / (sigma + 2.0);
    }
}

/// Smallest decision-space distance from `solution` to any member of `set`.
///
/// Returns `f64::INFINITY` for an empty set.
pub fn distance_to_set(solution: &Solution, set: &[Solution]) -> f64 {
    set.iter()
        .map(|other| solution.decision_distance(other))
        .fold(f64::INFINITY, f64::min)
}

/// Indices of the solutions not dominated by any other, in order.
pub fn non_dominated_indices(solutions: &[Solution]) -> Vec<usize> {
    (0..solutions.len())
        .filter(|&i| {
            !solutions
                .iter()
                .any(|other| dominance(other, &solutions[i]) == Ordering::Less)
        })
        .collect()
}
