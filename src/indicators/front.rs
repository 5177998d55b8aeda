//! Points and fronts in objective space.

use crate::core::{pareto_dominance, SolutionSet};
use crate::error::{MoeaError, Result};
use std::cmp::Ordering;
use std::path::Path;

/// An objective vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Coordinates, one per objective.
    pub objectives: Vec<f64>,
}

impl Point {
    /// Wraps an objective vector.
    pub fn new(objectives: Vec<f64>) -> Self {
        Self { objectives }
    }

    /// Number of coordinates.
    pub fn dimensions(&self) -> usize {
        self.objectives.len()
    }

    /// Coordinate `i`.
    pub fn get(&self, i: usize) -> f64 {
        self.objectives[i]
    }
}

/// A list of points in objective space (minimization).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Front {
    points: Vec<Point>,
}

impl Front {
    /// Wraps raw objective vectors.
    pub fn from_matrix(matrix: Vec<Vec<f64>>) -> Self {
        Self {
            points: matrix.into_iter().map(Point::new).collect(),
        }
    }

    /// Copies the objective vectors of a solution set.
    pub fn from_solution_set(set: &SolutionSet) -> Self {
        Self::from_matrix(set.objectives_matrix())
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the front has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimension of the first point, or 0 for an empty front.
    pub fn dimensions(&self) -> usize {
        self.points.first().map_or(0, Point::dimensions)
    }

    /// The points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Point `i`.
    pub fn point(&self, i: usize) -> &Point {
        &self.points[i]
    }

    /// Adds a point.
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// The points as raw vectors.
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        self.points.iter().map(|p| p.objectives.clone()).collect()
    }

    /// Keeps only points strictly better than `reference` in every
    /// coordinate and not dominated by (or equal to) another point.
    pub fn filtered(&self, reference: &[f64]) -> Front {
        let inside: Vec<&Point> = self
            .points
            .iter()
            .filter(|p| p.objectives.iter().zip(reference).all(|(v, r)| v < r))
            .collect();
        let mut kept: Vec<Point> = Vec::with_capacity(inside.len());
        for p in inside {
            if kept.iter().any(|k| {
                pareto_dominance(&k.objectives, &p.objectives) == Ordering::Less
                    || k.objectives == p.objectives
            }) {
                continue;
            }
            kept.retain(|k| pareto_dominance(&p.objectives, &k.objectives) != Ordering::Less);
            kept.push(p.clone());
        }
        Front { points: kept }
    }
}

/// Per-objective minimum of a matrix of objective vectors.
pub fn min_values(front: &[Vec<f64>], dimensions: usize) -> Vec<f64> {
    let mut min = vec![f64::MAX; dimensions];
    for row in front {
        for (m, &v) in min.iter_mut().zip(row) {
            *m = m.min(v);
        }
    }
    min
}

/// Per-objective maximum of a matrix of objective vectors.
pub fn max_values(front: &[Vec<f64>], dimensions: usize) -> Vec<f64> {
    let mut max = vec![f64::MIN; dimensions];
    for row in front {
        for (m, &v) in max.iter_mut().zip(row) {
            *m = m.max(v);
        }
    }
    max
}

/// Maps each coordinate into `(v - min) / (max - min)`.
///
/// Objectives with zero range are only shifted.
pub fn normalize(front: &[Vec<f64>], min: &[f64], max: &[f64]) -> Vec<Vec<f64>> {
    front
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(k, &v)| {
                    let range = max[k] - min[k];
                    if range > 0.0 {
                        (v - min[k]) / range
                    } else {
                        v - min[k]
                    }
                })
                .collect()
        })
        .collect()
}

/// Parses a whitespace-separated front, one point per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_front(text: &str) -> Result<Vec<Vec<f64>>> {
    let mut front = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|e| MoeaError::Parse(format!("line {}: '{tok}': {e}", n + 1)))
            })
            .collect::<Result<Vec<f64>>>()?;
        front.push(row);
    }
    Ok(front)
}

/// Reads a front file (see [`parse_front`]).
pub fn read_front<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let text = std::fs::read_to_string(path)?;
    parse_front(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtered_drops_dominated_duplicates_and_outside() {
        let front = Front::from_matrix(vec![
            vec![1.0, 4.0],
            vec![2.0, 5.0], // dominated
            vec![1.0, 4.0], // duplicate
            vec![6.0, 0.5], // outside reference
            vec![3.0, 2.0],
        ]);
        let kept = front.filtered(&[5.0, 5.0]);
        assert_eq!(kept.to_matrix(), vec![vec![1.0, 4.0], vec![3.0, 2.0]]);
    }

    #[test]
    fn test_filtered_removes_earlier_dominated() {
        let front = Front::from_matrix(vec![vec![3.0, 3.0], vec![1.0, 1.0]]);
        assert_eq!(front.filtered(&[5.0, 5.0]).to_matrix(), vec![vec![1.0, 1.0]]);
    }

    #[test]
    fn test_normalize_zero_range() {
        let front = vec![vec![1.0, 5.0], vec![3.0, 5.0]];
        let min = min_values(&front, 2);
        let max = max_values(&front, 2);
        assert_eq!(normalize(&front, &min, &max), vec![vec![0.0, 0.0], vec![1.0, 0.0]]);
    }

    #[test]
    fn test_parse_front() {
        let text = "# f1 f2\n0.0 1.0\n\n0.5   0.25\n";
        assert_eq!(
            parse_front(text).unwrap(),
            vec![vec![0.0, 1.0], vec![0.5, 0.25]]
        );
        assert!(matches!(parse_front("1.0 x"), Err(MoeaError::Parse(_))));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_front("/nonexistent/front.txt").unwrap_err();
        assert!(matches!(err, MoeaError::Io(_)));
    }
}
