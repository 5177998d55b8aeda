//! Selection operators.
//!
//! Selections return the index of the chosen member so callers decide
//! whether to borrow or clone it.

use super::parameters::Parameters;
use super::Selection;
use crate::core::{dominance, DominanceComparator, SolutionComparator, SolutionSet};
use crate::error::Result;
use crate::random;
use rand::{Rng, RngCore};
use std::cmp::Ordering;
use std::fmt;

/// Binary tournament between two uniformly drawn members.
///
/// The comparator (dominance by default) decides; ties are broken by a
/// fair coin.
pub struct BinaryTournament {
    comparator: Box<dyn SolutionComparator>,
}

impl BinaryTournament {
    /// A tournament decided by Pareto dominance.
    pub fn new() -> Self {
        Self::with_comparator(Box::new(DominanceComparator))
    }

    /// A tournament decided by a custom comparator.
    pub fn with_comparator(comparator: Box<dyn SolutionComparator>) -> Self {
        Self { comparator }
    }

    /// Takes no parameters.
    pub fn from_parameters(_params: &Parameters) -> Result<Self> {
        Ok(Self::new())
    }
}

impl Default for BinaryTournament {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BinaryTournament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryTournament").finish_non_exhaustive()
    }
}

impl Selection for BinaryTournament {
    fn name(&self) -> &'static str {
        "BinaryTournament"
    }

    fn execute(&mut self, set: &SolutionSet, rng: &mut dyn RngCore) -> usize {
        let a = random::index(rng, set.len());
        let b = random::index(rng, set.len());
        match self.comparator.compare(&set[a], &set[b]) {
            Ordering::Less => a,
            Ordering::Greater => b,
            Ordering::Equal => coin(a, b, rng),
        }
    }
}

/// Deb-style binary tournament.
///
/// Contestants are taken pairwise from a random permutation of the set,
/// which is redrawn every time it is exhausted, so every member competes
/// about equally often. Dominance decides first, then the larger crowding
/// distance, then a fair coin.
#[derive(Debug, Clone, Default)]
pub struct BinaryTournament2 {
    order: Vec<usize>,
    cursor: usize,
}

impl BinaryTournament2 {
    /// Creates the operator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes no parameters.
    pub fn from_parameters(_params: &Parameters) -> Result<Self> {
        Ok(Self::new())
    }
}

impl Selection for BinaryTournament2 {
    fn name(&self) -> &'static str {
        "BinaryTournament2"
    }

    fn execute(&mut self, set: &SolutionSet, rng: &mut dyn RngCore) -> usize {
        let n = set.len();
        assert!(n > 0, "cannot select from an empty solution set");
        if n == 1 {
            return 0;
        }
        if self.cursor == 0 || self.order.len() != n {
            self.order = random::int_permutation(n, rng);
            self.cursor = 0;
        }
        let a = self.order[self.cursor];
        let b = self.order[(self.cursor + 1) % n];
        self.cursor = (self.cursor + 2) % n;

        let (sa, sb) = (&set[a], &set[b]);
        match dominance(sa, sb) {
            Ordering::Less => a,
            Ordering::Greater => b,
            Ordering::Equal => match sa.crowding_distance.total_cmp(&sb.crowding_distance) {
                Ordering::Greater => a,
                Ordering::Less => b,
                Ordering::Equal => coin(a, b, rng),
            },
        }
    }
}

fn coin(a: usize, b: usize, rng: &mut dyn RngCore) -> usize {
    if rng.random_bool(0.5) {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Solution;
    use crate::random::create_rng;

    fn set(rows: &[[f64; 2]]) -> SolutionSet {
        rows.iter()
            .map(|r| Solution::from_objectives(r.to_vec()))
            .collect()
    }

    #[test]
    fn test_binary_tournament_never_picks_dominated_over_dominator() {
        let s = set(&[[0.0, 0.0], [5.0, 5.0]]);
        let mut op = BinaryTournament::new();
        let mut rng = create_rng(42);
        let mut wins = [0usize; 2];
        for _ in 0..400 {
            wins[op.execute(&s, &mut rng)] += 1;
        }
        // The dominated member only wins when drawn against itself.
        assert!(wins[0] > wins[1] * 2, "{wins:?}");
    }

    #[test]
    fn test_tournament2_prefers_crowding_on_ties() {
        let mut s = set(&[[0.0, 1.0], [1.0, 0.0]]);
        s.get_mut(0).crowding_distance = 10.0;
        s.get_mut(1).crowding_distance = 1.0;
        let mut op = BinaryTournament2::new();
        let mut rng = create_rng(3);
        for _ in 0..20 {
            assert_eq!(op.execute(&s, &mut rng), 0);
        }
    }

    #[test]
    fn test_tournament2_dominance_first() {
        let mut s = set(&[[0.0, 0.0], [1.0, 1.0]]);
        s.get_mut(1).crowding_distance = f64::INFINITY;
        let mut op = BinaryTournament2::new();
        let mut rng = create_rng(3);
        for _ in 0..20 {
            assert_eq!(op.execute(&s, &mut rng), 0);
        }
    }

    #[test]
    fn test_tournament2_odd_sizes_and_resizes() {
        let mut op = BinaryTournament2::new();
        let mut rng = create_rng(5);
        for n in [1usize, 3, 5, 2, 7] {
            let s: SolutionSet = (0..n)
                .map(|i| Solution::from_objectives(vec![i as f64, (n - i) as f64]))
                .collect();
            for _ in 0..3 * n {
                assert!(op.execute(&s, &mut rng) < n);
            }
        }
    }

    #[test]
    #[should_panic(expected = "empty")]
    fn test_tournament2_empty_panics() {
        let mut op = BinaryTournament2::new();
        let mut rng = create_rng(5);
        op.execute(&SolutionSet::new(), &mut rng);
    }
}
