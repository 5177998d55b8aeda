//! Random number helpers.
//!
//! Runners own a seeded [`MoeaRng`]; operators receive it as
//! `&mut dyn RngCore` so they can live behind trait objects.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

/// The RNG type owned by runners.
pub type MoeaRng = StdRng;

/// Creates a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> MoeaRng {
    StdRng::seed_from_u64(seed)
}

/// Creates the RNG for a run: seeded when `seed` is set, random otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> MoeaRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Uniform real in `[low, high)`.
///
/// Returns `low` when the interval is empty, so degenerate parameter
/// ranges such as `WMin == WMax` are allowed.
pub fn uniform(rng: &mut dyn RngCore, low: f64, high: f64) -> f64 {
    if high > low {
        rng.random_range(low..high)
    } else {
        low
    }
}

/// Uniform real in `[0, 1)`.
pub fn unit(rng: &mut dyn RngCore) -> f64 {
    rng.random::<f64>()
}

/// Uniform index in `0..n`. `n` must be positive.
pub fn index(rng: &mut dyn RngCore, n: usize) -> usize {
    assert!(n > 0, "cannot draw an index from an empty range");
    rng.random_range(0..n)
}

/// A random permutation of `0..n`.
pub fn int_permutation(n: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(rng);
    perm
}
