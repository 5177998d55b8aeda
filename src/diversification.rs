//! Frequency-based diversification generation.
//!
//! Each dimension is split into equal-width bands. A frequency table
//! remembers how often each (band, dimension) pair has been sampled, and
//! new solutions prefer rarely sampled bands, which spreads seed
//! populations across the box instead of clustering them.

use crate::core::{Problem, Solution};
use crate::error::{MoeaError, Result};
use crate::random;
use rand::{Rng, RngCore};

/// Default number of bands per dimension.
pub const DEFAULT_SUBRANGES: usize = 4;

/// Generates solutions by inverse-frequency band sampling.
///
/// The generator is stateful: every call updates the frequency table, so
/// one instance should be kept for the whole run.
///
/// # Examples
///
/// ```
/// use u_moea::diversification::DiversificationGenerator;
///
/// let generator = DiversificationGenerator::new(3, 4);
/// assert_eq!(generator.subranges(), 4);
/// assert_eq!(generator.samples(0), 0);
/// ```
#[derive(Debug, Clone)]
pub struct DiversificationGenerator {
    subranges: usize,
    /// `frequency[band][dimension]`.
    frequency: Vec<Vec<u64>>,
    samples: Vec<u64>,
}

impl DiversificationGenerator {
    /// A generator for `dimensions` variables split into `subranges` bands
    /// (at least one).
    pub fn new(dimensions: usize, subranges: usize) -> Self {
        let subranges = subranges.max(1);
        Self {
            subranges,
            frequency: vec![vec![0; dimensions]; subranges],
            samples: vec![0; dimensions],
        }
    }

    /// Bands per dimension.
    pub fn subranges(&self) -> usize {
        self.subranges
    }

    /// How often `band` of `dimension` has been sampled.
    pub fn frequency(&self, band: usize, dimension: usize) -> u64 {
        self.frequency[band][dimension]
    }

    /// Total samples drawn for `dimension`.
    pub fn samples(&self, dimension: usize) -> u64 {
        self.samples[dimension]
    }

    /// Creates an unevaluated solution whose real-valued variables are
    /// drawn band by band.
    ///
    /// # Errors
    /// [`MoeaError::UnsupportedEncoding`] when the problem's variables do
    /// not expose real values.
    pub fn generate(&mut self, problem: &dyn Problem, rng: &mut dyn RngCore) -> Result<Solution> {
        let mut solution = Solution::random(problem, rng);
        if !solution.is_real_coded() {
            return Err(MoeaError::UnsupportedEncoding(
                "diversification needs real-valued variables".into(),
            ));
        }

        let dimensions = solution.decision_len().min(self.samples.len());
        for i in 0..dimensions {
            let band = self.pick_band(i, rng);
            self.frequency[band][i] += 1;
            self.samples[i] += 1;

            let (lower, upper) = (problem.lower_limit(i), problem.upper_limit(i));
            let width = (upper - lower) / self.subranges as f64;
            let low = lower + band as f64 * width;
            solution.set_real_value(i, random::uniform(rng, low, low + width));
        }
        Ok(solution)
    }

    /// Roulette over reverse frequencies; uniform when every band has been
    /// sampled equally often.
    fn pick_band(&self, dimension: usize, rng: &mut dyn RngCore) -> usize {
        let total = self.samples[dimension];
        let reverse: Vec<u64> = (0..self.subranges)
            .map(|band| total - self.frequency[band][dimension])
            .collect();
        let reverse_sum: u64 = reverse.iter().sum();

        if reverse_sum == 0 {
            return random::index(rng, self.subranges);
        }

        let mut value = rng.random_range(0..reverse_sum);
        let mut band = 0;
        while band + 1 < self.subranges && value > reverse[band] {
            value -= reverse[band];
            band += 1;
        }
        band
    }
}
