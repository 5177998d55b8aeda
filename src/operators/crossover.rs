//! Crossover operators.
//!
//! - [`SbxCrossover`]: simulated binary crossover on the real-valued view
//! - [`SinglePointCrossover`]: one cut point across all bit strings
//! - [`PmxCrossover`] / [`OrderCrossover`]: permutation recombination
//!
//! # References
//!
//! - Deb & Agrawal (1995), "Simulated Binary Crossover for Continuous Search Space"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"

use super::parameters::Parameters;
use super::permutation;
use super::Crossover;
use crate::core::{Solution, Variable};
use crate::error::{MoeaError, Result};
use crate::random;
use rand::{Rng, RngCore};

const EPS: f64 = 1.0e-14;

/// Default SBX distribution index.
pub const DEFAULT_SBX_DISTRIBUTION_INDEX: f64 = 20.0;

/// Simulated binary crossover (SBX).
///
/// With probability `probability` the pair is recombined. Each dimension
/// then has a 50% chance of being blended with a spread factor drawn from
/// a polynomial distribution of index `distribution_index`, otherwise the
/// parents' values are exchanged. Children are clamped into bounds.
///
/// Works on every encoding that exposes a real-valued view (reals,
/// integers, binary-coded reals, real and integer arrays).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SbxCrossover {
    /// Probability of recombining a pair.
    pub probability: f64,
    /// Distribution index η_c; larger values keep children near parents.
    pub distribution_index: f64,
}

impl SbxCrossover {
    /// Creates the operator.
    pub fn new(probability: f64, distribution_index: f64) -> Self {
        Self {
            probability,
            distribution_index,
        }
    }

    /// Reads `probability` (required) and `distributionIndex` (default 20).
    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        Ok(Self::new(
            params.get_f64("probability")?,
            params.f64_or("distributionIndex", DEFAULT_SBX_DISTRIBUTION_INDEX)?,
        ))
    }

    fn blend(&self, y1: f64, y2: f64, lower: f64, upper: f64, rng: &mut dyn RngCore) -> (f64, f64) {
        let eta = self.distribution_index;
        let exponent = 1.0 / (eta + 1.0);
        let rand = random::unit(rng);

        let spread = |beta: f64| -> f64 {
            let alpha = 2.0 - beta.powf(-(eta + 1.0));
            if rand <= 1.0 / alpha {
                (rand * alpha).powf(exponent)
            } else {
                (1.0 / (2.0 - rand * alpha)).powf(exponent)
            }
        };

        let betaq = spread(1.0 + 2.0 * (y1 - lower) / (y2 - y1));
        let c1 = 0.5 * ((y1 + y2) - betaq * (y2 - y1));
        let betaq = spread(1.0 + 2.0 * (upper - y2) / (y2 - y1));
        let c2 = 0.5 * ((y1 + y2) + betaq * (y2 - y1));

        (c1.clamp(lower, upper), c2.clamp(lower, upper))
    }
}

impl Crossover for SbxCrossover {
    fn name(&self) -> &'static str {
        "SBXCrossover"
    }

    fn execute(
        &self,
        parent1: &Solution,
        parent2: &Solution,
        rng: &mut dyn RngCore,
    ) -> Result<[Solution; 2]> {
        if !parent1.is_real_coded() || !parent2.is_real_coded() {
            return Err(MoeaError::UnsupportedEncoding(
                "SBXCrossover needs real-valued variables".into(),
            ));
        }
        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();

        if random::unit(rng) > self.probability {
            return Ok([child1, child2]);
        }

        let n = parent1.decision_len().min(parent2.decision_len());
        for i in 0..n {
            let x1 = parent1.real_value(i);
            let x2 = parent2.real_value(i);

            if rng.random_bool(0.5) {
                if (x1 - x2).abs() <= EPS {
                    continue;
                }
                let (y1, y2) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
                let (lower, upper) = (parent1.real_lower(i), parent1.real_upper(i));
                let (c1, c2) = self.blend(y1, y2, lower, upper, rng);
                if rng.random_bool(0.5) {
                    child1.set_real_value(i, c2);
                    child2.set_real_value(i, c1);
                } else {
                    child1.set_real_value(i, c1);
                    child2.set_real_value(i, c2);
                }
            } else {
                child1.set_real_value(i, x2);
                child2.set_real_value(i, x1);
            }
        }

        Ok([child1, child2])
    }
}

/// Single-point crossover on the concatenation of all bit strings.
///
/// Every bit at or after the cut point is exchanged between the children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinglePointCrossover {
    /// Probability of recombining a pair.
    pub probability: f64,
}

impl SinglePointCrossover {
    /// Creates the operator.
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    /// Reads `probability` (required).
    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        Ok(Self::new(params.get_f64("probability")?))
    }
}

impl Crossover for SinglePointCrossover {
    fn name(&self) -> &'static str {
        "SinglePointCrossover"
    }

    fn execute(
        &self,
        parent1: &Solution,
        parent2: &Solution,
        rng: &mut dyn RngCore,
    ) -> Result<[Solution; 2]> {
        let binary = |s: &Solution| s.variables.iter().all(|v| v.bits().is_some());
        if !binary(parent1) || !binary(parent2) {
            return Err(MoeaError::UnsupportedEncoding(
                "SinglePointCrossover needs binary variables".into(),
            ));
        }
        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();

        let total: usize = parent1.variables.iter().map(Variable::len).sum();
        if total == 0 || random::unit(rng) > self.probability {
            return Ok([child1, child2]);
        }

        let cut = random::index(rng, total);
        let mut offset = 0;
        for (a, b) in child1.variables.iter_mut().zip(child2.variables.iter_mut()) {
            let len = a.len();
            if offset + len > cut {
                let from = cut.saturating_sub(offset);
                if let (Some(bits_a), Some(bits_b)) = (a.bits_mut(), b.bits_mut()) {
                    let end = bits_a.len().min(bits_b.len());
                    for k in from..end {
                        std::mem::swap(&mut bits_a[k], &mut bits_b[k]);
                    }
                }
            }
            offset += len;
        }

        Ok([child1, child2])
    }
}

/// Partially mapped crossover applied to every permutation variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PmxCrossover {
    /// Probability of recombining a pair.
    pub probability: f64,
}

impl PmxCrossover {
    /// Creates the operator.
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    /// Reads `probability` (required).
    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        Ok(Self::new(params.get_f64("probability")?))
    }
}

impl Crossover for PmxCrossover {
    fn name(&self) -> &'static str {
        "PMXCrossover"
    }

    fn execute(
        &self,
        parent1: &Solution,
        parent2: &Solution,
        rng: &mut dyn RngCore,
    ) -> Result<[Solution; 2]> {
        recombine_permutations(
            parent1,
            parent2,
            self.probability,
            self.name(),
            rng,
            permutation::pmx,
        )
    }
}

/// Order crossover (OX) applied to every permutation variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderCrossover {
    /// Probability of recombining a pair.
    pub probability: f64,
}

impl OrderCrossover {
    /// Creates the operator.
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    /// Reads `probability` (required).
    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        Ok(Self::new(params.get_f64("probability")?))
    }
}

impl Crossover for OrderCrossover {
    fn name(&self) -> &'static str {
        "OrderCrossover"
    }

    fn execute(
        &self,
        parent1: &Solution,
        parent2: &Solution,
        rng: &mut dyn RngCore,
    ) -> Result<[Solution; 2]> {
        recombine_permutations(
            parent1,
            parent2,
            self.probability,
            self.name(),
            rng,
            permutation::order,
        )
    }
}

type PermutationRecombination =
    fn(&[usize], &[usize], &mut dyn RngCore) -> (Vec<usize>, Vec<usize>);

fn recombine_permutations(
    parent1: &Solution,
    parent2: &Solution,
    probability: f64,
    name: &str,
    rng: &mut dyn RngCore,
    recombine: PermutationRecombination,
) -> Result<[Solution; 2]> {
    let permutations = |s: &Solution| s.variables.iter().all(|v| v.order().is_some());
    if !permutations(parent1) || !permutations(parent2) {
        return Err(MoeaError::UnsupportedEncoding(format!(
            "{name} needs permutation variables"
        )));
    }
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();
    if random::unit(rng) > probability {
        return Ok([child1, child2]);
    }

    for (a, b) in child1.variables.iter_mut().zip(child2.variables.iter_mut()) {
        let (Some(pa), Some(pb)) = (a.order(), b.order()) else {
            continue;
        };
        if pa.len() != pb.len() || pa.is_empty() {
            continue;
        }
        let (ca, cb) = recombine(pa, pb, rng);
        if let Some(order) = a.order_mut() {
            *order = ca;
        }
        if let Some(order) = b.order_mut() {
            *order = cb;
        }
    }

    Ok([child1, child2])
}
