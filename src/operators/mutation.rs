//! Mutation operators.

use super::parameters::Parameters;
use super::permutation;
use super::Mutation;
use crate::core::{Solution, Variable};
use crate::error::{MoeaError, Result};
use crate::random;
use rand::{Rng, RngCore};

/// Default polynomial-mutation distribution index.
pub const DEFAULT_MUTATION_DISTRIBUTION_INDEX: f64 = 20.0;

/// Polynomial mutation (Deb & Goyal, 1996).
///
/// Every dimension of the real-valued view is perturbed with probability
/// `probability` by a polynomially distributed step scaled to its range.
/// Dimensions whose upper bound does not exceed the lower bound are left
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialMutation {
    /// Per-dimension mutation probability, usually `1 / n`.
    pub probability: f64,
    /// Distribution index η_m.
    pub distribution_index: f64,
}

impl PolynomialMutation {
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
            params.f64_or("distributionIndex", DEFAULT_MUTATION_DISTRIBUTION_INDEX)?,
        ))
    }

    fn perturb(&self, y: f64, lower: f64, upper: f64, rng: &mut dyn RngCore) -> f64 {
        let range = upper - lower;
        let delta1 = (y - lower) / range;
        let delta2 = (upper - y) / range;
        let power = 1.0 / (self.distribution_index + 1.0);
        let rnd = random::unit(rng);

        let deltaq = if rnd <= 0.5 {
            let xy = 1.0 - delta1;
            let val = 2.0 * rnd + (1.0 - 2.0 * rnd) * xy.powf(self.distribution_index + 1.0);
            val.powf(power) - 1.0
        } else {
            let xy = 1.0 - delta2;
            let val =
                2.0 * (1.0 - rnd) + 2.0 * (rnd - 0.5) * xy.powf(self.distribution_index + 1.0);
            1.0 - val.powf(power)
        };

        (y + deltaq * range).clamp(lower, upper)
    }
}

impl Mutation for PolynomialMutation {
    fn name(&self) -> &'static str {
        "PolynomialMutation"
    }

    fn execute(&self, solution: &mut Solution, rng: &mut dyn RngCore) -> Result<()> {
        if !solution.is_real_coded() {
            return Err(MoeaError::UnsupportedEncoding(
                "PolynomialMutation needs real-valued variables".into(),
            ));
        }
        for i in 0..solution.decision_len() {
            if random::unit(rng) > self.probability {
                continue;
            }
            let (lower, upper) = (solution.real_lower(i), solution.real_upper(i));
            if upper <= lower {
                continue;
            }
            let y = self.perturb(solution.real_value(i), lower, upper, rng);
            solution.set_real_value(i, y);
        }
        Ok(())
    }
}

/// Flips each bit with probability `probability`.
///
/// Integer variables are instead redrawn uniformly from their range with
/// the same probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitFlipMutation {
    /// Per-bit (or per-integer) probability.
    pub probability: f64,
}

impl BitFlipMutation {
    /// Creates the operator.
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    /// Reads `probability` (required).
    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        Ok(Self::new(params.get_f64("probability")?))
    }
}

impl Mutation for BitFlipMutation {
    fn name(&self) -> &'static str {
        "BitFlipMutation"
    }

    fn execute(&self, solution: &mut Solution, rng: &mut dyn RngCore) -> Result<()> {
        for variable in &mut solution.variables {
            match variable {
                Variable::Binary { bits } | Variable::BinaryReal { bits, .. } => {
                    for bit in bits.iter_mut() {
                        if random::unit(rng) < self.probability {
                            *bit = !*bit;
                        }
                    }
                }
                Variable::Int {
                    value,
                    lower,
                    upper,
                } => {
                    if random::unit(rng) < self.probability && upper >= lower {
                        *value = rng.random_range(*lower..=*upper);
                    }
                }
                _ => {
                    return Err(MoeaError::UnsupportedEncoding(
                        "BitFlipMutation needs binary or integer variables".into(),
                    ))
                }
            }
        }
        Ok(())
    }
}

/// Swaps two distinct positions of each permutation with probability
/// `probability`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapMutation {
    /// Per-permutation probability.
    pub probability: f64,
}

impl SwapMutation {
    /// Creates the operator.
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    /// Reads `probability` (required).
    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        Ok(Self::new(params.get_f64("probability")?))
    }
}

impl Mutation for SwapMutation {
    fn name(&self) -> &'static str {
        "SwapMutation"
    }

    fn execute(&self, solution: &mut Solution, rng: &mut dyn RngCore) -> Result<()> {
        for variable in &mut solution.variables {
            let Some(order) = variable.order_mut() else {
                return Err(MoeaError::UnsupportedEncoding(
                    "SwapMutation needs permutation variables".into(),
                ));
            };
            if random::unit(rng) < self.probability {
                permutation::swap(order, rng);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn reals(n: usize) -> Solution {
        Solution::new(
            (0..n).map(|_| Variable::real(0.5, 0.0, 1.0)).collect(),
            2,
        )
    }

    // ---- Polynomial ----

    #[test]
    fn test_polynomial_stays_in_bounds() {
        let op = PolynomialMutation::new(1.0, 20.0);
        let mut rng = create_rng(42);
        let mut s = Solution::new(
            vec![
                Variable::real(0.0, 0.0, 1.0),
                Variable::real(1.0, 0.0, 1.0),
                Variable::ArrayReal {
                    values: vec![-5.0, 5.0],
                    lower: vec![-5.0, -5.0],
                    upper: vec![5.0, 5.0],
                },
            ],
            2,
        );
        for _ in 0..1000 {
            op.execute(&mut s, &mut rng).unwrap();
            assert!(s.variables.iter().all(Variable::is_within_bounds));
        }
    }

    #[test]
    fn test_polynomial_probability_zero_is_identity() {
        let op = PolynomialMutation::new(0.0, 20.0);
        let mut rng = create_rng(1);
        let mut s = reals(5);
        op.execute(&mut s, &mut rng).unwrap();
        assert_eq!(s.decision_vector(), vec![0.5; 5]);
    }

    #[test]
    fn test_polynomial_skips_degenerate_range() {
        let op = PolynomialMutation::new(1.0, 20.0);
        let mut rng = create_rng(1);
        let mut s = Solution::new(vec![Variable::real(3.0, 3.0, 3.0)], 1);
        op.execute(&mut s, &mut rng).unwrap();
        assert_eq!(s.real_value(0), 3.0);
    }

    #[test]
    fn test_polynomial_moves_values() {
        let op = PolynomialMutation::new(1.0, 20.0);
        let mut rng = create_rng(9);
        let mut s = reals(20);
        op.execute(&mut s, &mut rng).unwrap();
        assert!(s.decision_vector().iter().any(|&v| v != 0.5));
    }

    // ---- Bit flip ----

    #[test]
    fn test_bit_flip_certain_inverts_everything() {
        let op = BitFlipMutation::new(1.0);
        let mut rng = create_rng(2);
        let mut s = Solution::new(
            vec![Variable::Binary {
                bits: vec![true, false, true],
            }],
            1,
        );
        op.execute(&mut s, &mut rng).unwrap();
        assert_eq!(s.variables[0].bits().unwrap(), &[false, true, false]);
    }

    #[test]
    fn test_bit_flip_redraws_integers_in_range() {
        let op = BitFlipMutation::new(1.0);
        let mut rng = create_rng(2);
        let mut s = Solution::new(vec![Variable::int(3, -2, 4)], 1);
        for _ in 0..100 {
            op.execute(&mut s, &mut rng).unwrap();
            assert!(s.variables[0].is_within_bounds());
        }
    }

    #[test]
    fn test_bit_flip_rejects_reals() {
        let op = BitFlipMutation::new(0.5);
        let mut rng = create_rng(2);
        let mut s = reals(1);
        assert!(op.execute(&mut s, &mut rng).is_err());
    }

    // ---- Swap ----

    #[test]
    fn test_swap_keeps_permutation() {
        let op = SwapMutation::new(1.0);
        let mut rng = create_rng(4);
        let mut s = Solution::new(vec![Variable::permutation(7)], 1);
        op.execute(&mut s, &mut rng).unwrap();
        assert_ne!(s.variables[0].order().unwrap(), &[0, 1, 2, 3, 4, 5, 6]);
        for _ in 0..50 {
            op.execute(&mut s, &mut rng).unwrap();
            assert!(s.variables[0].is_within_bounds());
        }
    }
}
