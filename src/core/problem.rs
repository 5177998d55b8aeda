//! The problem contract.
//!
//! A host application describes what to optimize by implementing
//! [`Problem`]: variable count and bounds, objective and constraint counts,
//! and an evaluation function. Everything else (variable creation for each
//! [`Encoding`]) has a default.

use super::solution::Solution;
use super::variable::{Variable, DEFAULT_PRECISION};
use crate::error::Result;
use crate::random;
use rand::{Rng, RngCore};

/// How a problem's decision variables are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// One bounded real per dimension.
    #[default]
    Real,
    /// One bounded integer per dimension.
    Int,
    /// One bit string per dimension decoded into a bounded real.
    BinaryReal,
    /// One raw bit string per dimension.
    Binary,
    /// One permutation per dimension.
    Permutation,
    /// The first [`Problem::number_of_int_variables`] dimensions are
    /// integers, the rest reals.
    IntReal,
    /// A single `ArrayReal` variable holding every dimension.
    ArrayReal,
}

/// An optimization problem: bounds, objective count and evaluation.
///
/// Implementations must be `Send + Sync` because the batch evaluator calls
/// [`evaluate`](Problem::evaluate) from worker threads. `evaluate` must be a
/// pure function of the solution's variables.
///
/// # Examples
///
/// ```
/// use u_moea::core::{Problem, Solution};
/// use u_moea::Result;
///
/// struct Schaffer;
///
/// impl Problem for Schaffer {
///     fn number_of_variables(&self) -> usize { 1 }
///     fn number_of_objectives(&self) -> usize { 2 }
///     fn lower_limit(&self, _i: usize) -> f64 { -10.0 }
///     fn upper_limit(&self, _i: usize) -> f64 { 10.0 }
///     fn evaluate(&self, s: &mut Solution) -> Result<()> {
///         let x = s.real_value(0);
///         s.objectives[0] = x * x;
///         s.objectives[1] = (x - 2.0) * (x - 2.0);
///         Ok(())
///     }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// Human readable name, used in logs.
    fn name(&self) -> &str {
        "problem"
    }

    /// Number of decision dimensions.
    fn number_of_variables(&self) -> usize;

    /// Number of objectives.
    fn number_of_objectives(&self) -> usize;

    /// Number of constraints. `0` disables constraint evaluation.
    fn number_of_constraints(&self) -> usize {
        0
    }

    /// Lower bound of dimension `i`.
    fn lower_limit(&self, i: usize) -> f64;

    /// Upper bound of dimension `i`.
    fn upper_limit(&self, i: usize) -> f64;

    /// Variable representation.
    fn encoding(&self) -> Encoding {
        Encoding::Real
    }

    /// Bit count (binary encodings) or permutation length of dimension `i`.
    fn length(&self, _i: usize) -> usize {
        DEFAULT_PRECISION
    }

    /// Number of leading integer dimensions for [`Encoding::IntReal`].
    fn number_of_int_variables(&self) -> usize {
        0
    }

    /// Fills `solution.objectives`.
    fn evaluate(&self, solution: &mut Solution) -> Result<()>;

    /// Fills `solution.overall_constraint_violation` (non-negative) and
    /// `number_of_violated_constraints`.
    fn evaluate_constraints(&self, _solution: &mut Solution) -> Result<()> {
        Ok(())
    }

    /// Creates randomly initialized variables for a new solution.
    fn create_variables(&self, rng: &mut dyn RngCore) -> Vec<Variable> {
        let n = self.number_of_variables();
        match self.encoding() {
            Encoding::Real => (0..n).map(|i| random_real(self, i, rng)).collect(),
            Encoding::Int => (0..n).map(|i| random_int(self, i, rng)).collect(),
            Encoding::IntReal => {
                let ints = self.number_of_int_variables().min(n);
                (0..n)
                    .map(|i| {
                        if i < ints {
                            random_int(self, i, rng)
                        } else {
                            random_real(self, i, rng)
                        }
                    })
                    .collect()
            }
            Encoding::BinaryReal => (0..n)
                .map(|i| Variable::BinaryReal {
                    bits: random_bits(self.length(i), rng),
                    lower: self.lower_limit(i),
                    upper: self.upper_limit(i),
                })
                .collect(),
            Encoding::Binary => (0..n)
                .map(|i| Variable::Binary {
                    bits: random_bits(self.length(i), rng),
                })
                .collect(),
            Encoding::Permutation => (0..n)
                .map(|i| Variable::Permutation {
                    order: random::int_permutation(self.length(i), rng),
                })
                .collect(),
            Encoding::ArrayReal => {
                let lower: Vec<f64> = (0..n).map(|i| self.lower_limit(i)).collect();
                let upper: Vec<f64> = (0..n).map(|i| self.upper_limit(i)).collect();
                let values = lower
                    .iter()
                    .zip(upper.iter())
                    .map(|(&lo, &hi)| random::uniform(rng, lo, hi))
                    .collect();
                vec![Variable::ArrayReal {
                    values,
                    lower,
                    upper,
                }]
            }
        }
    }
}

/// Evaluates objectives, then constraints when the problem has any.
pub fn evaluate_solution(problem: &dyn Problem, solution: &mut Solution) -> Result<()> {
    problem.evaluate(solution)?;
    if problem.number_of_constraints() > 0 {
        problem.evaluate_constraints(solution)?;
    }
    Ok(())
}

fn random_real<P: Problem + ?Sized>(p: &P, i: usize, rng: &mut dyn RngCore) -> Variable {
    let (lo, hi) = (p.lower_limit(i), p.upper_limit(i));
    Variable::real(random::uniform(rng, lo, hi), lo, hi)
}

fn random_int<P: Problem + ?Sized>(p: &P, i: usize, rng: &mut dyn RngCore) -> Variable {
    let lo = p.lower_limit(i).ceil() as i64;
    let hi = p.upper_limit(i).floor() as i64;
    let value = if hi > lo { rng.random_range(lo..=hi) } else { lo };
    Variable::int(value, lo, hi.max(lo))
}

fn random_bits(len: usize, rng: &mut dyn RngCore) -> Vec<bool> {
    (0..len).map(|_| rng.random_bool(0.5)).collect()
}
