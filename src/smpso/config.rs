//! SMPSO configuration.

use crate::error::Result;
use crate::operators::{OperatorSpec, Parameters, DEFAULT_MUTATION_DISTRIBUTION_INDEX};

/// Configuration for SMPSO.
///
/// The velocity coefficients `r1`, `r2`, `c1`, `c2` and `w` are drawn
/// uniformly from their `(min, max)` ranges once per particle and
/// iteration.
///
/// # Examples
///
/// ```
/// use u_moea::smpso::SmpsoConfig;
///
/// let config = SmpsoConfig::default()
///     .with_swarm_size(50)
///     .with_max_iterations(100)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.archive_size, 100);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SmpsoConfig {
    /// Number of particles.
    pub swarm_size: usize,

    /// Capacity of the leaders archive.
    pub archive_size: usize,

    /// Number of velocity/position updates.
    pub max_iterations: usize,

    /// Turbulence operator applied to every sixth particle.
    ///
    /// When its parameters carry no `probability`, `1 / n` is used where
    /// `n` is the number of decision variables.
    pub mutation: OperatorSpec,

    /// Range of the random factor on the cognitive term.
    pub r1: (f64, f64),

    /// Range of the random factor on the social term.
    pub r2: (f64, f64),

    /// Range of the cognitive acceleration coefficient.
    pub c1: (f64, f64),

    /// Range of the social acceleration coefficient.
    pub c2: (f64, f64),

    /// Range of the inertia weight.
    pub w: (f64, f64),

    /// Velocity factor applied when a particle hits its lower bound.
    pub ch_vel1: f64,

    /// Velocity factor applied when a particle hits its upper bound.
    pub ch_vel2: f64,

    /// Whether to evaluate the swarm in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SmpsoConfig {
    fn default() -> Self {
        Self {
            swarm_size: 100,
            archive_size: 100,
            max_iterations: 250,
            mutation: OperatorSpec::new("PolynomialMutation")
                .with("distributionIndex", DEFAULT_MUTATION_DISTRIBUTION_INDEX),
            r1: (0.0, 1.0),
            r2: (0.0, 1.0),
            c1: (1.5, 2.5),
            c2: (1.5, 2.5),
            w: (0.1, 0.1),
            ch_vel1: -1.0,
            ch_vel2: -1.0,
            parallel: true,
            seed: None,
        }
    }
}

impl SmpsoConfig {
    /// Sets the number of particles.
    pub fn with_swarm_size(mut self, n: usize) -> Self {
        self.swarm_size = n;
        self
    }

    /// Sets the leaders archive capacity.
    pub fn with_archive_size(mut self, n: usize) -> Self {
        self.archive_size = n;
        self
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the turbulence operator.
    pub fn with_mutation(mut self, mutation: OperatorSpec) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the range of `r1`.
    pub fn with_r1(mut self, min: f64, max: f64) -> Self {
        self.r1 = (min, max);
        self
    }

    /// Sets the range of `r2`.
    pub fn with_r2(mut self, min: f64, max: f64) -> Self {
        self.r2 = (min, max);
        self
    }

    /// Sets the range of `c1`.
    pub fn with_c1(mut self, min: f64, max: f64) -> Self {
        self.c1 = (min, max);
        self
    }

    /// Sets the range of `c2`.
    pub fn with_c2(mut self, min: f64, max: f64) -> Self {
        self.c2 = (min, max);
        self
    }

    /// Sets the range of the inertia weight.
    pub fn with_inertia(mut self, min: f64, max: f64) -> Self {
        self.w = (min, max);
        self
    }

    /// Sets the velocity factors applied on lower and upper bound hits.
    pub fn with_bound_velocity(mut self, lower: f64, upper: f64) -> Self {
        self.ch_vel1 = lower;
        self.ch_vel2 = upper;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reads a configuration from a parameter bag.
    ///
    /// Keys: `swarmSize`, `archiveSize`, `maxIterations`, `mutation` (and
    /// `mutation.*`), `r1Min`, `r1Max`, `r2Min`, `r2Max`, `C1Min`,
    /// `C1Max`, `C2Min`, `C2Max`, `WMin`, `WMax`, `ChVel1`, `ChVel2`,
    /// `parallel`, `seed`. Absent keys keep their defaults.
    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        let d = Self::default();
        let range = |min: &str, max: &str, default: (f64, f64)| -> Result<(f64, f64)> {
            Ok((params.f64_or(min, default.0)?, params.f64_or(max, default.1)?))
        };

        let mut mutation = OperatorSpec::from_parameters(params, "mutation", &d.mutation.name)?;
        if mutation.name.eq_ignore_ascii_case(&d.mutation.name) {
            mutation.parameters = mutation
                .parameters
                .with_default("distributionIndex", DEFAULT_MUTATION_DISTRIBUTION_INDEX);
        }

        Ok(Self {
            swarm_size: params.usize_or("swarmSize", d.swarm_size)?,
            archive_size: params.usize_or("archiveSize", d.archive_size)?,
            max_iterations: params.usize_or("maxIterations", d.max_iterations)?,
            mutation,
            r1: range("r1Min", "r1Max", d.r1)?,
            r2: range("r2Min", "r2Max", d.r2)?,
            c1: range("C1Min", "C1Max", d.c1)?,
            c2: range("C2Min", "C2Max", d.c2)?,
            w: range("WMin", "WMax", d.w)?,
            ch_vel1: params.f64_or("ChVel1", d.ch_vel1)?,
            ch_vel2: params.f64_or("ChVel2", d.ch_vel2)?,
            parallel: params.bool_or("parallel", d.parallel)?,
            seed: params.seed("seed")?,
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.swarm_size == 0 {
            return Err("swarm_size must be at least 1".into());
        }
        if self.archive_size == 0 {
            return Err("archive_size must be at least 1".into());
        }
        for (name, (min, max)) in [
            ("r1", self.r1),
            ("r2", self.r2),
            ("c1", self.c1),
            ("c2", self.c2),
            ("w", self.w),
        ] {
            if !(min.is_finite() && max.is_finite()) || min > max {
                return Err(format!("{name} range must satisfy min <= max, got ({min}, {max})"));
            }
        }
        if !self.ch_vel1.is_finite() || !self.ch_vel2.is_finite() {
            return Err("bound velocity factors must be finite".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let c = SmpsoConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.swarm_size, 100);
        assert_eq!(c.max_iterations, 250);
        assert_eq!(c.c1, (1.5, 2.5));
        assert_eq!(c.ch_vel1, -1.0);
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(SmpsoConfig::default().with_swarm_size(0).validate().is_err());
        assert!(SmpsoConfig::default().with_archive_size(0).validate().is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = SmpsoConfig::default().with_c2(3.0, 1.0).validate().unwrap_err();
        assert!(err.contains("c2"));
    }

    #[test]
    fn test_from_parameters() {
        let params = Parameters::new()
            .with("swarmSize", 40)
            .with("maxIterations", 10)
            .with("WMin", 0.2)
            .with("WMax", 0.4)
            .with("mutation.probability", 0.5)
            .with("seed", 9);
        let c = SmpsoConfig::from_parameters(&params).unwrap();
        assert_eq!(c.swarm_size, 40);
        assert_eq!(c.archive_size, 100);
        assert_eq!(c.max_iterations, 10);
        assert_eq!(c.w, (0.2, 0.4));
        assert_eq!(c.seed, Some(9));
        assert_eq!(c.mutation.name, "PolynomialMutation");
        assert_eq!(c.mutation.parameters.get_f64("probability").unwrap(), 0.5);
        assert_eq!(c.mutation.parameters.get_f64("distributionIndex").unwrap(), 20.0);
    }

    #[test]
    fn test_from_parameters_type_errors() {
        let params = Parameters::new().with("swarmSize", "many");
        assert!(SmpsoConfig::from_parameters(&params).is_err());
    }
}
