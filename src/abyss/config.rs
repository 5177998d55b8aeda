//! AbYSS configuration.

use crate::diversification::DEFAULT_SUBRANGES;
use crate::error::Result;
use crate::operators::{
    OperatorSpec, Parameters, DEFAULT_MUTATION_DISTRIBUTION_INDEX, DEFAULT_SBX_DISTRIBUTION_INDEX,
};

/// Configuration for AbYSS.
///
/// # Examples
///
/// ```
/// use u_moea::abyss::AbyssConfig;
///
/// let config = AbyssConfig::default()
///     .with_max_evaluations(5_000)
///     .with_seed(1);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.ref_set1_size, 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AbyssConfig {
    /// Size of the working population rebuilt at every restart.
    pub population_size: usize,

    /// Capacity of the quality reference set.
    pub ref_set1_size: usize,

    /// Capacity of the diversity reference set.
    pub ref_set2_size: usize,

    /// Capacity of the external crowding archive.
    pub archive_size: usize,

    /// Evaluation budget.
    pub max_evaluations: usize,

    /// Combination operator applied to reference-set pairs.
    pub crossover: OperatorSpec,

    /// Improvement operator applied to every new solution.
    ///
    /// For the default `MutationLocalSearch`, a missing
    /// `mutation.probability` defaults to `1 / n`.
    pub improvement: OperatorSpec,

    /// Bands per variable used by the diversification generator.
    pub number_of_subranges: usize,

    /// Whether to evaluate batches in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for AbyssConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            ref_set1_size: 10,
            ref_set2_size: 10,
            archive_size: 100,
            max_evaluations: 25_000,
            crossover: default_crossover(),
            improvement: default_improvement(),
            number_of_subranges: DEFAULT_SUBRANGES,
            parallel: true,
            seed: None,
        }
    }
}

fn default_crossover() -> OperatorSpec {
    OperatorSpec::new("SBXCrossover")
        .with("probability", 1.0)
        .with("distributionIndex", DEFAULT_SBX_DISTRIBUTION_INDEX)
}

fn default_improvement() -> OperatorSpec {
    OperatorSpec::new("MutationLocalSearch")
        .with("improvementRounds", 1)
        .with("mutation", "PolynomialMutation")
        .with("mutation.distributionIndex", DEFAULT_MUTATION_DISTRIBUTION_INDEX)
}

impl AbyssConfig {
    /// Sets the working population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets both reference set capacities.
    pub fn with_ref_set_sizes(mut self, ref_set1: usize, ref_set2: usize) -> Self {
        self.ref_set1_size = ref_set1;
        self.ref_set2_size = ref_set2;
        self
    }

    /// Sets the external archive capacity.
    pub fn with_archive_size(mut self, n: usize) -> Self {
        self.archive_size = n;
        self
    }

    /// Sets the evaluation budget.
    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = n;
        self
    }

    /// Sets the combination operator.
    pub fn with_crossover(mut self, crossover: OperatorSpec) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the improvement operator.
    pub fn with_improvement(mut self, improvement: OperatorSpec) -> Self {
        self.improvement = improvement;
        self
    }

    /// Sets the number of diversification bands per variable.
    pub fn with_number_of_subranges(mut self, n: usize) -> Self {
        self.number_of_subranges = n;
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
    /// Keys: `populationSize`, `refSet1Size`, `refSet2Size`,
    /// `archiveSize`, `maxEvaluations`, `crossover` (and `crossover.*`),
    /// `improvement` (and `improvement.*`), `numberOfSubranges`,
    /// `parallel`, `seed`. Operator settings that are not given keep the
    /// defaults of the default operators.
    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        let d = Self::default();
        let operator = |key: &str, default: &OperatorSpec| -> Result<OperatorSpec> {
            let mut spec = OperatorSpec::from_parameters(params, key, &default.name)?;
            if spec.name.eq_ignore_ascii_case(&default.name) {
                for (k, v) in default.parameters.iter() {
                    spec.parameters = spec.parameters.with_default(k, v.clone());
                }
            }
            Ok(spec)
        };

        Ok(Self {
            population_size: params.usize_or("populationSize", d.population_size)?,
            ref_set1_size: params.usize_or("refSet1Size", d.ref_set1_size)?,
            ref_set2_size: params.usize_or("refSet2Size", d.ref_set2_size)?,
            archive_size: params.usize_or("archiveSize", d.archive_size)?,
            max_evaluations: params.usize_or("maxEvaluations", d.max_evaluations)?,
            crossover: operator("crossover", &d.crossover)?,
            improvement: operator("improvement", &d.improvement)?,
            number_of_subranges: params.usize_or("numberOfSubranges", d.number_of_subranges)?,
            parallel: params.bool_or("parallel", d.parallel)?,
            seed: params.seed("seed")?,
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.population_size == 0 {
            return Err("population_size must be at least 1".into());
        }
        if self.ref_set1_size == 0 {
            return Err("ref_set1_size must be at least 1".into());
        }
        if self.archive_size == 0 {
            return Err("archive_size must be at least 1".into());
        }
        if self.max_evaluations == 0 {
            return Err("max_evaluations must be at least 1".into());
        }
        if self.number_of_subranges == 0 {
            return Err("number_of_subranges must be at least 1".into());
        }
        Ok(())
    }
}
