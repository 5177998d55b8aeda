//! Algorithm abstraction and the by-name algorithm factory.
//!
//! [`create_algorithm`] turns an algorithm name and a [`Parameters`] bag
//! into a ready-to-run [`ConfiguredAlgorithm`]. Any [`Algorithm`] can be
//! queued on a [`MultithreadedAlgorithmRunner`](crate::parallel::MultithreadedAlgorithmRunner).

use crate::abyss::{AbyssConfig, AbyssRunner};
use crate::core::{Problem, SolutionSet};
use crate::error::{MoeaError, Result};
use crate::operators::Parameters;
use crate::smpso::{SmpsoConfig, SmpsoRunner};
use tracing::error;

/// A configured search that produces a solution set.
pub trait Algorithm: Send {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Runs the search and returns its front.
    fn execute(&mut self) -> Result<SolutionSet>;
}

/// An algorithm bound to its problem and configuration.
///
/// # Examples
///
/// ```
/// use u_moea::algorithm::{create_algorithm, Algorithm};
/// use u_moea::core::{Problem, Solution};
/// use u_moea::operators::Parameters;
/// use u_moea::Result;
///
/// struct Schaffer;
///
/// impl Problem for Schaffer {
///     fn number_of_variables(&self) -> usize { 1 }
///     fn number_of_objectives(&self) -> usize { 2 }
///     fn lower_limit(&self, _i: usize) -> f64 { -5.0 }
///     fn upper_limit(&self, _i: usize) -> f64 { 5.0 }
///     fn evaluate(&self, s: &mut Solution) -> Result<()> {
///         let x = s.real_value(0);
///         s.objectives = vec![x * x, (x - 2.0) * (x - 2.0)];
///         Ok(())
///     }
/// }
///
/// let params = Parameters::new()
///     .with("swarmSize", 20)
///     .with("maxIterations", 10)
///     .with("seed", 1);
/// let mut algorithm = create_algorithm("smpso", &Schaffer, &params)?;
/// assert_eq!(algorithm.name(), "SMPSO");
/// let front = algorithm.execute()?;
/// assert!(!front.is_empty());
/// # Ok::<(), u_moea::MoeaError>(())
/// ```
pub enum ConfiguredAlgorithm<'p> {
    /// Particle swarm.
    Smpso {
        /// Problem to optimize.
        problem: &'p dyn Problem,
        /// Run settings.
        config: SmpsoConfig,
    },
    /// Scatter search.
    Abyss {
        /// Problem to optimize.
        problem: &'p dyn Problem,
        /// Run settings.
        config: AbyssConfig,
    },
}

impl std::fmt::Debug for ConfiguredAlgorithm<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Smpso { problem, config } => f
                .debug_struct("Smpso")
                .field("problem", &problem.name())
                .field("config", config)
                .finish(),
            Self::Abyss { problem, config } => f
                .debug_struct("Abyss")
                .field("problem", &problem.name())
                .field("config", config)
                .finish(),
        }
    }
}

impl Algorithm for ConfiguredAlgorithm<'_> {
    fn name(&self) -> &str {
        match self {
            Self::Smpso { .. } => "SMPSO",
            Self::Abyss { .. } => "AbYSS",
        }
    }

    fn execute(&mut self) -> Result<SolutionSet> {
        match self {
            Self::Smpso { problem, config } => Ok(SmpsoRunner::run(*problem, config)?.leaders),
            Self::Abyss { problem, config } => Ok(AbyssRunner::run(*problem, config)?.archive),
        }
    }
}

/// Builds an algorithm by name (case-insensitive): `"SMPSO"` or `"AbYSS"`.
///
/// The configuration is read with the matching `from_parameters` and
/// validated before the algorithm is returned.
///
/// # Errors
/// - [`MoeaError::UnknownAlgorithm`] for any other name
/// - parameter errors from the configuration reader
/// - [`MoeaError::InvalidConfig`] when the configuration fails validation
pub fn create_algorithm<'p>(
    name: &str,
    problem: &'p dyn Problem,
    params: &Parameters,
) -> Result<ConfiguredAlgorithm<'p>> {
    let algorithm = match name.to_lowercase().as_str() {
        "smpso" => {
            let config = SmpsoConfig::from_parameters(params)?;
            config.validate().map_err(MoeaError::InvalidConfig)?;
            ConfiguredAlgorithm::Smpso { problem, config }
        }
        "abyss" => {
            let config = AbyssConfig::from_parameters(params)?;
            config.validate().map_err(MoeaError::InvalidConfig)?;
            ConfiguredAlgorithm::Abyss { problem, config }
        }
        _ => {
            error!(name, "unknown algorithm");
            return Err(MoeaError::UnknownAlgorithm(name.to_string()));
        }
    };
    Ok(algorithm)
}
