//! Error type shared by every module of the crate.

use thiserror::Error;

/// Errors raised while configuring or running an optimization.
///
/// Index and bounds violations are programmer errors and panic instead;
/// see the individual accessors.
#[derive(Debug, Error)]
pub enum MoeaError {
    /// A factory was asked for an operator it does not know.
    #[error("unknown {kind} operator '{name}'")]
    UnknownOperator {
        /// Operator family ("crossover", "mutation", ...).
        kind: &'static str,
        /// The name that failed to resolve.
        name: String,
    },

    /// The algorithm factory was asked for an algorithm it does not know.
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    /// A required parameter is absent from the parameter bag.
    #[error("missing parameter '{0}'")]
    MissingParameter(String),

    /// A parameter is present but has the wrong type or an out-of-range value.
    #[error("parameter '{key}' is invalid: {reason}")]
    InvalidParameter {
        /// Parameter key.
        key: String,
        /// Human readable reason.
        reason: String,
    },

    /// A configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The problem's variables cannot be handled by the requested operator.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// `Problem::evaluate` or `Problem::evaluate_constraints` failed.
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    /// The worker pool could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// Reading a reference front failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A reference front file contains something that is not a number.
    #[error("could not parse front: {0}")]
    Parse(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MoeaError>;
