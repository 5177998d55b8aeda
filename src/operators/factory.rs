//! Name-keyed operator factories.
//!
//! Names are matched case-insensitively. An unknown name is an error for
//! the construction call; there is no fallback operator.

use super::crossover::{OrderCrossover, PmxCrossover, SbxCrossover, SinglePointCrossover};
use super::local_search::MutationLocalSearch;
use super::mutation::{BitFlipMutation, PolynomialMutation, SwapMutation};
use super::parameters::Parameters;
use super::selection::{BinaryTournament, BinaryTournament2};
use super::{Crossover, LocalSearch, Mutation, Selection};
use crate::error::{MoeaError, Result};
use tracing::error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An operator name together with its parameter bag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OperatorSpec {
    /// Operator name, e.g. `"SBXCrossover"`.
    pub name: String,
    /// The operator's own parameters, without any prefix.
    pub parameters: Parameters,
}

impl OperatorSpec {
    /// A spec with no parameters.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            parameters: Parameters::new(),
        }
    }

    /// Builder-style parameter insert.
    pub fn with<K: Into<String>, V: Into<super::ParamValue>>(mut self, key: K, value: V) -> Self {
        self.parameters.set(key, value);
        self
    }

    /// Reads the operator named under `key` (or `default_name`) together
    /// with every `key.*` entry.
    pub fn from_parameters(params: &Parameters, key: &str, default_name: &str) -> Result<Self> {
        Ok(Self {
            name: params.str_or(key, default_name)?.to_string(),
            parameters: params.scoped(key),
        })
    }

    /// Builds the named crossover.
    pub fn crossover(&self) -> Result<Box<dyn Crossover>> {
        create_crossover(&self.name, &self.parameters)
    }

    /// Builds the named mutation.
    pub fn mutation(&self) -> Result<Box<dyn Mutation>> {
        create_mutation(&self.name, &self.parameters)
    }

    /// Builds the named selection.
    pub fn selection(&self) -> Result<Box<dyn Selection>> {
        create_selection(&self.name, &self.parameters)
    }

    /// Builds the named local search.
    pub fn local_search(&self) -> Result<Box<dyn LocalSearch>> {
        create_local_search(&self.name, &self.parameters)
    }
}

/// Resolves a crossover by name.
///
/// Known names: `SBXCrossover`, `SinglePointCrossover`, `PMXCrossover`,
/// `OrderCrossover`.
pub fn create_crossover(name: &str, params: &Parameters) -> Result<Box<dyn Crossover>> {
    match name.to_lowercase().as_str() {
        "sbxcrossover" | "sbx" => Ok(Box::new(SbxCrossover::from_parameters(params)?)),
        "singlepointcrossover" => Ok(Box::new(SinglePointCrossover::from_parameters(params)?)),
        "pmxcrossover" | "pmx" => Ok(Box::new(PmxCrossover::from_parameters(params)?)),
        "ordercrossover" | "ox" => Ok(Box::new(OrderCrossover::from_parameters(params)?)),
        _ => Err(unknown("crossover", name)),
    }
}

/// Resolves a mutation by name.
///
/// Known names: `PolynomialMutation`, `BitFlipMutation`, `SwapMutation`.
pub fn create_mutation(name: &str, params: &Parameters) -> Result<Box<dyn Mutation>> {
    match name.to_lowercase().as_str() {
        "polynomialmutation" => Ok(Box::new(PolynomialMutation::from_parameters(params)?)),
        "bitflipmutation" => Ok(Box::new(BitFlipMutation::from_parameters(params)?)),
        "swapmutation" => Ok(Box::new(SwapMutation::from_parameters(params)?)),
        _ => Err(unknown("mutation", name)),
    }
}

/// Resolves a selection by name.
///
/// Known names: `BinaryTournament`, `BinaryTournament2`.
pub fn create_selection(name: &str, params: &Parameters) -> Result<Box<dyn Selection>> {
    match name.to_lowercase().as_str() {
        "binarytournament" => Ok(Box::new(BinaryTournament::from_parameters(params)?)),
        "binarytournament2" => Ok(Box::new(BinaryTournament2::from_parameters(params)?)),
        _ => Err(unknown("selection", name)),
    }
}

/// Resolves a local search by name.
///
/// Known names: `MutationLocalSearch`.
pub fn create_local_search(name: &str, params: &Parameters) -> Result<Box<dyn LocalSearch>> {
    match name.to_lowercase().as_str() {
        "mutationlocalsearch" => Ok(Box::new(MutationLocalSearch::from_parameters(params)?)),
        _ => Err(unknown("local search", name)),
    }
}

fn unknown(kind: &'static str, name: &str) -> MoeaError {
    error!(kind, name, "unknown operator");
    MoeaError::UnknownOperator {
        kind,
        name: name.to_string(),
    }
}
