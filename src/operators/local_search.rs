//! Local-search (improvement) operators.

use super::factory::create_mutation;
use super::parameters::Parameters;
use super::{LocalSearch, Mutation};
use crate::archive::Archive;
use crate::core::{
    dominance, ConstraintViolationComparator, Problem, Solution, SolutionComparator,
};
use crate::error::Result;
use crate::parallel::evaluate_caught;
use rand::RngCore;
use std::cmp::Ordering;
use tracing::warn;

/// The outcome of a local search.
#[derive(Debug, Clone)]
pub struct Improvement {
    /// The improved (or unchanged) solution.
    pub solution: Solution,
    /// Evaluations spent.
    pub evaluations: usize,
}

/// Mutation hill climbing.
///
/// Each round mutates a copy of the incumbent and evaluates it. A mutant
/// that beats the incumbent replaces it; a mutant that neither beats nor
/// loses to it is offered to the optional archive. With constraints, the
/// constraint-violation comparator is consulted before dominance. A mutant
/// whose evaluation fails or panics is discarded; the round still counts
/// as one evaluation.
#[derive(Debug)]
pub struct MutationLocalSearch {
    rounds: usize,
    mutation: Box<dyn Mutation>,
}

impl MutationLocalSearch {
    /// Creates the operator.
    pub fn new(rounds: usize, mutation: Box<dyn Mutation>) -> Self {
        Self { rounds, mutation }
    }

    /// Reads `improvementRounds` (default 1) and the `mutation` operator,
    /// whose own settings live under `mutation.*`.
    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        let rounds = params.usize_or("improvementRounds", 1)?;
        let name = params.str_or("mutation", "PolynomialMutation")?;
        let mutation = create_mutation(name, &params.scoped("mutation"))?;
        Ok(Self::new(rounds, mutation))
    }

    /// Number of mutate-evaluate rounds per call.
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

impl LocalSearch for MutationLocalSearch {
    fn name(&self) -> &'static str {
        "MutationLocalSearch"
    }

    fn improve(
        &self,
        solution: &Solution,
        problem: &dyn Problem,
        mut archive: Option<&mut dyn Archive>,
        rng: &mut dyn RngCore,
    ) -> Result<Improvement> {
        let constrained = problem.number_of_constraints() > 0;
        let mut incumbent = solution.clone();
        let mut evaluations = 0;

        for _ in 0..self.rounds {
            let mut mutant = incumbent.clone();
            self.mutation.execute(&mut mutant, rng)?;
            evaluations += 1;
            if let Err(e) = evaluate_caught(problem, &mut mutant) {
                warn!(error = %e, "mutant evaluation failed, mutant discarded");
                continue;
            }

            let verdict = if constrained {
                match ConstraintViolationComparator.compare(&mutant, &incumbent) {
                    Ordering::Equal => dominance(&mutant, &incumbent),
                    decided => decided,
                }
            } else {
                dominance(&mutant, &incumbent)
            };

            match verdict {
                Ordering::Less => incumbent = mutant,
                Ordering::Greater => {}
                Ordering::Equal => {
                    if let Some(archive) = archive.as_deref_mut() {
                        archive.add(mutant);
                    }
                }
            }
        }

        Ok(Improvement {
            solution: incumbent,
            evaluations,
        })
    }
}
