//! AbYSS scatter-search loop.
//!
//! [`ScatterSearch`] holds the search state and exposes each scatter-search
//! step; [`AbyssRunner`] drives it until the evaluation budget is spent:
//!
//! ```text
//! initial population
//! loop:
//!     build RefSet1 / RefSet2
//!     while subset generation produces offspring:
//!         improve offspring, update reference sets
//!     restart
//! ```

use super::config::AbyssConfig;
use crate::archive::{Archive, CrowdingArchive};
use crate::core::{
    dominance, objectives_equal, CrowdingDistanceComparator, FitnessComparator, Problem, Solution,
    SolutionSet,
};
use crate::density::{assign_spea2_fitness, distance_to_set};
use crate::diversification::DiversificationGenerator;
use crate::error::{MoeaError, Result};
use crate::operators::{create_crossover, create_local_search, Crossover, LocalSearch};
use crate::parallel::{evaluate_all, retain_marked};
use crate::random::{rng_from_seed, MoeaRng};
use rand::RngCore;
use std::cmp::Ordering;
use tracing::{debug, info, warn};

/// Result of an AbYSS run.
#[derive(Debug, Clone)]
pub struct AbyssResult {
    /// The external crowding archive.
    pub archive: SolutionSet,

    /// Number of problem evaluations spent.
    pub evaluations: usize,

    /// Number of population restarts performed.
    pub restarts: usize,
}

/// Executes AbYSS (Nebro et al., 2008).
///
/// # Usage
///
/// ```ignore
/// let config = AbyssConfig::default().with_max_evaluations(10_000).with_seed(3);
/// let result = AbyssRunner::run(&problem, &config)?;
/// println!("{} solutions after {} restarts", result.archive.len(), result.restarts);
/// ```
pub struct AbyssRunner;

impl AbyssRunner {
    /// Runs AbYSS on `problem`.
    ///
    /// # Errors
    /// - [`MoeaError::InvalidConfig`] if `config` fails validation
    /// - [`MoeaError::UnsupportedEncoding`] if the problem is not real-coded
    /// - any error raised by the operator factories or by evaluation
    pub fn run(problem: &dyn Problem, config: &AbyssConfig) -> Result<AbyssResult> {
        ScatterSearch::new(problem, config)?.run()
    }
}

/// The state of one scatter search.
///
/// Each step of the algorithm is a public method so the reference-set
/// logic can be driven and inspected piece by piece.
pub struct ScatterSearch<'p> {
    problem: &'p dyn Problem,
    config: AbyssConfig,
    crossover: Box<dyn Crossover>,
    improvement: Box<dyn LocalSearch>,
    generator: DiversificationGenerator,
    population: SolutionSet,
    ref_set1: SolutionSet,
    ref_set2: SolutionSet,
    subset: Vec<Solution>,
    archive: CrowdingArchive,
    evaluations: usize,
    restarts: usize,
    rng: MoeaRng,
}

impl<'p> ScatterSearch<'p> {
    /// Validates `config` and builds the operators.
    ///
    /// The improvement's `mutation.probability` defaults to `1 / n`.
    pub fn new(problem: &'p dyn Problem, config: &AbyssConfig) -> Result<Self> {
        config.validate().map_err(MoeaError::InvalidConfig)?;

        let n = problem.number_of_variables().max(1);
        let crossover = create_crossover(&config.crossover.name, &config.crossover.parameters)?;
        let improvement_params = config
            .improvement
            .parameters
            .clone()
            .with_default("mutation.probability", 1.0 / n as f64);
        let improvement = create_local_search(&config.improvement.name, &improvement_params)?;

        Ok(Self {
            problem,
            crossover,
            improvement,
            generator: DiversificationGenerator::new(n, config.number_of_subranges),
            population: SolutionSet::new(),
            ref_set1: SolutionSet::new(),
            ref_set2: SolutionSet::new(),
            subset: Vec::new(),
            archive: CrowdingArchive::new(config.archive_size),
            evaluations: 0,
            restarts: 0,
            rng: rng_from_seed(config.seed),
            config: config.clone(),
        })
    }

    /// The working population.
    pub fn population(&self) -> &SolutionSet {
        &self.population
    }

    /// The quality reference set.
    pub fn ref_set1(&self) -> &SolutionSet {
        &self.ref_set1
    }

    /// The diversity reference set.
    pub fn ref_set2(&self) -> &SolutionSet {
        &self.ref_set2
    }

    /// The external archive.
    pub fn archive(&self) -> &SolutionSet {
        self.archive.solutions()
    }

    /// Evaluations spent so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Restarts performed so far.
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Draws an unevaluated solution from the diversification generator.
    pub fn diversification_generation(&mut self) -> Result<Solution> {
        self.generator.generate(self.problem, &mut self.rng)
    }

    /// Runs the improvement operator on `solution`, feeding non-dominated
    /// mutants to the archive.
    pub fn improve(&mut self, solution: &Solution) -> Result<Solution> {
        let improvement = self.improvement.improve(
            solution,
            self.problem,
            Some(&mut self.archive as &mut dyn Archive),
            &mut self.rng,
        )?;
        self.evaluations += improvement.evaluations;
        Ok(improvement.solution)
    }

    /// Fills the population with `population_size` diversified, evaluated
    /// and improved solutions.
    pub fn initialize(&mut self) -> Result<()> {
        self.population.clear();
        let missing = self.config.population_size;
        self.fill_with_diversified(missing)
    }

    /// Updates the reference sets.
    ///
    /// With `build` set, RefSet1 takes the fittest population members and
    /// RefSet2 is filled by farthest-point selection from the rest.
    /// Otherwise every buffered offspring is improved and offered to
    /// RefSet1, then to RefSet2; the buffer is emptied.
    pub fn reference_set_update(&mut self, build: bool) -> Result<()> {
        if build {
            self.build_reference_sets();
            return Ok(());
        }

        let offspring = std::mem::take(&mut self.subset);
        for child in &offspring {
            let individual = self.improve(child)?;
            if self.ref_set1_test(&individual) {
                for member in self.ref_set2.iter_mut() {
                    let d = member.decision_distance(&individual);
                    if d < member.distance_to_set {
                        member.distance_to_set = d;
                    }
                }
            } else {
                self.ref_set2_test(&individual);
            }
        }
        Ok(())
    }

    fn build_reference_sets(&mut self) {
        assign_spea2_fitness(self.population.as_mut_slice());
        self.population.sort_by(&FitnessComparator);

        let elite = self.config.ref_set1_size.min(self.population.len());
        for _ in 0..elite {
            let mut best = self.population.remove(0);
            best.unmark();
            self.ref_set1.push(best);
        }

        for candidate in self.population.iter_mut() {
            candidate.distance_to_set = distance_to_set(candidate, self.ref_set1.as_slice());
        }

        let diverse = self.config.ref_set2_size.min(self.population.len());
        for _ in 0..diverse {
            let index = farthest(&self.population);
            let mut picked = self.population.remove(index);
            for other in self.population.iter_mut() {
                let d = other.decision_distance(&picked);
                if d < other.distance_to_set {
                    other.distance_to_set = d;
                }
            }
            picked.unmark();
            self.ref_set2.push(picked);

            let members = self.ref_set2.as_mut_slice();
            for j in 0..members.len() {
                for k in 0..members.len() {
                    if j != k {
                        let d = members[j].decision_distance(&members[k]);
                        if d < members[j].distance_to_set {
                            members[j].distance_to_set = d;
                        }
                    }
                }
            }
        }
    }

    /// Offers `solution` to RefSet1.
    ///
    /// Members it dominates are removed. Returns `false` when a member
    /// dominates it. A member with identical objectives counts as accepted
    /// without inserting a copy. Otherwise the solution goes into RefSet1
    /// when there is room and into the archive when not.
    pub fn ref_set1_test(&mut self, solution: &Solution) -> bool {
        let mut dominated = false;
        let mut i = 0;
        while i < self.ref_set1.len() {
            match dominance(solution, self.ref_set1.get(i)) {
                Ordering::Less => {
                    self.ref_set1.remove(i);
                }
                Ordering::Greater => {
                    dominated = true;
                    i += 1;
                }
                Ordering::Equal => {
                    if objectives_equal(solution, self.ref_set1.get(i)) {
                        return true;
                    }
                    i += 1;
                }
            }
        }

        if dominated {
            return false;
        }

        let mut accepted = solution.clone();
        accepted.unmark();
        if self.ref_set1.len() < self.config.ref_set1_size {
            self.ref_set1.push(accepted);
        } else {
            self.archive.add(accepted);
        }
        true
    }

    /// Offers `solution` to RefSet2 by its distance to both reference sets.
    ///
    /// With room left it is always inserted. Once full, it replaces the
    /// member with the largest distance-to-set if its own distance is
    /// smaller than that member's.
    pub fn ref_set2_test(&mut self, solution: &Solution) -> bool {
        let d = distance_to_set(solution, self.ref_set1.as_slice())
            .min(distance_to_set(solution, self.ref_set2.as_slice()));

        let mut candidate = solution.clone();
        candidate.unmark();
        candidate.distance_to_set = d;

        if self.ref_set2.len() < self.config.ref_set2_size {
            self.ref_set2.push(candidate);
            return true;
        }
        if self.ref_set2.is_empty() {
            return false;
        }

        let worst = farthest(&self.ref_set2);
        if d < self.ref_set2.get(worst).distance_to_set {
            self.ref_set2.remove(worst);
            for member in self.ref_set2.iter_mut() {
                let aux = member.decision_distance(&candidate);
                if aux < member.distance_to_set {
                    member.distance_to_set = aux;
                }
            }
            self.ref_set2.push(candidate);
            true
        } else {
            false
        }
    }

    /// Recombines every pair of RefSet1 and every pair of RefSet2 that is
    /// not made of two marked parents, evaluates the offspring and buffers
    /// those produced within budget. Offspring that fail evaluation are
    /// dropped but still count against the budget. Parents used are
    /// marked. Returns the number of buffered offspring.
    pub fn subset_generation(&mut self) -> Result<usize> {
        self.subset.clear();
        let budget = self.config.max_evaluations;
        let mut offspring = Vec::new();
        let mut kept = Vec::new();

        for set in [&mut self.ref_set1, &mut self.ref_set2] {
            recombine_pairs(
                set,
                self.crossover.as_ref(),
                &mut self.rng,
                &mut self.evaluations,
                budget,
                &mut offspring,
                &mut kept,
            )?;
        }

        let evaluated = evaluate_all(self.problem, &mut offspring, self.config.parallel);
        self.subset = offspring
            .into_iter()
            .zip(kept.into_iter().zip(evaluated))
            .filter_map(|(child, (keep, ok))| (keep && ok).then_some(child))
            .collect();
        Ok(self.subset.len())
    }

    /// Rebuilds the population from RefSet1 (re-improved), the least
    /// crowded half of the archive and fresh diversified solutions, then
    /// clears both reference sets.
    pub fn restart(&mut self) -> Result<()> {
        self.population.clear();
        let elite = std::mem::take(&mut self.ref_set1);
        for member in &elite {
            let mut improved = self.improve(member)?;
            improved.unmark();
            self.population.push(improved);
        }
        self.ref_set2.clear();

        let target = self.config.population_size;
        self.archive.assign_crowding_distance();
        let mut ranked = self.archive.solutions().clone();
        ranked.sort_by(&CrowdingDistanceComparator);
        let insert = (target / 2)
            .min(ranked.len())
            .min(target.saturating_sub(self.population.len()));
        for solution in ranked.iter().take(insert) {
            let mut copy = solution.clone();
            copy.unmark();
            self.population.push(copy);
        }

        let missing = target.saturating_sub(self.population.len());
        self.fill_with_diversified(missing)?;

        self.restarts += 1;
        debug!(
            restart = self.restarts,
            evaluations = self.evaluations,
            archive = self.archive.len(),
            "AbYSS restart"
        );
        Ok(())
    }

    /// Runs the search to the end of the evaluation budget.
    pub fn run(mut self) -> Result<AbyssResult> {
        info!(
            problem = self.problem.name(),
            population_size = self.config.population_size,
            archive_size = self.config.archive_size,
            max_evaluations = self.config.max_evaluations,
            "AbYSS started"
        );

        self.initialize()?;
        let budget = self.config.max_evaluations;

        while self.evaluations < budget {
            let before = self.evaluations;

            self.reference_set_update(true)?;
            let mut produced = self.subset_generation()?;
            while produced > 0 {
                self.reference_set_update(false)?;
                if self.evaluations >= budget {
                    return Ok(self.finish());
                }
                produced = self.subset_generation()?;
            }

            if self.evaluations < budget {
                self.restart()?;
            }

            if self.evaluations == before {
                warn!(
                    evaluations = self.evaluations,
                    "AbYSS iteration spent no evaluations, stopping"
                );
                break;
            }
        }

        Ok(self.finish())
    }

    fn fill_with_diversified(&mut self, count: usize) -> Result<()> {
        let mut fresh = (0..count)
            .map(|_| self.diversification_generation())
            .collect::<Result<Vec<_>>>()?;
        self.evaluations += fresh.len();
        let evaluated = evaluate_all(self.problem, &mut fresh, self.config.parallel);
        retain_marked(&mut fresh, &evaluated);

        for solution in &fresh {
            let mut improved = self.improve(solution)?;
            improved.unmark();
            self.population.push(improved);
        }
        Ok(())
    }

    fn finish(self) -> AbyssResult {
        info!(
            evaluations = self.evaluations,
            restarts = self.restarts,
            archive = self.archive.len(),
            "AbYSS finished"
        );
        AbyssResult {
            archive: self.archive.into_solution_set(),
            evaluations: self.evaluations,
            restarts: self.restarts,
        }
    }
}

/// Index of the member with the largest distance-to-set, the first one
/// on ties and `0` when no distance is positive.
fn farthest(set: &SolutionSet) -> usize {
    let mut index = 0;
    let mut max = 0.0;
    for (i, s) in set.iter().enumerate() {
        if s.distance_to_set > max {
            max = s.distance_to_set;
            index = i;
        }
    }
    index
}

/// Crosses every pair of `set` with at least one unmarked parent until
/// the budget is spent. `kept[k]` records whether `offspring[k]` was
/// produced within budget.
fn recombine_pairs(
    set: &mut SolutionSet,
    crossover: &dyn Crossover,
    rng: &mut dyn RngCore,
    evaluations: &mut usize,
    budget: usize,
    offspring: &mut Vec<Solution>,
    kept: &mut Vec<bool>,
) -> Result<()> {
    let members = set.as_mut_slice();
    for i in 0..members.len() {
        for j in (i + 1)..members.len() {
            if *evaluations >= budget {
                return Ok(());
            }
            if members[i].marked && members[j].marked {
                continue;
            }

            let children = crossover.execute(&members[i], &members[j], rng)?;
            *evaluations += 2;
            let keep = *evaluations < budget;
            for child in children {
                offspring.push(child);
                kept.push(keep);
            }
            members[i].marked = true;
            members[j].marked = true;
        }
    }
    Ok(())
}
