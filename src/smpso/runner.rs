//! SMPSO swarm loop execution.
//!
//! [`SmpsoRunner`] drives the swarm:
//! seed → evaluate → (velocity → position → turbulence → evaluate →
//! leaders → personal bests → crowding) × iterations.

use super::config::SmpsoConfig;
use crate::archive::{Archive, CrowdingArchive};
use crate::core::{dominance, Problem, Solution, SolutionSet};
use crate::diversification::{DiversificationGenerator, DEFAULT_SUBRANGES};
use crate::error::{MoeaError, Result};
use crate::operators::{create_mutation, Mutation};
use crate::parallel::{evaluate_all, retain_marked};
use crate::random::{self, rng_from_seed};
use rand::{Rng, RngCore};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

/// Every particle whose index is a multiple of this gets turbulence.
const TURBULENCE_PERIOD: usize = 6;

/// Result of an SMPSO run.
#[derive(Debug, Clone)]
pub struct SmpsoResult {
    /// The final leaders archive: a bounded, mutually non-dominated set.
    pub leaders: SolutionSet,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Number of problem evaluations spent.
    pub evaluations: usize,

    /// Leaders archive size after each iteration.
    pub archive_size_history: Vec<usize>,
}

/// Executes SMPSO (Nebro et al., 2009).
///
/// # Usage
///
/// ```ignore
/// let config = SmpsoConfig::default().with_seed(42);
/// let result = SmpsoRunner::run(&problem, &config)?;
/// println!("{} leaders", result.leaders.len());
/// ```
pub struct SmpsoRunner;

impl SmpsoRunner {
    /// Runs SMPSO on `problem`.
    ///
    /// # Errors
    /// - [`MoeaError::InvalidConfig`] if `config` fails validation
    /// - [`MoeaError::UnsupportedEncoding`] if the problem is not real-coded
    /// - any error raised by the mutation factory or the turbulence step
    ///
    /// A particle whose evaluation fails or panics is dropped together with
    /// its memory and velocity; the run goes on with a smaller swarm.
    pub fn run(problem: &dyn Problem, config: &SmpsoConfig) -> Result<SmpsoResult> {
        config.validate().map_err(MoeaError::InvalidConfig)?;

        let mut rng = rng_from_seed(config.seed);
        let n = problem.number_of_variables().max(1);
        let mutation_params = config
            .mutation
            .parameters
            .clone()
            .with_default("probability", 1.0 / n as f64);
        let mutation = create_mutation(&config.mutation.name, &mutation_params)?;

        info!(
            problem = problem.name(),
            swarm_size = config.swarm_size,
            archive_size = config.archive_size,
            max_iterations = config.max_iterations,
            "SMPSO started"
        );

        // 1. Seed and evaluate the swarm
        let mut generator = DiversificationGenerator::new(n, DEFAULT_SUBRANGES);
        let mut particles = (0..config.swarm_size)
            .map(|_| generator.generate(problem, &mut rng))
            .collect::<Result<Vec<_>>>()?;
        let mut evaluations = particles.len();
        let evaluated = evaluate_all(problem, &mut particles, config.parallel);
        retain_marked(&mut particles, &evaluated);

        // 2. Leaders, memory and zero velocities
        let mut leaders = CrowdingArchive::new(config.archive_size);
        for particle in &particles {
            leaders.add(particle.clone());
        }
        leaders.assign_crowding_distance();
        let mut swarm = Swarm::new(problem, particles);

        let mut archive_size_history = Vec::with_capacity(config.max_iterations);
        let mut iterations = 0;

        // 3. Flight
        for iteration in 0..config.max_iterations {
            if swarm.particles.is_empty() {
                warn!(iteration, "every particle was dropped, flight stopped");
                break;
            }
            swarm.compute_speed(leaders.solutions(), config, &mut rng);
            swarm.compute_new_positions(config);
            swarm.turbulence(mutation.as_ref(), &mut rng)?;

            evaluations += swarm.particles.len();
            let evaluated = evaluate_all(problem, &mut swarm.particles, config.parallel);
            swarm.retain(&evaluated);

            for particle in &swarm.particles {
                leaders.add(particle.clone());
            }
            swarm.update_memory();
            leaders.assign_crowding_distance();

            archive_size_history.push(leaders.len());
            iterations += 1;
            debug!(
                iteration,
                swarm = swarm.particles.len(),
                leaders = leaders.len(),
                "SMPSO iteration"
            );
        }

        info!(
            iterations,
            evaluations,
            leaders = leaders.len(),
            "SMPSO finished"
        );

        Ok(SmpsoResult {
            leaders: leaders.into_solution_set(),
            iterations,
            evaluations,
            archive_size_history,
        })
    }
}

/// Clerc's constriction coefficient for `c1 + c2`.
///
/// `2 / |2 − ρ − √(ρ² − 4ρ)|` with `ρ = c1 + c2`, or 1 when `ρ ≤ 4`.
pub fn constriction_coefficient(c1: f64, c2: f64) -> f64 {
    let rho = c1 + c2;
    if rho <= 4.0 {
        1.0
    } else {
        2.0 / (2.0 - rho - (rho * rho - 4.0 * rho).sqrt()).abs()
    }
}

/// Positions, personal bests and velocities of the swarm.
struct Swarm {
    particles: Vec<Solution>,
    best: Vec<Solution>,
    speed: Vec<Vec<f64>>,
    delta_max: Vec<f64>,
}

impl Swarm {
    fn new(problem: &dyn Problem, particles: Vec<Solution>) -> Self {
        let dims = problem.number_of_variables();
        let delta_max = (0..dims)
            .map(|j| (problem.upper_limit(j) - problem.lower_limit(j)) / 2.0)
            .collect();
        Self {
            best: particles.clone(),
            speed: vec![vec![0.0; dims]; particles.len()],
            particles,
            delta_max,
        }
    }

    fn compute_speed(&mut self, leaders: &SolutionSet, config: &SmpsoConfig, rng: &mut dyn RngCore) {
        for i in 0..self.particles.len() {
            let global = select_leader(leaders, rng)
                .map_or_else(|| self.best[i].decision_vector(), Solution::decision_vector);

            let r1 = random::uniform(rng, config.r1.0, config.r1.1);
            let r2 = random::uniform(rng, config.r2.0, config.r2.1);
            let c1 = random::uniform(rng, config.c1.0, config.c1.1);
            let c2 = random::uniform(rng, config.c2.0, config.c2.1);
            let w = random::uniform(rng, config.w.0, config.w.1);
            let chi = constriction_coefficient(c1, c2);

            let particle = &self.particles[i];
            let memory = &self.best[i];
            for (j, v) in self.speed[i].iter_mut().enumerate() {
                let x = particle.real_value(j);
                let raw = chi
                    * (w * *v
                        + c1 * r1 * (memory.real_value(j) - x)
                        + c2 * r2 * (global[j] - x));
                *v = raw.max(-self.delta_max[j]).min(self.delta_max[j]);
            }
        }
    }

    fn compute_new_positions(&mut self, config: &SmpsoConfig) {
        for (particle, speed) in self.particles.iter_mut().zip(self.speed.iter_mut()) {
            for (j, v) in speed.iter_mut().enumerate() {
                let (lower, upper) = (particle.real_lower(j), particle.real_upper(j));
                let mut x = particle.real_value(j) + *v;
                if x < lower {
                    x = lower;
                    *v *= config.ch_vel1;
                }
                if x > upper {
                    x = upper;
                    *v *= config.ch_vel2;
                }
                particle.set_real_value(j, x);
            }
        }
    }

    fn turbulence(&mut self, mutation: &dyn Mutation, rng: &mut dyn RngCore) -> Result<()> {
        for particle in self.particles.iter_mut().step_by(TURBULENCE_PERIOD) {
            mutation.execute(particle, rng)?;
        }
        Ok(())
    }

    /// Drops the particles not marked in `keep`, with their memory and
    /// velocity.
    fn retain(&mut self, keep: &[bool]) {
        retain_marked(&mut self.particles, keep);
        retain_marked(&mut self.best, keep);
        retain_marked(&mut self.speed, keep);
    }

    /// A particle replaces its memory unless the memory dominates it.
    fn update_memory(&mut self) {
        for (particle, memory) in self.particles.iter().zip(self.best.iter_mut()) {
            if dominance(particle, memory) != Ordering::Greater {
                *memory = particle.clone();
            }
        }
    }
}

/// Binary tournament on crowding distance between two random leaders.
fn select_leader<'a>(leaders: &'a SolutionSet, rng: &mut dyn RngCore) -> Option<&'a Solution> {
    if leaders.is_empty() {
        return None;
    }
    let one = &leaders[random::index(rng, leaders.len())];
    let two = &leaders[random::index(rng, leaders.len())];
    Some(match one.crowding_distance.total_cmp(&two.crowding_distance) {
        Ordering::Greater => one,
        Ordering::Less => two,
        Ordering::Equal => {
            if rng.random_bool(0.5) {
                one
            } else {
                two
            }
        }
    })
}
