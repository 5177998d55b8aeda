//! Speed-constrained Multi-objective Particle Swarm Optimization (SMPSO).
//!
//! A swarm of particles flies through the real-valued decision space.
//! Each particle is pulled towards its own best position and towards a
//! leader drawn from a bounded crowding archive of non-dominated
//! solutions. Velocities are scaled by Clerc's constriction coefficient
//! and clamped to half of each variable's range, which keeps the swarm
//! from oscillating out of the box. Every sixth particle is perturbed by
//! a mutation operator (turbulence).
//!
//! # References
//!
//! - Nebro et al. (2009), "SMPSO: A New PSO-based Metaheuristic for
//!   Multi-objective Optimization"
//! - Clerc & Kennedy (2002), "The Particle Swarm: Explosion, Stability, and
//!   Convergence in a Multidimensional Complex Space"

mod config;
mod runner;

pub use config::SmpsoConfig;
pub use runner::{constriction_coefficient, SmpsoResult, SmpsoRunner};
