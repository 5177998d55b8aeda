//! Multi-objective evolutionary optimization engine.
//!
//! Provides two Pareto-based metaheuristics over a shared solution model:
//!
//! - **SMPSO**: Speed-constrained multi-objective particle swarm with a
//!   bounded crowding archive of leaders.
//! - **AbYSS**: Archive-based hybrid scatter search with two reference
//!   sets, local-search improvement and population restarts.
//!
//! Around them sit the building blocks they are composed of:
//!
//! - **Solution model**: typed decision variables, solutions, bounded
//!   solution sets and the host-supplied [`Problem`](core::Problem).
//! - **Comparators and density**: Pareto dominance, crowding distance and
//!   SPEA2 fitness.
//! - **Archives**: bounded non-dominated archives pruned by crowding
//!   distance, adaptive-grid density or hypervolume contribution.
//! - **Operators**: crossover, mutation, selection and local search built
//!   by name from a [`Parameters`](operators::Parameters) bag.
//! - **Indicators**: WFG hypervolume, GD, IGD, spread and additive ε.
//! - **Parallelism**: rayon-backed batch evaluation and concurrent runs of
//!   independent algorithms.
//!
//! # Architecture
//!
//! All objectives are minimized. The algorithms are synchronous loops;
//! only the evaluation step runs concurrently, and populations and
//! archives are updated after it has joined. Every run is reproducible
//! from its `seed`.

pub mod abyss;
pub mod algorithm;
pub mod archive;
pub mod core;
pub mod density;
pub mod diversification;
pub mod error;
pub mod indicators;
pub mod operators;
pub mod parallel;
pub mod random;
pub mod smpso;

pub use error::{MoeaError, Result};
