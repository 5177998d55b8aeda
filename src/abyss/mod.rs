//! Archive-Based hYbrid Scatter Search (AbYSS).
//!
//! A small population is split into two reference sets: RefSet1 keeps the
//! fittest solutions (SPEA2 fitness) and RefSet2 the most spread out ones
//! in decision space. Pairs from each set are recombined, improved by a
//! local search and offered back to the reference sets. Solutions that
//! cannot stay in a full RefSet1 go to a bounded crowding archive, which
//! is the result of the run. When the reference sets stop producing
//! offspring the population is rebuilt and the search restarts.
//!
//! # References
//!
//! - Nebro et al. (2008), "AbYSS: Adapting Scatter Search to Multiobjective
//!   Optimization"
//! - Zitzler, Laumanns & Thiele (2001), "SPEA2: Improving the Strength
//!   Pareto Evolutionary Algorithm"

mod config;
mod runner;

pub use config::AbyssConfig;
pub use runner::{AbyssResult, AbyssRunner, ScatterSearch};
