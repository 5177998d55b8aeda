//! Front quality indicators and the hypervolume engine.
//!
//! # Key Types
//!
//! - [`Point`] / [`Front`]: objective vectors and lists of them
//! - [`WfgHypervolume`]: exact n-dimensional hypervolume (WFG slicing)
//! - [`FastHypervolume`]: hypervolume of solution sets with a derived
//!   reference point, plus per-solution contributions
//! - [`QualityIndicator`]: normalized HV, GD, IGD, spread and ε against a
//!   known Pareto front
//!
//! # Submodules
//!
//! - [`metrics`]: the raw, unnormalized distance metrics

mod front;
mod hypervolume;
pub mod metrics;
mod quality;
mod wfg;

pub use front::{max_values, min_values, normalize, parse_front, read_front, Front, Point};
pub use hypervolume::{FastHypervolume, DEFAULT_OFFSET};
pub use quality::QualityIndicator;
pub use wfg::WfgHypervolume;
