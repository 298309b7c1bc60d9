//! Physics-consistent initial-state construction.
//!
//! Maps a 1-D stellar profile plus a synthetic velocity perturbation into
//! a thermodynamically self-consistent conserved state on every cell of
//! a level hierarchy.
//!
//! # Startup order
//!
//! 1. [`Problem::initialize`] validates [`ProblemConfig`] (including the
//!    fatal vortex-capacity check), computes the problem centre, builds
//!    the [`PerturbationField`], and selects a [`CompositionResolver`].
//! 2. [`Problem::constructor`] binds the profile interpolator and the
//!    equation of state into a [`StateConstructor`].
//! 3. [`StateConstructor::fill_hierarchy`] builds every cell in parallel.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod composition;
pub mod config;
pub mod constructor;
pub mod perturbation;
pub mod problem;

pub use composition::{
    select_strategy, CompositionBranch, CompositionResolver, ExplicitComposition, NseComposition,
    ResolvedComposition,
};
pub use config::{ConfigError, ProblemConfig, MAX_NUM_VORTICES};
pub use constructor::StateConstructor;
pub use perturbation::{Perturbation, PerturbationField, PerturbationMode, MODE_COUNT};
pub use problem::{dump_profile, Problem, ProblemParams};
