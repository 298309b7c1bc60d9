//! Ember: initial-state construction and hierarchical diagnostics for
//! stellar explosion simulations.
//!
//! This is the top-level facade crate. It re-exports the public API of
//! the Ember sub-crates and adds [`Simulation`], which runs problem
//! startup, fills a level hierarchy from a 1-D stellar model, and
//! reports integrated quantities after each step.
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ember-core` | IDs, cell state, networks, profiles, collaborator traits |
//! | [`mesh`] | `ember-mesh` | Geometry, boxes, patches, levels, hierarchy |
//! | [`init`] | `ember-init` | Problem startup, perturbation, composition, construction |
//! | [`diag`] | `ember-diag` | Level sums, reduction, reporting |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`ember-core`).
pub use ember_core as types;

/// Mesh hierarchy (`ember-mesh`).
pub use ember_mesh as mesh;

/// Initial-state construction (`ember-init`).
pub use ember_init as init;

/// Integrated-quantity diagnostics (`ember-diag`).
pub use ember_diag as diag;

pub mod config;
pub mod error;
pub mod simulation;

pub use config::RunConfig;
pub use error::RunError;
pub use simulation::{Collaborators, Simulation};

/// Common imports for typical Ember usage.
pub mod prelude {
    pub use crate::{Collaborators, RunConfig, RunError, Simulation};

    pub use ember_core::{
        CellState, LinearProfile, Network, NseTable, ProfileInterpolator, Species,
        StellarProfile, ThermodynamicClosure,
    };
    pub use ember_diag::{
        DiagnosticsConfig, IntegratedQuantities, ProcessGroup, SingleProcess, ThreadGroup,
    };
    pub use ember_init::ProblemConfig;
    pub use ember_mesh::{CoordSystem, Geometry, GridBox, Hierarchy};
}
