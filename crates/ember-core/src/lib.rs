//! Core types and traits for the Ember simulation core.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Ember workspace:
//! identifiers, the conserved cell state, the species network, the
//! stellar profile, error types, and the traits through which external
//! physics collaborators (profile interpolation, equation of state,
//! NSE tables) are consumed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod id;
pub mod network;
pub mod profile;
pub mod state;
pub mod traits;

pub use error::{ClosureError, ConstructionError};
pub use field::{DerivedField, UnknownField};
pub use id::{LevelId, Rank};
pub use network::{AuxComposition, Network, Species};
pub use profile::{LinearProfile, ProfileError, ProfilePoint, ProfileSample, StellarProfile};
pub use state::{AuxIndex, CellState, SpeciesVec, NUM_AUX};
pub use traits::{EosState, NseResult, NseTable, ProfileInterpolator, ThermodynamicClosure};
