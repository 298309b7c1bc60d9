//! Block-structured mesh data for Ember.
//!
//! The AMR engine proper (regridding, ghost-cell exchange, load
//! balancing) lives outside this workspace. This crate holds just enough
//! of the hierarchy for state construction and diagnostics to operate on:
//!
//! - [`Geometry`]: physical domain, coarse resolution, coordinate system
//! - [`GridBox`]: inclusive index boxes with refine/coarsen/chop
//! - [`Patch`]: one box of cell states owned by one rank
//! - [`Level`] and [`Hierarchy`]: levels in increasing refinement order,
//!   with covered-cell masking between consecutive levels

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod grid_box;
pub mod hierarchy;
pub mod level;
pub mod patch;

pub use error::MeshError;
pub use geometry::{CoordSystem, Geometry};
pub use grid_box::GridBox;
pub use hierarchy::Hierarchy;
pub use level::{Level, LevelFrame};
pub use patch::Patch;
