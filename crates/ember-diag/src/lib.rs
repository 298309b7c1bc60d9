//! Hierarchical integrated-quantity diagnostics.
//!
//! Each step the diagnostics sum conserved quantities and flame
//! properties over every level, reduce them across ranks, and report
//! the result from the I/O rank:
//!
//! 1. [`level_sums`] integrates one level over the patches a rank owns,
//!    skipping cells covered by a finer level.
//! 2. [`GlobalReducer`] combines the per-rank [`LevelSums`] through a
//!    [`ProcessGroup`].
//! 3. [`IntegratedQuantities::derive`] turns the totals into the
//!    reported scalars.
//! 4. [`DiagnosticsReporter`] writes console lines and the data log
//!    through [`LogSink`]s.
//!
//! [`Diagnostics::sum_integrated_quantities`] runs the whole pipeline.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod aggregate;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod quantities;
pub mod reduce;
pub mod report;
pub mod sink;

pub use aggregate::{
    flame_speed_properties, flame_width_properties, level_sums, loc_wgt_sum, vol_wgt_sum,
    LevelSums,
};
pub use config::{DiagnosticsConfig, DEFAULT_DATA_LOG};
pub use diagnostics::Diagnostics;
pub use error::{DiagnosticsError, ReduceError};
pub use quantities::IntegratedQuantities;
pub use reduce::{GlobalReducer, ProcessGroup, SingleProcess, ThreadGroup};
pub use report::DiagnosticsReporter;
pub use sink::{FileSink, LogSink, MemorySink, StdoutSink};
