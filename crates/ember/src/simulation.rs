//! Startup, initial-state construction, and per-step diagnostics wired
//! together for one rank.

use std::fmt;
use std::sync::Arc;

use ember_core::{Network, NseTable, ProfileInterpolator, ThermodynamicClosure};
use ember_diag::{Diagnostics, IntegratedQuantities, ProcessGroup};
use ember_init::{dump_profile, Problem};
use ember_mesh::Hierarchy;
use log::info;

use crate::config::RunConfig;
use crate::error::RunError;

/// The external physics a run consumes.
pub struct Collaborators {
    /// Species network.
    pub network: Network,
    /// 1-D stellar model lookup.
    pub profile: Arc<dyn ProfileInterpolator>,
    /// Equation of state.
    pub eos: Arc<dyn ThermodynamicClosure>,
    /// NSE table; selects the NSE composition strategy when present.
    pub nse: Option<Arc<dyn NseTable>>,
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("network", &self.network)
            .field("nse", &self.nse.is_some())
            .finish_non_exhaustive()
    }
}

/// One rank's view of a run.
///
/// The time integrator is external: it advances the hierarchy through
/// [`hierarchy_mut`](Self::hierarchy_mut) and calls
/// [`post_step`](Self::post_step) after every coarse step.
pub struct Simulation<G: ProcessGroup> {
    problem: Problem,
    hierarchy: Hierarchy,
    diagnostics: Diagnostics,
    group: G,
}

impl<G: ProcessGroup> Simulation<G> {
    /// Start a run on `hierarchy`.
    ///
    /// Configuration is checked before any file is opened or any cell is
    /// built. The I/O rank then dumps the tabulated model at debug level
    /// and opens the data log (when `sum_interval` is positive). Every
    /// cell is constructed and covered masks are recomputed.
    pub fn initialize(
        config: &RunConfig,
        mut hierarchy: Hierarchy,
        collaborators: Collaborators,
        group: G,
    ) -> Result<Self, RunError> {
        config.validate()?;
        let problem = Problem::initialize(
            &config.problem,
            hierarchy.geometry(),
            collaborators.network,
            collaborators.nse,
        )?;
        if group.is_io_rank() {
            if let Some(model) = collaborators.profile.model() {
                dump_profile(model);
            }
        }
        let constructor = problem.constructor(collaborators.profile, collaborators.eos)?;
        let diagnostics = Diagnostics::open(config.diagnostics.clone(), &group)?;

        constructor.fill_hierarchy(&mut hierarchy)?;
        hierarchy.mark_covered();
        info!(
            "rank {}/{}: initialized {} levels",
            group.rank(),
            group.size(),
            hierarchy.levels().len()
        );

        Ok(Self {
            problem,
            hierarchy,
            diagnostics,
            group,
        })
    }

    /// The started problem.
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// The level hierarchy.
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Mutable hierarchy, for the time integrator.
    pub fn hierarchy_mut(&mut self) -> &mut Hierarchy {
        &mut self.hierarchy
    }

    /// The process group this rank belongs to.
    pub fn group(&self) -> &G {
        &self.group
    }

    /// The diagnostics driver.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Compute and report integrated quantities now. Every rank must
    /// call this together.
    pub fn sum_integrated_quantities(
        &mut self,
    ) -> Result<Option<IntegratedQuantities>, RunError> {
        Ok(self
            .diagnostics
            .sum_integrated_quantities(&self.hierarchy, &self.group)?)
    }

    /// Record that coarse step `step` advanced the clock from
    /// `prev_time` to `time`, and run diagnostics if the schedule says
    /// so.
    pub fn post_step(
        &mut self,
        step: u64,
        prev_time: f64,
        time: f64,
    ) -> Result<Option<IntegratedQuantities>, RunError> {
        self.hierarchy.set_time(time);
        if !self.diagnostics.config().should_sum(step, prev_time, time) {
            return Ok(None);
        }
        self.sum_integrated_quantities()
    }
}

impl<G: ProcessGroup> fmt::Debug for Simulation<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("problem", &self.problem)
            .field("rank", &self.group.rank())
            .field("time", &self.hierarchy.time())
            .finish_non_exhaustive()
    }
}
