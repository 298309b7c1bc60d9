//! The per-step diagnostics driver.

use ember_mesh::Hierarchy;
use log::{debug, info, warn};

use crate::aggregate::{level_sums, LevelSums};
use crate::config::DiagnosticsConfig;
use crate::error::DiagnosticsError;
use crate::quantities::IntegratedQuantities;
use crate::reduce::{GlobalReducer, ProcessGroup};
use crate::report::DiagnosticsReporter;
use crate::sink::{FileSink, LogSink, StdoutSink};

/// Computes, reduces, and reports integrated quantities.
///
/// Every rank owns a `Diagnostics`; only the I/O rank carries a
/// [`DiagnosticsReporter`].
pub struct Diagnostics {
    config: DiagnosticsConfig,
    reporter: Option<DiagnosticsReporter>,
}

impl Diagnostics {
    /// A driver with `config`. Pass a reporter on the I/O rank only.
    pub fn new(
        config: DiagnosticsConfig,
        reporter: Option<DiagnosticsReporter>,
    ) -> Result<Self, DiagnosticsError> {
        config.validate()?;
        Ok(Self { config, reporter })
    }

    /// A driver for `group`'s rank with the standard sinks.
    ///
    /// The I/O rank reports to standard output and, when `sum_interval`
    /// is positive, appends to the data log at `data_log_path`. Other
    /// ranks get no reporter.
    pub fn open(
        config: DiagnosticsConfig,
        group: &dyn ProcessGroup,
    ) -> Result<Self, DiagnosticsError> {
        config.validate()?;
        let reporter = if group.is_io_rank() {
            let data_log = if config.writes_data_log() {
                let sink = FileSink::open_append(&config.data_log_path)?;
                info!("appending diagnostics to {}", sink.path().display());
                Some(Box::new(sink) as Box<dyn LogSink>)
            } else {
                None
            };
            Some(DiagnosticsReporter::new(Box::new(StdoutSink), data_log))
        } else {
            None
        };
        Self::new(config, reporter)
    }

    /// Whether this rank writes reports.
    pub fn is_reporting(&self) -> bool {
        self.reporter.is_some()
    }

    /// The active configuration.
    pub fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }

    /// This rank's partial sums over every level of `hierarchy`,
    /// coarsest first. The fuel consumption integral comes from level 0
    /// only, since finer levels advance with different time steps.
    pub fn local_sums(hierarchy: &Hierarchy, group: &dyn ProcessGroup) -> LevelSums {
        let rank = group.rank();
        hierarchy
            .levels()
            .iter()
            .fold(LevelSums::identity(), |acc, level| {
                let s = level_sums(level, rank, level.id().is_coarsest());
                debug!(
                    "rank {rank} level {}: mass = {:e}, {} cells",
                    level.id(),
                    s.mass,
                    s.cells
                );
                acc.combine(s)
            })
    }

    /// Compute and report the integrated quantities at the hierarchy's
    /// current time.
    ///
    /// Returns `Ok(None)` without entering any collective when `verbose`
    /// is not positive; every rank sees the same configuration, so all
    /// skip together. Otherwise every rank must call this. The I/O rank
    /// gets `Some(quantities)` and writes the report; other ranks get
    /// `None`.
    pub fn sum_integrated_quantities(
        &mut self,
        hierarchy: &Hierarchy,
        group: &dyn ProcessGroup,
    ) -> Result<Option<IntegratedQuantities>, DiagnosticsError> {
        if self.config.verbose <= 0 {
            return Ok(None);
        }
        let local = Self::local_sums(hierarchy, group);
        let Some(global) = GlobalReducer::new(group).reduce(&local)? else {
            return Ok(None);
        };

        if !(global.grad_t_max > 0.0) {
            warn!(
                "temperature gradient vanishes at t = {}; reporting zero flame width",
                hierarchy.time()
            );
        }
        let q = IntegratedQuantities::derive(
            &global,
            hierarchy.time(),
            self.config.rho_fuel_initial,
        )?;
        if let Some(reporter) = self.reporter.as_mut() {
            reporter.report(&q)?;
        }
        Ok(Some(q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::SingleProcess;
    use crate::sink::MemorySink;
    use ember_core::Rank;
    use ember_mesh::{CoordSystem, Geometry, GridBox, Patch};

    fn single_cell(rho: f64) -> Hierarchy {
        let g = Geometry::new([0.0; 3], [1.0; 3], [1, 1, 1], CoordSystem::Cartesian).unwrap();
        let mut h = Hierarchy::new(g);
        let mut p = Patch::new(GridBox::new([0; 3], [0; 3]).unwrap(), Rank(0), 1);
        let c = &mut p.cells_mut()[0];
        c.rho = rho;
        c.momentum = [rho, 0.0, 0.0];
        c.rho_eint = 3.0;
        c.rho_etot = 3.0 + 0.5 * rho;
        c.temperature = 1.0e9;
        h.push_level(1, vec![p]).unwrap();
        h
    }

    #[test]
    fn quiet_mode_skips_everything() {
        let console = MemorySink::new();
        let cfg = DiagnosticsConfig {
            verbose: 0,
            ..DiagnosticsConfig::default()
        };
        let reporter = DiagnosticsReporter::new(Box::new(console.clone()), None);
        let mut d = Diagnostics::new(cfg, Some(reporter)).unwrap();
        assert!(d
            .sum_integrated_quantities(&single_cell(1.0), &SingleProcess)
            .unwrap()
            .is_none());
        assert!(console.contents().is_empty());
    }

    #[test]
    fn single_cell_quantities() {
        let mut d = Diagnostics::new(DiagnosticsConfig::default(), None).unwrap();
        let q = d
            .sum_integrated_quantities(&single_cell(2.0), &SingleProcess)
            .unwrap()
            .unwrap();
        assert_eq!(q.mass, 2.0);
        assert_eq!(q.momentum, [2.0, 0.0, 0.0]);
        assert_eq!(q.rho_k, 1.0);
        assert_eq!(q.center_of_mass, [0.5; 3]);
        assert_eq!(q.center_of_mass_velocity, [1.0, 0.0, 0.0]);
        assert_eq!(q.flame_width, 0.0);
    }

    #[test]
    fn zero_mass_propagates() {
        let mut d = Diagnostics::new(DiagnosticsConfig::default(), None).unwrap();
        assert!(matches!(
            d.sum_integrated_quantities(&single_cell(0.0), &SingleProcess),
            Err(DiagnosticsError::ZeroMass { .. })
        ));
    }

    #[test]
    fn open_without_interval_keeps_console_only() {
        let d = Diagnostics::open(DiagnosticsConfig::default(), &SingleProcess).unwrap();
        assert!(d.is_reporting());
        assert_eq!(d.config().sum_interval, 0);
    }

    #[test]
    fn invalid_config_rejected_up_front() {
        let cfg = DiagnosticsConfig {
            sum_per: -1.0,
            ..DiagnosticsConfig::default()
        };
        assert!(Diagnostics::new(cfg, None).is_err());
    }
}
