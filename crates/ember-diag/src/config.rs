//! Diagnostics configuration and scheduling.

use std::path::PathBuf;

use crate::error::DiagnosticsError;

/// Default data-log file name.
pub const DEFAULT_DATA_LOG: &str = "problem_diag.out";

/// Runtime parameters of the integrated-quantity diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagnosticsConfig {
    /// Diagnostics run only when positive. Default: 1.
    pub verbose: i32,
    /// Sum every this many coarse steps; 0 disables. Default: 0.
    pub sum_interval: u64,
    /// Sum whenever a multiple of this time is crossed; 0 disables.
    /// Default: 0.
    pub sum_per: f64,
    /// Data-log path, opened in append mode on the I/O rank.
    pub data_log_path: PathBuf,
    /// Fuel density used to normalise the flame speed. Default: 1.0.
    pub rho_fuel_initial: f64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            verbose: 1,
            sum_interval: 0,
            sum_per: 0.0,
            data_log_path: PathBuf::from(DEFAULT_DATA_LOG),
            rho_fuel_initial: 1.0,
        }
    }
}

impl DiagnosticsConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), DiagnosticsError> {
        if !self.sum_per.is_finite() || self.sum_per < 0.0 {
            return Err(DiagnosticsError::InvalidConfig {
                reason: format!("sum_per must be finite and non-negative, got {}", self.sum_per),
            });
        }
        if !self.rho_fuel_initial.is_finite() || self.rho_fuel_initial <= 0.0 {
            return Err(DiagnosticsError::InvalidConfig {
                reason: format!(
                    "rho_fuel_initial must be finite and positive, got {}",
                    self.rho_fuel_initial
                ),
            });
        }
        Ok(())
    }

    /// Whether a data log is kept at all.
    pub fn writes_data_log(&self) -> bool {
        self.sum_interval > 0
    }

    /// Whether the step that advanced `prev_time` to `time` is a
    /// diagnostics step.
    ///
    /// True when `step` is a multiple of `sum_interval`, or when the
    /// step crossed a multiple of `sum_per`.
    pub fn should_sum(&self, step: u64, prev_time: f64, time: f64) -> bool {
        if self.sum_interval > 0 && step % self.sum_interval == 0 {
            return true;
        }
        if self.sum_per > 0.0 {
            let before = (prev_time / self.sum_per).floor();
            let after = (time / self.sum_per).floor();
            return before != after;
        }
        false
    }
}
