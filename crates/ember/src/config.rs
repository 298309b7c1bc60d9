//! Run-wide configuration.

use ember_diag::DiagnosticsConfig;
use ember_init::ProblemConfig;

use crate::error::RunError;

/// Everything a run reads at startup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunConfig {
    /// Initial-state parameters.
    pub problem: ProblemConfig,
    /// Diagnostics parameters.
    pub diagnostics: DiagnosticsConfig,
}

impl RunConfig {
    /// Validate both halves, problem first.
    pub fn validate(&self) -> Result<(), RunError> {
        self.problem.validate()?;
        self.diagnostics.validate()?;
        Ok(())
    }
}
