//! Error types shared across the Ember workspace.
//!
//! Organized by origin: failures reported by external physics
//! collaborators ([`ClosureError`]) and failures raised while building a
//! cell's conserved state ([`ConstructionError`]).

use std::error::Error;
use std::fmt;

/// A failure reported by an external physics collaborator.
///
/// Profile interpolators, equations of state, and NSE tables are opaque
/// to this core. Their failures are carried through unchanged and never
/// retried.
#[derive(Clone, Debug, PartialEq)]
pub enum ClosureError {
    /// The profile interpolator could not produce a sample.
    Profile {
        /// Radius at which sampling was requested.
        radius: f64,
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The equation of state failed to converge or rejected its input.
    Eos {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The NSE table lookup failed.
    Nse {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for ClosureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile { radius, reason } => {
                write!(f, "profile lookup at r = {radius} failed: {reason}")
            }
            Self::Eos { reason } => write!(f, "equation of state failed: {reason}"),
            Self::Nse { reason } => write!(f, "NSE table failed: {reason}"),
        }
    }
}

impl Error for ClosureError {}

/// Errors from building the conserved state of a single cell.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstructionError {
    /// The species mass fractions summed to zero or a non-finite value,
    /// so they cannot be renormalised.
    DegenerateComposition {
        /// The offending sum.
        sum: f64,
        /// Distance from the problem centre of the failing cell.
        radius: f64,
    },
    /// The composition vector does not match the species network.
    SpeciesCountMismatch {
        /// Species count of the network.
        expected: usize,
        /// Species count delivered by the collaborator.
        actual: usize,
    },
    /// The equation of state returned a non-finite specific energy.
    NonFiniteEnergy {
        /// The returned specific internal energy.
        energy: f64,
        /// Distance from the problem centre of the failing cell.
        radius: f64,
    },
    /// An external collaborator failed.
    Closure(ClosureError),
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateComposition { sum, radius } => write!(
                f,
                "species mass fractions sum to {sum} at r = {radius}, cannot renormalise"
            ),
            Self::SpeciesCountMismatch { expected, actual } => {
                write!(f, "expected {expected} species, got {actual}")
            }
            Self::NonFiniteEnergy { energy, radius } => {
                write!(f, "non-finite specific energy {energy} at r = {radius}")
            }
            Self::Closure(e) => write!(f, "{e}"),
        }
    }
}

impl Error for ConstructionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Closure(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ClosureError> for ConstructionError {
    fn from(e: ClosureError) -> Self {
        Self::Closure(e)
    }
}
