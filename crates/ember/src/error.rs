//! The facade's error type.

use std::error::Error;
use std::fmt;

use ember_core::{ConstructionError, ProfileError};
use ember_diag::DiagnosticsError;
use ember_init::ConfigError;
use ember_mesh::MeshError;

/// Any failure of a run. Every variant is terminal.
#[derive(Debug)]
pub enum RunError {
    /// Startup configuration was rejected.
    Config(ConfigError),
    /// A stellar model could not be built.
    Profile(ProfileError),
    /// The mesh could not be built.
    Mesh(MeshError),
    /// A cell could not be constructed.
    Construction(ConstructionError),
    /// Diagnostics failed.
    Diagnostics(DiagnosticsError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Profile(e) => write!(f, "profile: {e}"),
            Self::Mesh(e) => write!(f, "mesh: {e}"),
            Self::Construction(e) => write!(f, "construction: {e}"),
            Self::Diagnostics(e) => write!(f, "diagnostics: {e}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Profile(e) => Some(e),
            Self::Mesh(e) => Some(e),
            Self::Construction(e) => Some(e),
            Self::Diagnostics(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ProfileError> for RunError {
    fn from(e: ProfileError) -> Self {
        Self::Profile(e)
    }
}

impl From<MeshError> for RunError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}

impl From<ConstructionError> for RunError {
    fn from(e: ConstructionError) -> Self {
        Self::Construction(e)
    }
}

impl From<DiagnosticsError> for RunError {
    fn from(e: DiagnosticsError) -> Self {
        Self::Diagnostics(e)
    }
}
