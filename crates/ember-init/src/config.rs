//! Problem configuration, validation, and error types.
//!
//! [`ProblemConfig`] is read once at startup. [`validate()`](ProblemConfig::validate)
//! checks every field before any cell state is touched; a failure here
//! is fatal for the run.

use std::error::Error;
use std::fmt;

/// Compile-time capacity for velocity-perturbation seed points.
pub const MAX_NUM_VORTICES: usize = 64;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a [`ProblemConfig`] at startup.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// More perturbation seed points were requested than fit.
    TooManyVortices {
        /// Configured `num_vortices`.
        requested: usize,
        /// [`MAX_NUM_VORTICES`].
        capacity: usize,
    },
    /// `velpert_scale` is NaN, infinite, zero, or negative.
    InvalidPerturbationScale {
        /// The invalid value.
        value: f64,
    },
    /// `velpert_amplitude` is not finite.
    InvalidPerturbationAmplitude {
        /// The invalid value.
        value: f64,
    },
    /// `small_x` is outside `[0, 1)`.
    InvalidCompositionFloor {
        /// The invalid value.
        value: f64,
    },
    /// The network carries no species.
    EmptyNetwork,
    /// The perturbation tracer species is not in the network.
    UnknownTracerSpecies {
        /// The configured species name.
        name: String,
    },
    /// The profile and the network disagree on the species count.
    SpeciesCountMismatch {
        /// Species in the network.
        network: usize,
        /// Species per profile sample.
        profile: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyVortices {
                requested,
                capacity,
            } => write!(
                f,
                "num_vortices {requested} too large, capacity is {capacity}: \
                 increase MAX_NUM_VORTICES"
            ),
            Self::InvalidPerturbationScale { value } => {
                write!(f, "velpert_scale must be finite and positive, got {value}")
            }
            Self::InvalidPerturbationAmplitude { value } => {
                write!(f, "velpert_amplitude must be finite, got {value}")
            }
            Self::InvalidCompositionFloor { value } => {
                write!(f, "small_x must lie in [0, 1), got {value}")
            }
            Self::EmptyNetwork => write!(f, "species network is empty"),
            Self::UnknownTracerSpecies { name } => {
                write!(f, "perturbation tracer species '{name}' is not in the network")
            }
            Self::SpeciesCountMismatch { network, profile } => write!(
                f,
                "network has {network} species but the profile carries {profile}"
            ),
        }
    }
}

impl Error for ConfigError {}

// ── ProblemConfig ──────────────────────────────────────────────────

/// Runtime parameters of the stellar initial-state problem.
#[derive(Clone, Debug, PartialEq)]
pub struct ProblemConfig {
    /// Name of the 1-D initial model, for logging.
    pub model_name: String,
    /// Add the divergence-free velocity perturbation. Default: false.
    pub perturb_model: bool,
    /// Perturbation velocity amplitude. Default: 1.0e2.
    pub velpert_amplitude: f64,
    /// Perturbation length scale. Default: 1.0e7.
    pub velpert_scale: f64,
    /// Number of vortex seed points along axis 0. Default: 1.
    pub num_vortices: usize,
    /// Floor applied to every species mass fraction. Default: 1.0e-10.
    pub small_x: f64,
    /// Species whose mass fraction masks the perturbation. Default: `"Si28"`.
    pub tracer_species: String,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            model_name: "model.hse".to_string(),
            perturb_model: false,
            velpert_amplitude: 1.0e2,
            velpert_scale: 1.0e7,
            num_vortices: 1,
            small_x: 1.0e-10,
            tracer_species: "Si28".to_string(),
        }
    }
}

impl ProblemConfig {
    /// Validate all fields. The vortex capacity is checked first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_vortices > MAX_NUM_VORTICES {
            return Err(ConfigError::TooManyVortices {
                requested: self.num_vortices,
                capacity: MAX_NUM_VORTICES,
            });
        }
        if !self.velpert_scale.is_finite() || self.velpert_scale <= 0.0 {
            return Err(ConfigError::InvalidPerturbationScale {
                value: self.velpert_scale,
            });
        }
        if !self.velpert_amplitude.is_finite() {
            return Err(ConfigError::InvalidPerturbationAmplitude {
                value: self.velpert_amplitude,
            });
        }
        if !(0.0..1.0).contains(&self.small_x) {
            return Err(ConfigError::InvalidCompositionFloor {
                value: self.small_x,
            });
        }
        Ok(())
    }
}
