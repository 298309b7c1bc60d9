//! Traits through which external physics collaborators are consumed.
//!
//! The profile reader, equation of state, and NSE tables are numerical
//! kernels owned elsewhere. Ember only calls them. All three traits
//! require `Send + Sync` so a single instance can serve every worker
//! thread during parallel state construction.

use crate::error::ClosureError;
use crate::network::AuxComposition;
use crate::profile::{ProfileSample, StellarProfile};
use crate::state::SpeciesVec;

/// Maps a radius to a thermodynamic state by interpolating a 1-D model.
pub trait ProfileInterpolator: Send + Sync {
    /// Sample density, temperature, mass fractions, and Ye at `radius`.
    fn sample(&self, radius: f64) -> Result<ProfileSample, ClosureError>;

    /// Number of species each sample carries.
    fn species_count(&self) -> usize;

    /// The tabulated model behind the interpolator, if it has one.
    fn model(&self) -> Option<&StellarProfile> {
        None
    }
}

/// Input to an equation-of-state evaluation in (ρ, T) mode.
#[derive(Clone, Debug, PartialEq)]
pub struct EosState {
    /// Mass density.
    pub rho: f64,
    /// Temperature.
    pub temperature: f64,
    /// Normalised mass fractions.
    pub xn: SpeciesVec,
    /// Auxiliary composition.
    pub aux: AuxComposition,
}

/// Thermodynamic closure: (ρ, T, composition) → specific internal energy.
pub trait ThermodynamicClosure: Send + Sync {
    /// Specific internal energy for the given state.
    fn internal_energy(&self, state: &EosState) -> Result<f64, ClosureError>;
}

/// Output of an NSE table lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct NseResult {
    /// Mean atomic weight of the equilibrium composition.
    pub abar: f64,
    /// Mean binding energy per nucleon, in MeV.
    pub binding_energy: f64,
    /// Rate of change of Ye from weak reactions. Unused at initialisation.
    pub dyedt: f64,
    /// Equilibrium mass fractions in network order. May not sum to one.
    pub xn: SpeciesVec,
}

/// Nuclear statistical equilibrium composition source.
pub trait NseTable: Send + Sync {
    /// Whether the given tentative state is in NSE.
    fn in_nse(&self, state: &EosState) -> bool;

    /// Equilibrium composition for temperature, density, and Ye.
    fn solve(&self, temperature: f64, rho: f64, ye: f64) -> Result<NseResult, ClosureError>;
}
