//! The per-cell conserved state vector.

use smallvec::SmallVec;

/// Per-species storage. Eight inline slots cover the reaction networks
/// used for massive-star and supernova problems without heap allocation.
pub type SpeciesVec = SmallVec<[f64; 8]>;

/// Number of auxiliary composition variables carried per cell.
pub const NUM_AUX: usize = 3;

/// Index of an auxiliary composition variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuxIndex {
    /// Electron fraction Ye.
    Ye = 0,
    /// Mean atomic weight Ā.
    Abar = 1,
    /// Mean binding energy per nucleon B/A, in MeV.
    BindingEnergy = 2,
}

/// Conserved state of a single cell.
///
/// Everything except `temperature` is stored density-weighted:
/// `momentum` is ρ·v, `rho_x` holds the species partial densities ρ·X,
/// and `rho_aux` holds ρ·Ye, ρ·Ā, and ρ·B/A. After construction the
/// species partial densities sum to `rho`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CellState {
    /// Mass density.
    pub rho: f64,
    /// Momentum density, one component per axis.
    pub momentum: [f64; 3],
    /// Total energy density ρE.
    pub rho_etot: f64,
    /// Internal energy density ρe.
    pub rho_eint: f64,
    /// Temperature.
    pub temperature: f64,
    /// Species partial densities ρ·X.
    pub rho_x: SpeciesVec,
    /// Auxiliary partial densities, indexed by [`AuxIndex`].
    pub rho_aux: [f64; NUM_AUX],
}

impl CellState {
    /// A zeroed state carrying `n_species` species slots.
    pub fn zeroed(n_species: usize) -> Self {
        Self {
            rho_x: SmallVec::from_elem(0.0, n_species),
            ..Self::default()
        }
    }

    /// Velocity `momentum / rho`, or zero where the density vanishes.
    pub fn velocity(&self) -> [f64; 3] {
        if self.rho > 0.0 {
            self.momentum.map(|m| m / self.rho)
        } else {
            [0.0; 3]
        }
    }

    /// Kinetic energy density `|m|² / 2ρ`, or zero where the density vanishes.
    pub fn kinetic_energy_density(&self) -> f64 {
        if self.rho > 0.0 {
            let m2: f64 = self.momentum.iter().map(|m| m * m).sum();
            0.5 * m2 / self.rho
        } else {
            0.0
        }
    }

    /// Mass fraction of species `n`, or `None` if out of range or ρ = 0.
    pub fn mass_fraction(&self, n: usize) -> Option<f64> {
        if self.rho == 0.0 {
            return None;
        }
        self.rho_x.get(n).map(|rx| rx / self.rho)
    }

    /// Specific auxiliary value (e.g. Ye), or `None` where ρ = 0.
    pub fn aux(&self, index: AuxIndex) -> Option<f64> {
        if self.rho == 0.0 {
            None
        } else {
            Some(self.rho_aux[index as usize] / self.rho)
        }
    }

    /// Sum of species partial densities.
    pub fn species_density_sum(&self) -> f64 {
        self.rho_x.iter().sum()
    }
}
