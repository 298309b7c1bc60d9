//! Species network and composition-derived auxiliary quantities.

use crate::state::{AuxIndex, NUM_AUX};

/// One nuclear species carried by the network.
#[derive(Clone, Debug, PartialEq)]
pub struct Species {
    /// Short name, e.g. `"Si28"`.
    pub name: String,
    /// Mass number A.
    pub a: f64,
    /// Proton number Z.
    pub z: f64,
    /// Binding energy per nucleon, in MeV.
    pub binding_energy: f64,
}

impl Species {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, a: f64, z: f64, binding_energy: f64) -> Self {
        Self {
            name: name.into(),
            a,
            z,
            binding_energy,
        }
    }
}

/// Auxiliary composition variables in specific (not density-weighted) form.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct AuxComposition {
    /// Electron fraction.
    pub ye: f64,
    /// Mean atomic weight.
    pub abar: f64,
    /// Mean binding energy per nucleon, in MeV.
    pub binding_energy: f64,
}

impl AuxComposition {
    /// Pack into the array layout used by [`CellState::rho_aux`](crate::CellState).
    pub fn to_array(self) -> [f64; NUM_AUX] {
        let mut out = [0.0; NUM_AUX];
        out[AuxIndex::Ye as usize] = self.ye;
        out[AuxIndex::Abar as usize] = self.abar;
        out[AuxIndex::BindingEnergy as usize] = self.binding_energy;
        out
    }
}

/// An ordered list of species.
///
/// The order defines the species index used by profiles, NSE tables,
/// and [`CellState::rho_x`](crate::CellState).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Network {
    species: Vec<Species>,
}

impl Network {
    /// Build a network from an ordered species list.
    pub fn new(species: Vec<Species>) -> Self {
        Self { species }
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Returns `true` if the network carries no species.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// The species list, in network order.
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// Index of the species with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.species.iter().position(|s| s.name == name)
    }

    /// Derive Ye, Ā, and B/A from mass fractions.
    ///
    /// ```text
    /// Ye  = Σ X·Z/A
    /// Ā   = 1 / Σ X/A
    /// B/A = Σ X·(B/A)_i
    /// ```
    ///
    /// `xn` must have one entry per species. Extra entries are ignored
    /// and missing entries count as zero.
    pub fn aux_from_mass_fractions(&self, xn: &[f64]) -> AuxComposition {
        let mut ye = 0.0;
        let mut inv_abar = 0.0;
        let mut bea = 0.0;
        for (s, &x) in self.species.iter().zip(xn) {
            ye += x * s.z / s.a;
            inv_abar += x / s.a;
            bea += x * s.binding_energy;
        }
        AuxComposition {
            ye,
            abar: if inv_abar > 0.0 { 1.0 / inv_abar } else { 0.0 },
            binding_energy: bea,
        }
    }
}
