//! Test utilities and mock physics collaborators for Ember development.
//!
//! Provides simple implementations of the collaborator traits
//! ([`ProfileInterpolator`], [`ThermodynamicClosure`], [`NseTable`]) plus
//! reference networks, profiles, and hierarchies in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};

use ember_core::{
    ClosureError, EosState, NseResult, NseTable, ProfileInterpolator, ProfileSample, SpeciesVec,
    ThermodynamicClosure,
};

/// Gas constant in erg / (K · mol).
pub const GAS_CONSTANT: f64 = 8.314_462_618e7;

/// Profile that returns the same sample at every radius.
#[derive(Clone, Debug)]
pub struct ConstantProfile {
    pub sample: ProfileSample,
}

impl ConstantProfile {
    pub fn new(density: f64, temperature: f64, xn: SpeciesVec, ye: f64) -> Self {
        Self {
            sample: ProfileSample {
                density,
                temperature,
                xn,
                ye,
            },
        }
    }
}

impl ProfileInterpolator for ConstantProfile {
    fn sample(&self, _radius: f64) -> Result<ProfileSample, ClosureError> {
        Ok(self.sample.clone())
    }

    fn species_count(&self) -> usize {
        self.sample.xn.len()
    }
}

/// Ideal gas of fully ionised ions and electrons.
///
/// `e = R T / ((γ - 1) μ)` with mean molecular weight
/// `μ = 1 / (1/Ā + Ye)`.
#[derive(Clone, Copy, Debug)]
pub struct GammaLawEos {
    pub gamma: f64,
}

impl GammaLawEos {
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    pub fn mean_molecular_weight(state: &EosState) -> f64 {
        1.0 / (1.0 / state.aux.abar + state.aux.ye)
    }
}

impl Default for GammaLawEos {
    fn default() -> Self {
        Self::new(5.0 / 3.0)
    }
}

impl ThermodynamicClosure for GammaLawEos {
    fn internal_energy(&self, state: &EosState) -> Result<f64, ClosureError> {
        if state.aux.abar <= 0.0 || state.temperature < 0.0 {
            return Err(ClosureError::Eos {
                reason: format!(
                    "unphysical input: abar = {}, T = {}",
                    state.aux.abar, state.temperature
                ),
            });
        }
        let mu = Self::mean_molecular_weight(state);
        Ok(GAS_CONSTANT * state.temperature / ((self.gamma - 1.0) * mu))
    }
}

/// EOS returning a fixed specific energy, optionally counting calls.
#[derive(Debug, Default)]
pub struct ConstantEos {
    pub energy: f64,
    calls: AtomicUsize,
}

impl ConstantEos {
    pub fn new(energy: f64) -> Self {
        Self {
            energy,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `internal_energy` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl ThermodynamicClosure for ConstantEos {
    fn internal_energy(&self, _state: &EosState) -> Result<f64, ClosureError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.energy)
    }
}

/// EOS that always fails.
#[derive(Clone, Debug, Default)]
pub struct FailingEos;

impl ThermodynamicClosure for FailingEos {
    fn internal_energy(&self, _state: &EosState) -> Result<f64, ClosureError> {
        Err(ClosureError::Eos {
            reason: "did not converge".into(),
        })
    }
}

/// NSE table with a temperature threshold and a fixed solution.
#[derive(Clone, Debug)]
pub struct StubNse {
    /// Cells strictly hotter than this are in NSE.
    pub threshold_temperature: f64,
    pub abar: f64,
    pub binding_energy: f64,
    pub xn: SpeciesVec,
}

impl StubNse {
    pub fn new(threshold_temperature: f64, abar: f64, binding_energy: f64, xn: SpeciesVec) -> Self {
        Self {
            threshold_temperature,
            abar,
            binding_energy,
            xn,
        }
    }
}

impl NseTable for StubNse {
    fn in_nse(&self, state: &EosState) -> bool {
        state.temperature > self.threshold_temperature
    }

    fn solve(&self, _temperature: f64, _rho: f64, _ye: f64) -> Result<NseResult, ClosureError> {
        Ok(NseResult {
            abar: self.abar,
            binding_energy: self.binding_energy,
            dyedt: 0.0,
            xn: self.xn.clone(),
        })
    }
}
