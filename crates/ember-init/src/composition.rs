//! Composition strategies: how a cell's mass fractions and auxiliary
//! composition (Ye, Ā, B/A) are made mutually consistent.
//!
//! The strategy is chosen once at startup by [`select_strategy`]:
//! [`NseComposition`] when an NSE table is available, otherwise
//! [`ExplicitComposition`].

use std::fmt;
use std::sync::Arc;

use ember_core::{AuxComposition, ConstructionError, EosState, Network, NseTable, SpeciesVec};

/// Which branch produced a [`ResolvedComposition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositionBranch {
    /// Aux values derived from the mass fractions by the network formula.
    Explicit,
    /// Composition taken from the NSE table; Ye kept from the profile.
    Nse,
}

/// Mass fractions and auxiliary composition after resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedComposition {
    /// Floored, normalised mass fractions.
    pub xn: SpeciesVec,
    /// Ye, Ā, B/A consistent with `xn`.
    pub aux: AuxComposition,
    /// Branch that produced this result.
    pub branch: CompositionBranch,
}

/// Resolves a cell's composition from its profile sample.
///
/// Implementations must be pure: the same input always yields the same
/// output, whichever thread calls.
pub trait CompositionResolver: Send + Sync {
    /// Short name for startup logging.
    fn name(&self) -> &'static str;

    /// Resolve the composition of a cell.
    ///
    /// `xn` has already been floored and normalised. `ye` is the
    /// profile's electron fraction. `radius` only labels errors.
    fn resolve(
        &self,
        rho: f64,
        temperature: f64,
        ye: f64,
        xn: SpeciesVec,
        radius: f64,
    ) -> Result<ResolvedComposition, ConstructionError>;
}

impl fmt::Debug for dyn CompositionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositionResolver({})", self.name())
    }
}

/// Raise every mass fraction to at least `small_x`.
pub fn apply_floor(xn: &mut [f64], small_x: f64) {
    for x in xn {
        *x = x.max(small_x);
    }
}

/// Divide every mass fraction by their sum.
///
/// A zero, negative, or non-finite sum cannot be renormalised and is
/// reported as [`ConstructionError::DegenerateComposition`].
pub fn normalize(xn: &mut [f64], radius: f64) -> Result<(), ConstructionError> {
    let sum: f64 = xn.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Err(ConstructionError::DegenerateComposition { sum, radius });
    }
    for x in xn {
        *x /= sum;
    }
    Ok(())
}

// ── ExplicitComposition ────────────────────────────────────────────

/// Derives Ye, Ā, and B/A from the mass fractions.
#[derive(Clone, Debug)]
pub struct ExplicitComposition {
    network: Network,
}

impl ExplicitComposition {
    /// Strategy over `network`.
    pub fn new(network: Network) -> Self {
        Self { network }
    }
}

impl CompositionResolver for ExplicitComposition {
    fn name(&self) -> &'static str {
        "explicit"
    }

    fn resolve(
        &self,
        _rho: f64,
        _temperature: f64,
        _ye: f64,
        xn: SpeciesVec,
        _radius: f64,
    ) -> Result<ResolvedComposition, ConstructionError> {
        let aux = self.network.aux_from_mass_fractions(&xn);
        Ok(ResolvedComposition {
            xn,
            aux,
            branch: CompositionBranch::Explicit,
        })
    }
}

// ── NseComposition ─────────────────────────────────────────────────

/// Uses the NSE table inside its validity region, the network formula
/// everywhere else.
pub struct NseComposition {
    explicit: ExplicitComposition,
    table: Arc<dyn NseTable>,
    small_x: f64,
}

impl NseComposition {
    /// Strategy over `network` backed by `table`.
    pub fn new(network: Network, table: Arc<dyn NseTable>, small_x: f64) -> Self {
        Self {
            explicit: ExplicitComposition::new(network),
            table,
            small_x,
        }
    }
}

impl fmt::Debug for NseComposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NseComposition")
            .field("network", &self.explicit.network)
            .field("small_x", &self.small_x)
            .finish_non_exhaustive()
    }
}

impl CompositionResolver for NseComposition {
    fn name(&self) -> &'static str {
        "nse"
    }

    fn resolve(
        &self,
        rho: f64,
        temperature: f64,
        ye: f64,
        xn: SpeciesVec,
        radius: f64,
    ) -> Result<ResolvedComposition, ConstructionError> {
        let network = &self.explicit.network;
        let tentative = EosState {
            rho,
            temperature,
            aux: AuxComposition {
                ye,
                ..network.aux_from_mass_fractions(&xn)
            },
            xn,
        };
        if !self.table.in_nse(&tentative) {
            return self.explicit.resolve(rho, temperature, ye, tentative.xn, radius);
        }

        let nse = self.table.solve(temperature, rho, ye)?;
        if nse.xn.len() != network.len() {
            return Err(ConstructionError::SpeciesCountMismatch {
                expected: network.len(),
                actual: nse.xn.len(),
            });
        }
        let mut xn = nse.xn;
        apply_floor(&mut xn, self.small_x);
        normalize(&mut xn, radius)?;
        Ok(ResolvedComposition {
            xn,
            aux: AuxComposition {
                ye,
                abar: nse.abar,
                binding_energy: nse.binding_energy,
            },
            branch: CompositionBranch::Nse,
        })
    }
}

/// Choose the composition strategy for the run.
pub fn select_strategy(
    network: &Network,
    nse: Option<Arc<dyn NseTable>>,
    small_x: f64,
) -> Arc<dyn CompositionResolver> {
    match nse {
        Some(table) => Arc::new(NseComposition::new(network.clone(), table, small_x)),
        None => Arc::new(ExplicitComposition::new(network.clone())),
    }
}
