//! Named derived fields used by diagnostic reductions.

use std::fmt;
use std::str::FromStr;

use crate::state::CellState;

/// A per-cell scalar that diagnostics can integrate over a level.
///
/// Fields are looked up by the names the data log and input files use
/// (`"density"`, `"xmom"`, `"rho_E"`, ...), see [`FromStr`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DerivedField {
    /// Mass density ρ.
    Density,
    /// x-momentum density.
    XMom,
    /// y-momentum density.
    YMom,
    /// z-momentum density.
    ZMom,
    /// Internal energy density ρe.
    RhoE,
    /// Kinetic energy density ½ρ|v|².
    KinEng,
    /// Total energy density ρE.
    RhoEtot,
    /// Temperature.
    Temp,
}

impl DerivedField {
    /// Every field, in data-log order.
    pub const ALL: [Self; 8] = [
        Self::Density,
        Self::XMom,
        Self::YMom,
        Self::ZMom,
        Self::RhoE,
        Self::KinEng,
        Self::RhoEtot,
        Self::Temp,
    ];

    /// The lookup name of this field.
    pub fn name(self) -> &'static str {
        match self {
            Self::Density => "density",
            Self::XMom => "xmom",
            Self::YMom => "ymom",
            Self::ZMom => "zmom",
            Self::RhoE => "rho_e",
            Self::KinEng => "kineng",
            Self::RhoEtot => "rho_E",
            Self::Temp => "Temp",
        }
    }

    /// Evaluate the field on one cell.
    pub fn value(self, cell: &CellState) -> f64 {
        match self {
            Self::Density => cell.rho,
            Self::XMom => cell.momentum[0],
            Self::YMom => cell.momentum[1],
            Self::ZMom => cell.momentum[2],
            Self::RhoE => cell.rho_eint,
            Self::KinEng => cell.kinetic_energy_density(),
            Self::RhoEtot => cell.rho_etot,
            Self::Temp => cell.temperature,
        }
    }

    /// The momentum field along `axis` (0, 1, 2).
    pub fn momentum(axis: usize) -> Option<Self> {
        match axis {
            0 => Some(Self::XMom),
            1 => Some(Self::YMom),
            2 => Some(Self::ZMom),
            _ => None,
        }
    }
}

impl fmt::Display for DerivedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a field name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown derived field '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for DerivedField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
