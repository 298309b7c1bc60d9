//! Global scalars derived from reduced level sums.

use indexmap::IndexMap;

use crate::aggregate::LevelSums;
use crate::error::DiagnosticsError;

const CENTER_OF_MASS_LABELS: [(&str, &str); 3] = [
    ("CENTER OF MASS X-LOC", "CENTER OF MASS X-VEL"),
    ("CENTER OF MASS Y-LOC", "CENTER OF MASS Y-VEL"),
    ("CENTER OF MASS Z-LOC", "CENTER OF MASS Z-VEL"),
];

/// Integrated quantities at one diagnostic time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegratedQuantities {
    /// Simulation time.
    pub time: f64,
    /// Total mass.
    pub mass: f64,
    /// Total momentum.
    pub momentum: [f64; 3],
    /// Total internal energy.
    pub rho_e: f64,
    /// Total kinetic energy.
    pub rho_k: f64,
    /// Total energy.
    pub rho_etot: f64,
    /// `(T_max − T_min) / |∇T|_max`, or 0 when the gradient vanishes.
    pub flame_width: f64,
    /// `−fuel_rate / rho_fuel_initial`.
    pub flame_speed: f64,
    /// Mass-weighted mean position.
    pub center_of_mass: [f64; 3],
    /// Momentum over mass.
    pub center_of_mass_velocity: [f64; 3],
}

impl IntegratedQuantities {
    /// Derive the reported scalars from global `sums`.
    ///
    /// Fails with [`DiagnosticsError::ZeroMass`] when the total mass is
    /// zero or not finite.
    pub fn derive(
        sums: &LevelSums,
        time: f64,
        rho_fuel_initial: f64,
    ) -> Result<Self, DiagnosticsError> {
        let mass = sums.mass;
        if !mass.is_finite() || mass == 0.0 {
            return Err(DiagnosticsError::ZeroMass { mass });
        }
        let flame_width = if sums.cells == 0 || !(sums.grad_t_max > 0.0) {
            0.0
        } else {
            (sums.t_max - sums.t_min) / sums.grad_t_max
        };
        Ok(Self {
            time,
            mass,
            momentum: sums.momentum,
            rho_e: sums.rho_e,
            rho_k: sums.rho_k,
            rho_etot: sums.rho_etot,
            flame_width,
            flame_speed: -sums.fuel_rate / rho_fuel_initial,
            center_of_mass: sums.mass_moment.map(|m| m / mass),
            center_of_mass_velocity: sums.momentum.map(|m| m / mass),
        })
    }

    /// Console labels and values, in print order.
    pub fn console_entries(&self) -> IndexMap<&'static str, f64> {
        let mut entries = IndexMap::with_capacity(15);
        entries.insert("MASS", self.mass);
        entries.insert("XMOM", self.momentum[0]);
        entries.insert("YMOM", self.momentum[1]);
        entries.insert("ZMOM", self.momentum[2]);
        entries.insert("RHO*e", self.rho_e);
        entries.insert("RHO*K", self.rho_k);
        entries.insert("RHO*E", self.rho_etot);
        entries.insert("FLAME WIDTH", self.flame_width);
        entries.insert("FLAME SPEED", self.flame_speed);
        for (axis, (loc, vel)) in CENTER_OF_MASS_LABELS.into_iter().enumerate() {
            entries.insert(loc, self.center_of_mass[axis]);
            entries.insert(vel, self.center_of_mass_velocity[axis]);
        }
        entries
    }

    /// Data-log columns after `time`, in column order.
    pub fn data_log_values(&self) -> [f64; 9] {
        [
            self.mass,
            self.momentum[0],
            self.momentum[1],
            self.momentum[2],
            self.rho_k,
            self.rho_e,
            self.rho_etot,
            self.flame_width,
            self.flame_speed,
        ]
    }
}
