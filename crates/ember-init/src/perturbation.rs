//! Deterministic, divergence-free velocity perturbation.
//!
//! The field is a superposition of 27 Fourier modes with integer
//! wavenumbers `(i, j, k) ∈ {1, 2, 3}³`. Amplitudes and phases are fixed
//! closed-form constants rather than random draws, so every rank and
//! every restart reproduces the same field bit for bit.
//!
//! Each mode contributes the curl of a vector potential, so the summed
//! field satisfies `∇·v = 0` analytically.

use std::f64::consts::PI;

use ember_core::CellState;

/// Number of Fourier modes in the field.
pub const MODE_COUNT: usize = 27;

/// One Fourier mode of the perturbation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerturbationMode {
    /// Integer wavenumbers `(i, j, k)` as floats.
    pub wavenumber: [f64; 3],
    /// Vector-potential amplitudes `(α, β, γ)`.
    pub amplitude: [f64; 3],
    /// Phase offsets `(φx, φy, φz)` in radians.
    pub phase: [f64; 3],
    /// `|k| = sqrt(i² + j² + k²)`.
    pub norm: f64,
}

impl PerturbationMode {
    fn from_wavenumber(i: i32, j: i32, k: i32) -> Self {
        let p = |base: f64, e: i32| base.powi(e);
        let sign = |e: i32| if e % 2 == 0 { 1.0 } else { -1.0 };
        let alpha = p(0.5, i) * p(0.7, j) * p(0.3, k) * sign(i);
        let beta = p(0.5, i) * p(0.3, j) * p(0.7, k) * sign(j);
        let gamma = p(0.3, i) * p(0.5, j) * p(0.7, k) * sign(k);
        let two_pi = 2.0 * PI;
        Self {
            wavenumber: [f64::from(i), f64::from(j), f64::from(k)],
            amplitude: [alpha, beta, gamma],
            phase: [
                two_pi * p(0.3, i) * p(0.7, j) * p(0.5, k),
                two_pi * p(0.7, i) * p(0.3, j) * p(0.5, k),
                two_pi * p(0.7, i) * p(0.5, j) * p(0.3, k),
            ],
            norm: f64::from(i * i + j * j + k * k).sqrt(),
        }
    }
}

/// The immutable 27-mode mode table together with its length scale.
///
/// Built once at startup and shared read-only by every worker.
#[derive(Clone, Debug, PartialEq)]
pub struct PerturbationField {
    scale: f64,
    modes: [PerturbationMode; MODE_COUNT],
}

impl PerturbationField {
    /// Build the mode table for length scale `scale`.
    ///
    /// `scale` is validated by [`ProblemConfig::validate`](crate::ProblemConfig::validate).
    pub fn new(scale: f64) -> Self {
        let modes = std::array::from_fn(|n| {
            // n = (i-1) + 3·((j-1) + 3·(k-1))
            let n = n as i32;
            PerturbationMode::from_wavenumber(n % 3 + 1, (n / 3) % 3 + 1, n / 9 + 1)
        });
        Self { scale, modes }
    }

    /// Length scale the wavenumbers are measured against.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The mode table in flat-index order.
    pub fn modes(&self) -> &[PerturbationMode; MODE_COUNT] {
        &self.modes
    }

    /// Unscaled perturbation velocity at absolute position `pos`.
    pub fn velocity(&self, pos: [f64; 3]) -> [f64; 3] {
        let mut v = [0.0; 3];
        for mode in &self.modes {
            let [i, j, k] = mode.wavenumber;
            let [alpha, beta, gamma] = mode.amplitude;
            let (s, c): ([f64; 3], [f64; 3]) = {
                let arg: [f64; 3] = std::array::from_fn(|d| {
                    2.0 * PI * mode.wavenumber[d] * pos[d] / self.scale + mode.phase[d]
                });
                (arg.map(f64::sin), arg.map(f64::cos))
            };
            let [sx, sy, sz] = s;
            let [cx, cy, cz] = c;
            v[0] += (-gamma * j * cx * cz * sy + beta * k * cx * cy * sz) / mode.norm;
            v[1] += (gamma * i * cy * cz * sx - alpha * k * cx * cy * sz) / mode.norm;
            v[2] += (-beta * i * cy * cz * sx + alpha * j * cx * cz * sy) / mode.norm;
        }
        v
    }
}

/// A perturbation field bound to its amplitude and tracer species.
///
/// The velocity is masked by the tracer's mass fraction, so the
/// perturbation only lives where the tracer species is abundant.
#[derive(Clone, Debug, PartialEq)]
pub struct Perturbation {
    field: PerturbationField,
    amplitude: f64,
    tracer: usize,
}

impl Perturbation {
    /// Bind `field` to a velocity `amplitude` and a tracer species index.
    pub fn new(field: PerturbationField, amplitude: f64, tracer: usize) -> Self {
        Self {
            field,
            amplitude,
            tracer,
        }
    }

    /// The underlying mode table.
    pub fn field(&self) -> &PerturbationField {
        &self.field
    }

    /// Velocity amplitude.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Network index of the tracer species.
    pub fn tracer(&self) -> usize {
        self.tracer
    }

    /// Add `ρ · amplitude · X_tracer · v(pos)` to the cell's momentum.
    ///
    /// The cell must already hold its partial densities. Total energy is
    /// left untouched.
    pub fn apply(&self, cell: &mut CellState, pos: [f64; 3]) {
        let rho_tracer = cell.rho_x.get(self.tracer).copied().unwrap_or(0.0);
        let v = self.field.velocity(pos);
        for (m, vd) in cell.momentum.iter_mut().zip(v) {
            *m += self.amplitude * rho_tracer * vd;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn first_mode_constants() {
        let field = PerturbationField::new(1.0e7);
        let m = field.modes()[0];
        assert_eq!(m.wavenumber, [1.0, 1.0, 1.0]);
        for a in m.amplitude {
            assert!(approx(a, -0.105, 1e-15));
        }
        assert!(approx(m.norm, 3f64.sqrt(), 1e-15));
        assert!(approx(m.phase[0], 2.0 * PI * 0.105, 1e-14));
    }

    #[test]
    fn flat_index_ordering() {
        let field = PerturbationField::new(1.0);
        // i fastest, then j, then k
        assert_eq!(field.modes()[1].wavenumber, [2.0, 1.0, 1.0]);
        assert_eq!(field.modes()[3].wavenumber, [1.0, 2.0, 1.0]);
        assert_eq!(field.modes()[9].wavenumber, [1.0, 1.0, 2.0]);
        assert_eq!(field.modes()[26].wavenumber, [3.0, 3.0, 3.0]);
        assert!(approx(field.modes()[26].norm, 27f64.sqrt(), 1e-15));
    }

    #[test]
    fn amplitude_signs_follow_wavenumber_parity() {
        let field = PerturbationField::new(1.0);
        // (i, j, k) = (2, 1, 1): α positive, β and γ negative
        let m = field.modes()[1];
        assert!(m.amplitude[0] > 0.0);
        assert!(m.amplitude[1] < 0.0);
        assert!(m.amplitude[2] < 0.0);
    }

    #[test]
    fn velocity_is_deterministic() {
        let a = PerturbationField::new(2.5e6);
        let b = PerturbationField::new(2.5e6);
        let pos = [1.3e6, -4.0e5, 7.7e6];
        assert_eq!(a.velocity(pos), b.velocity(pos));
        assert_eq!(a.velocity(pos), a.velocity(pos));
    }

    proptest! {
        #[test]
        fn independent_fields_agree_bitwise(
            scale in 1.0e-2f64..1.0e9,
            x in -1.0e9f64..1.0e9,
            y in -1.0e9f64..1.0e9,
            z in -1.0e9f64..1.0e9,
        ) {
            let a = PerturbationField::new(scale).velocity([x, y, z]);
            let b = PerturbationField::new(scale).velocity([x, y, z]);
            prop_assert_eq!(a.map(f64::to_bits), b.map(f64::to_bits));
            prop_assert!(a.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn numerical_divergence_vanishes() {
        let field = PerturbationField::new(1.0);
        let h = 1.0e-5;
        for pos in [[0.1, 0.2, 0.3], [0.77, -0.41, 0.05], [-1.2, 2.5, 0.9]] {
            let mut div = 0.0;
            for d in 0..3 {
                let mut plus = pos;
                let mut minus = pos;
                plus[d] += h;
                minus[d] -= h;
                div += (field.velocity(plus)[d] - field.velocity(minus)[d]) / (2.0 * h);
            }
            assert!(div.abs() < 1.0e-5, "divergence {div} at {pos:?}");
        }
    }

    #[test]
    fn field_is_nonzero() {
        let field = PerturbationField::new(1.0);
        let v = field.velocity([0.25, 0.5, 0.75]);
        assert!(v.iter().any(|c| c.abs() > 1.0e-6));
    }

    #[test]
    fn apply_scales_by_tracer_density() {
        let field = PerturbationField::new(1.0);
        let pert = Perturbation::new(field.clone(), 10.0, 1);
        let mut cell = CellState::zeroed(2);
        cell.rho = 2.0;
        cell.rho_x[0] = 1.5;
        cell.rho_x[1] = 0.5;
        let pos = [0.3, 0.1, 0.6];
        pert.apply(&mut cell, pos);
        let v = field.velocity(pos);
        for d in 0..3 {
            assert!(approx(cell.momentum[d], 10.0 * 0.5 * v[d], 1e-12));
        }
    }

    #[test]
    fn apply_without_tracer_leaves_momentum() {
        let pert = Perturbation::new(PerturbationField::new(1.0), 10.0, 0);
        let mut cell = CellState::zeroed(1);
        cell.rho = 1.0;
        pert.apply(&mut cell, [0.1, 0.2, 0.3]);
        assert_eq!(cell.momentum, [0.0; 3]);
    }
}
