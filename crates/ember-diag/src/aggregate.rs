//! Per-level integrals and extrema over the cells a rank owns.
//!
//! Every function here skips covered cells, so summing the results over
//! all levels of a hierarchy counts each physical region exactly once.
//! Patches are processed in parallel and their partial results combined
//! with [`LevelSums::combine`].

use ember_core::{CellState, DerivedField, Rank};
use ember_mesh::{Level, LevelFrame, Patch};
use rayon::prelude::*;

/// Partial integrated quantities from one level, one rank, or any union
/// of them.
///
/// [`identity`](Self::identity) and [`combine`](Self::combine) form a
/// commutative monoid (up to floating-point rounding in the sums).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelSums {
    /// ∫ρ dV.
    pub mass: f64,
    /// ∫ρv dV per axis.
    pub momentum: [f64; 3],
    /// ∫ρ·x dV per axis.
    pub mass_moment: [f64; 3],
    /// ∫ρe dV.
    pub rho_e: f64,
    /// ∫½ρ|v|² dV.
    pub rho_k: f64,
    /// ∫ρE dV.
    pub rho_etot: f64,
    /// Highest temperature seen.
    pub t_max: f64,
    /// Lowest temperature seen.
    pub t_min: f64,
    /// Largest temperature-gradient magnitude seen.
    pub grad_t_max: f64,
    /// ∫ρ·ω̇_fuel dV.
    pub fuel_rate: f64,
    /// Number of uncovered cells visited.
    pub cells: u64,
}

impl LevelSums {
    /// The empty sum: zero integrals, extrema at their sentinels.
    pub fn identity() -> Self {
        Self {
            mass: 0.0,
            momentum: [0.0; 3],
            mass_moment: [0.0; 3],
            rho_e: 0.0,
            rho_k: 0.0,
            rho_etot: 0.0,
            t_max: f64::NEG_INFINITY,
            t_min: f64::INFINITY,
            grad_t_max: f64::NEG_INFINITY,
            fuel_rate: 0.0,
            cells: 0,
        }
    }

    /// Merge two partial results.
    pub fn combine(self, other: Self) -> Self {
        let add3 = |a: [f64; 3], b: [f64; 3]| std::array::from_fn(|n| a[n] + b[n]);
        Self {
            mass: self.mass + other.mass,
            momentum: add3(self.momentum, other.momentum),
            mass_moment: add3(self.mass_moment, other.mass_moment),
            rho_e: self.rho_e + other.rho_e,
            rho_k: self.rho_k + other.rho_k,
            rho_etot: self.rho_etot + other.rho_etot,
            t_max: self.t_max.max(other.t_max),
            t_min: self.t_min.min(other.t_min),
            grad_t_max: self.grad_t_max.max(other.grad_t_max),
            fuel_rate: self.fuel_rate + other.fuel_rate,
            cells: self.cells + other.cells,
        }
    }
}

impl Default for LevelSums {
    fn default() -> Self {
        Self::identity()
    }
}

/// Visit every uncovered cell of `patch` with its index offset and volume.
fn for_each_uncovered(
    frame: LevelFrame,
    patch: &Patch,
    mut f: impl FnMut(usize, [i32; 3], f64, &CellState),
) {
    let bx = patch.bx();
    for (offset, (cell, &covered)) in patch.cells().iter().zip(patch.covered()).enumerate() {
        if covered {
            continue;
        }
        let idx = bx.index_at(offset);
        f(offset, idx, frame.cell_volume(idx), cell);
    }
}

fn local_patches<'a>(level: &'a Level, rank: Rank) -> Vec<&'a Patch> {
    level.local_patches(rank).collect()
}

/// `Σ field · vol` over the uncovered cells `rank` owns on `level`.
pub fn vol_wgt_sum(level: &Level, rank: Rank, field: DerivedField) -> f64 {
    let frame = level.frame();
    local_patches(level, rank)
        .par_iter()
        .map(|patch| {
            let mut sum = 0.0;
            for_each_uncovered(frame, patch, |_, _, vol, cell| sum += field.value(cell) * vol);
            sum
        })
        .sum()
}

/// `Σ field · x_axis · vol`, with `x_axis` the absolute cell-centre
/// coordinate along `axis`.
pub fn loc_wgt_sum(level: &Level, rank: Rank, field: DerivedField, axis: usize) -> f64 {
    let frame = level.frame();
    local_patches(level, rank)
        .par_iter()
        .map(|patch| {
            let mut sum = 0.0;
            for_each_uncovered(frame, patch, |_, idx, vol, cell| {
                sum += field.value(cell) * frame.cell_center(idx)[axis] * vol;
            });
            sum
        })
        .sum()
}

/// Temperature at `idx`, read from `patch` when it holds the cell and
/// from any other patch of `level` otherwise.
fn temperature_at(level: &Level, patch: &Patch, idx: [i32; 3]) -> Option<f64> {
    patch
        .cell(idx)
        .or_else(|| level.cell(idx))
        .map(|c| c.temperature)
}

/// Magnitude of the temperature gradient at `idx`.
///
/// Neighbours are read across patch boundaries of the same level. The
/// difference is central where both neighbours exist, one-sided where
/// only one does (the domain edge or the edge of a refined region), and
/// zero along an axis one cell thick.
fn temperature_gradient(level: &Level, patch: &Patch, idx: [i32; 3], t_here: f64) -> f64 {
    let dx = level.dx();
    let mut g2 = 0.0;
    for d in 0..3 {
        let mut minus = idx;
        let mut plus = idx;
        minus[d] -= 1;
        plus[d] += 1;
        let neighbour = |at| temperature_at(level, patch, at).map_or((t_here, 0), |t| (t, 1));
        let (t_minus, w_minus) = neighbour(minus);
        let (t_plus, w_plus) = neighbour(plus);
        let span: i32 = w_minus + w_plus;
        if span == 0 {
            continue;
        }
        let g = (t_plus - t_minus) / (f64::from(span) * dx[d]);
        g2 += g * g;
    }
    g2.sqrt()
}

/// `(T_max, T_min, |∇T|_max)` over the uncovered cells `rank` owns.
///
/// Returns the identity sentinels when the rank owns no such cells.
pub fn flame_width_properties(level: &Level, rank: Rank) -> (f64, f64, f64) {
    let frame = level.frame();
    local_patches(level, rank)
        .par_iter()
        .map(|patch| {
            let mut ext = (f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
            for_each_uncovered(frame, patch, |_, idx, _, cell| {
                let t = cell.temperature;
                ext.0 = ext.0.max(t);
                ext.1 = ext.1.min(t);
                ext.2 = ext.2.max(temperature_gradient(level, patch, idx, t));
            });
            ext
        })
        .reduce(
            || (f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |a, b| (a.0.max(b.0), a.1.min(b.1), a.2.max(b.2)),
        )
}

/// `Σ fuel_rate · vol` over the uncovered cells `rank` owns.
pub fn flame_speed_properties(level: &Level, rank: Rank) -> f64 {
    let frame = level.frame();
    local_patches(level, rank)
        .par_iter()
        .map(|patch| {
            let mut sum = 0.0;
            for_each_uncovered(frame, patch, |offset, _, vol, _| {
                sum += patch.fuel_rate()[offset] * vol;
            });
            sum
        })
        .sum()
}

fn patch_sums(level: &Level, patch: &Patch, include_flame_speed: bool) -> LevelSums {
    let frame = level.frame();
    let mut s = LevelSums::identity();
    for_each_uncovered(frame, patch, |offset, idx, vol, cell| {
        let center = frame.cell_center(idx);
        s.mass += cell.rho * vol;
        for d in 0..3 {
            s.momentum[d] += cell.momentum[d] * vol;
            s.mass_moment[d] += cell.rho * center[d] * vol;
        }
        s.rho_e += cell.rho_eint * vol;
        s.rho_k += cell.kinetic_energy_density() * vol;
        s.rho_etot += cell.rho_etot * vol;
        s.t_max = s.t_max.max(cell.temperature);
        s.t_min = s.t_min.min(cell.temperature);
        s.grad_t_max = s
            .grad_t_max
            .max(temperature_gradient(level, patch, idx, cell.temperature));
        if include_flame_speed {
            s.fuel_rate += patch.fuel_rate()[offset] * vol;
        }
        s.cells += 1;
    });
    s
}

/// All integrated quantities of `level` restricted to `rank`'s patches.
///
/// The fuel consumption integral is only accumulated when
/// `include_flame_speed` is set.
pub fn level_sums(level: &Level, rank: Rank, include_flame_speed: bool) -> LevelSums {
    local_patches(level, rank)
        .par_iter()
        .map(|patch| patch_sums(level, patch, include_flame_speed))
        .reduce(LevelSums::identity, LevelSums::combine)
}
