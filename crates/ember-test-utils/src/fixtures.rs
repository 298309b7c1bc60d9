//! Reusable networks, profiles, and hierarchies.
//!
//! - [`reference_network`]: six-species massive-star network.
//! - [`two_species_network`]: C12 + Si28, the smallest network a
//!   perturbed run accepts.
//! - [`onion_profile`]: layered stellar model with Ni56 core and He
//!   envelope.
//! - [`uniform_hierarchy`] and [`two_level_hierarchy`]: Cartesian cubes.
//! - [`randomize`]: fills a hierarchy with reproducible random states.

use ember_core::{CellState, Network, ProfileError, ProfilePoint, Species, StellarProfile};
use ember_mesh::{CoordSystem, Geometry, GridBox, Hierarchy, MeshError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smallvec::smallvec;

/// He4, C12, O16, Ne20, Si28, Ni56.
pub fn reference_network() -> Network {
    Network::new(vec![
        Species::new("He4", 4.0, 2.0, 7.074),
        Species::new("C12", 12.0, 6.0, 7.680),
        Species::new("O16", 16.0, 8.0, 7.976),
        Species::new("Ne20", 20.0, 10.0, 8.032),
        Species::new("Si28", 28.0, 14.0, 8.448),
        Species::new("Ni56", 56.0, 28.0, 8.643),
    ])
}

/// C12 and Si28.
pub fn two_species_network() -> Network {
    Network::new(vec![
        Species::new("C12", 12.0, 6.0, 7.680),
        Species::new("Si28", 28.0, 14.0, 8.448),
    ])
}

/// A layered model over [`reference_network`] out to `r_max`.
///
/// Density and temperature fall off exponentially. The composition moves
/// from Ni56 through Si28 and O16 to He4 with radius. Mass fractions at
/// each point sum to one.
pub fn onion_profile(n_points: usize, r_max: f64) -> Result<StellarProfile, ProfileError> {
    let n = n_points.max(2);
    let points = (0..n)
        .map(|i| {
            let s = i as f64 / (n - 1) as f64;
            let w = |center: f64| (-((s - center) / 0.15).powi(2)).exp();
            let raw = [w(1.0), 0.2 * w(0.7), w(0.55), 0.3 * w(0.45), w(0.3), w(0.0)];
            let total: f64 = raw.iter().sum();
            ProfilePoint {
                radius: s * r_max,
                density: 1.0e9 * (-5.0 * s).exp(),
                temperature: 6.0e9 * (-3.0 * s).exp(),
                xn: raw.iter().map(|x| x / total).collect(),
                ye: 0.5 - 0.04 * (-((s / 0.1).powi(2))).exp(),
            }
        })
        .collect();
    StellarProfile::new("onion", points)
}

/// Two-point profile over [`two_species_network`], constant in radius.
pub fn flat_two_species_profile(
    density: f64,
    temperature: f64,
    x_si: f64,
) -> Result<StellarProfile, ProfileError> {
    let point = |radius: f64| ProfilePoint {
        radius,
        density,
        temperature,
        xn: smallvec![1.0 - x_si, x_si],
        ye: 0.5,
    };
    StellarProfile::new("flat", vec![point(0.0), point(1.0e12)])
}

/// Cartesian cube `[-half_width, half_width]³` with `n` coarse cells per axis.
pub fn cube(n: u32, half_width: f64) -> Result<Geometry, MeshError> {
    Geometry::new(
        [-half_width; 3],
        [half_width; 3],
        [n; 3],
        CoordSystem::Cartesian,
    )
}

/// Single level over [`cube`] chopped into `max_grid_size` boxes.
pub fn uniform_hierarchy(
    n: u32,
    max_grid_size: u32,
    n_species: usize,
    n_ranks: usize,
) -> Result<Hierarchy, MeshError> {
    Hierarchy::uniform(cube(n, 1.0)?, max_grid_size, n_species, n_ranks)
}

/// [`uniform_hierarchy`] plus a ratio-2 level over the central half of
/// the domain.
pub fn two_level_hierarchy(
    n: u32,
    max_grid_size: u32,
    n_species: usize,
    n_ranks: usize,
) -> Result<Hierarchy, MeshError> {
    let mut h = uniform_hierarchy(n, max_grid_size, n_species, n_ranks)?;
    let quarter = (n / 2) as i32;
    let region = GridBox::new([quarter; 3], [3 * quarter - 1; 3])?;
    h.push_refined(2, region, max_grid_size, n_species, n_ranks)?;
    h.mark_covered();
    Ok(h)
}

/// Fill every cell and fuel rate of `h` with seeded random values.
///
/// Densities lie in `[1, 2)`, momenta in `[-1, 1)`, temperatures in
/// `[1e8, 5e9)`. Species densities sum to the density.
pub fn randomize(h: &mut Hierarchy, seed: u64) -> Result<(), MeshError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for level in h.levels_mut() {
        for patch in level.patches_mut() {
            for cell in patch.cells_mut() {
                *cell = random_cell(&mut rng, cell.rho_x.len());
            }
            let rate = (0..patch.cells().len())
                .map(|_| rng.random_range(-1.0..0.0))
                .collect();
            patch.set_fuel_rate(rate)?;
        }
    }
    Ok(())
}

fn random_cell(rng: &mut ChaCha8Rng, n_species: usize) -> CellState {
    let rho = rng.random_range(1.0..2.0);
    let momentum = [(); 3].map(|_| rng.random_range(-1.0..1.0));
    let raw: Vec<f64> = (0..n_species).map(|_| rng.random_range(0.1..1.0)).collect();
    let total: f64 = raw.iter().sum();
    let rho_eint = rho * rng.random_range(1.0e16..1.0e17);
    let mut cell = CellState {
        rho,
        momentum,
        rho_eint,
        temperature: rng.random_range(1.0e8..5.0e9),
        rho_x: raw.iter().map(|x| rho * x / total).collect(),
        ..CellState::default()
    };
    cell.rho_etot = rho_eint + cell.kinetic_energy_density();
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onion_fractions_sum_to_one() {
        let p = onion_profile(64, 1.0e10).unwrap();
        for pt in p.points() {
            assert!((pt.xn.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
        assert_eq!(p.species_count(), reference_network().len());
    }

    #[test]
    fn randomize_is_reproducible() {
        let mut a = uniform_hierarchy(8, 4, 3, 2).unwrap();
        let mut b = uniform_hierarchy(8, 4, 3, 2).unwrap();
        randomize(&mut a, 7).unwrap();
        randomize(&mut b, 7).unwrap();
        assert_eq!(a.levels()[0].patches(), b.levels()[0].patches());
    }

    #[test]
    fn random_cells_conserve_species_mass() {
        let mut h = uniform_hierarchy(4, 4, 4, 1).unwrap();
        randomize(&mut h, 1).unwrap();
        for cell in h.levels()[0].patches()[0].cells() {
            assert!((cell.species_density_sum() - cell.rho).abs() < 1e-12);
        }
    }

    #[test]
    fn two_level_marks_central_cells() {
        let h = two_level_hierarchy(8, 8, 1, 1).unwrap();
        let covered = h.levels()[0].patches()[0]
            .covered()
            .iter()
            .filter(|c| **c)
            .count();
        // central half of the domain on each axis: 4³ coarse cells
        assert_eq!(covered, 64);
        assert_eq!(h.levels()[1].cell_count(), 512);
    }
}
