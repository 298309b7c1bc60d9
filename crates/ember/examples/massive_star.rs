//! Massive-star initial state on two ranks.
//!
//! Demonstrates:
//!   1. Building a layered stellar model and a two-level hierarchy
//!   2. Starting a perturbed problem on an in-process two-rank group
//!   3. Reporting integrated quantities at startup and on a schedule
//!
//! Run with:
//!   cargo run -p ember --example massive_star

use std::sync::Arc;
use std::thread;

use ember::prelude::*;
use ember_test_utils::fixtures::{onion_profile, reference_network};
use ember_test_utils::{GammaLawEos, StubNse};

// ─── Problem parameters ─────────────────────────────────────────

const R_MAX: f64 = 2.0e9;
const N_COARSE: u32 = 16;
const MAX_GRID: u32 = 8;
const RANKS: usize = 2;
const DT: f64 = 0.05;
const STEPS: u64 = 6;

fn hierarchy(n_species: usize) -> Result<Hierarchy, RunError> {
    let geometry = Geometry::new(
        [-R_MAX; 3],
        [R_MAX; 3],
        [N_COARSE; 3],
        CoordSystem::Cartesian,
    )?;
    let mut h = Hierarchy::uniform(geometry, MAX_GRID, n_species, RANKS)?;
    // Refine the central half of each axis.
    let q = (N_COARSE / 2) as i32;
    let region = GridBox::new([q; 3], [3 * q - 1; 3])?;
    h.push_refined(2, region, MAX_GRID, n_species, RANKS)?;
    Ok(h)
}

fn run(group: ThreadGroup) -> Result<(), RunError> {
    let network = reference_network();
    let n_species = network.len();
    let profile = LinearProfile::new(onion_profile(256, R_MAX)?);

    let mut nse_xn = vec![0.0; n_species];
    nse_xn[n_species - 1] = 1.0;
    let nse = StubNse::new(5.0e9, 56.0, 8.643, nse_xn.into_iter().collect());

    let mut config = RunConfig::default();
    config.problem.model_name = "onion".into();
    config.problem.perturb_model = true;
    config.problem.velpert_scale = R_MAX / 4.0;
    config.problem.velpert_amplitude = 1.0e7;
    config.problem.num_vortices = 4;
    config.diagnostics.sum_interval = 2;
    config.diagnostics.data_log_path = std::env::temp_dir().join("massive_star_diag.out");

    let mut sim = Simulation::initialize(
        &config,
        hierarchy(n_species)?,
        Collaborators {
            network,
            profile: Arc::new(profile),
            eos: Arc::new(GammaLawEos::default()),
            nse: Some(Arc::new(nse)),
        },
        group,
    )?;

    sim.sum_integrated_quantities()?;
    let mut time = 0.0;
    for step in 1..=STEPS {
        let prev = time;
        time += DT;
        sim.post_step(step, prev, time)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Ember massive star ===");
    let handles: Vec<_> = ThreadGroup::new(RANKS)
        .into_iter()
        .map(|g| thread::spawn(move || run(g)))
        .collect();
    for h in handles {
        h.join().map_err(|_| "rank thread panicked")??;
    }
    println!(
        "\nData log: {}",
        std::env::temp_dir().join("massive_star_diag.out").display()
    );
    Ok(())
}
