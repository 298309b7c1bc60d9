//! Benchmark setups for Ember.
//!
//! - [`reference_problem`]: six-species layered star, optionally perturbed
//! - [`reference_constructor`]: the matching [`StateConstructor`] with a
//!   gamma-law equation of state
//! - [`reference_hierarchy`]: filled two-level cube for aggregation runs

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::error::Error;
use std::sync::Arc;

use ember_core::LinearProfile;
use ember_init::{Problem, ProblemConfig, StateConstructor};
use ember_mesh::Hierarchy;
use ember_test_utils::fixtures::{cube, onion_profile, reference_network, two_level_hierarchy};
use ember_test_utils::GammaLawEos;

/// Half-width of the benchmark domain; also the profile's outer radius.
pub const HALF_WIDTH: f64 = 1.0;

/// Start the layered-star problem on an `n`³ cube.
pub fn reference_problem(n: u32, perturb: bool) -> Result<Problem, Box<dyn Error>> {
    let config = ProblemConfig {
        model_name: "onion".into(),
        perturb_model: perturb,
        velpert_scale: HALF_WIDTH / 4.0,
        velpert_amplitude: 1.0,
        ..ProblemConfig::default()
    };
    Ok(Problem::initialize(
        &config,
        &cube(n, HALF_WIDTH)?,
        reference_network(),
        None,
    )?)
}

/// A constructor for [`reference_problem`] over a 512-point profile.
pub fn reference_constructor(n: u32, perturb: bool) -> Result<StateConstructor, Box<dyn Error>> {
    let problem = reference_problem(n, perturb)?;
    let profile = LinearProfile::new(onion_profile(512, 2.0 * HALF_WIDTH)?);
    Ok(problem.constructor(Arc::new(profile), Arc::new(GammaLawEos::default()))?)
}

/// A filled, perturbed two-level hierarchy with `n`³ coarse cells split
/// over `n_ranks` ranks.
pub fn reference_hierarchy(n: u32, n_ranks: usize) -> Result<Hierarchy, Box<dyn Error>> {
    let mut h = two_level_hierarchy(n, 16, reference_network().len(), n_ranks)?;
    reference_constructor(n, true)?.fill_hierarchy(&mut h)?;
    Ok(h)
}
