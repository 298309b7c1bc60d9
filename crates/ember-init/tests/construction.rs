//! Integration tests: problem startup through hierarchy fill.

use std::sync::Arc;

use ember_core::{
    AuxIndex, ConstructionError, LinearProfile, ProfileInterpolator, ThermodynamicClosure,
};
use ember_init::{ConfigError, Problem, ProblemConfig, StateConstructor};
use ember_mesh::Hierarchy;
use ember_test_utils::fixtures::{
    flat_two_species_profile, onion_profile, reference_network, two_level_hierarchy,
    two_species_network, uniform_hierarchy,
};
use ember_test_utils::{ConstantProfile, FailingEos, GammaLawEos, StubNse};
use proptest::prelude::*;
use smallvec::smallvec;

fn onion() -> Arc<LinearProfile> {
    Arc::new(LinearProfile::new(onion_profile(128, 2.0).unwrap()))
}

fn explicit_constructor(config: &ProblemConfig) -> StateConstructor {
    let h = uniform_hierarchy(8, 4, 6, 1).unwrap();
    let problem = Problem::initialize(config, h.geometry(), reference_network(), None).unwrap();
    problem
        .constructor(onion(), Arc::new(GammaLawEos::default()))
        .unwrap()
}

fn for_each_cell(h: &Hierarchy, mut f: impl FnMut([f64; 3], &ember_core::CellState)) {
    for level in h.levels() {
        for patch in level.patches() {
            for (offset, cell) in patch.cells().iter().enumerate() {
                f(level.cell_center(patch.bx().index_at(offset)), cell);
            }
        }
    }
}

#[test]
fn filled_cells_satisfy_construction_invariants() {
    let c = explicit_constructor(&ProblemConfig::default());
    let mut h = two_level_hierarchy(8, 4, 6, 2).unwrap();
    c.fill_hierarchy(&mut h).unwrap();

    let mut seen = 0;
    for_each_cell(&h, |_, cell| {
        seen += 1;
        assert!(cell.rho > 0.0);
        assert!((cell.species_density_sum() - cell.rho).abs() < 1e-12 * cell.rho);
        assert_eq!(cell.momentum, [0.0; 3]);
        assert_eq!(cell.rho_etot, cell.rho_eint);
        assert!(cell.rho_eint.is_finite() && cell.rho_eint > 0.0);
    });
    assert_eq!(seen, 512 + 512);
}

#[test]
fn parallel_fill_matches_pointwise_construction() {
    let c = explicit_constructor(&ProblemConfig::default());
    let mut h = uniform_hierarchy(8, 2, 6, 3).unwrap();
    c.fill_hierarchy(&mut h).unwrap();
    for_each_cell(&h, |pos, cell| {
        assert_eq!(*cell, c.construct_cell(pos).unwrap());
    });
}

#[test]
fn explicit_aux_follows_network_formula() {
    let c = explicit_constructor(&ProblemConfig::default());
    let network = reference_network();
    let cell = c.construct_cell([0.3, -0.2, 0.6]).unwrap();
    let xn: Vec<f64> = cell.rho_x.iter().map(|rx| rx / cell.rho).collect();
    let aux = network.aux_from_mass_fractions(&xn);
    assert!((cell.aux(AuxIndex::Ye).unwrap() - aux.ye).abs() < 1e-12);
    assert!((cell.aux(AuxIndex::Abar).unwrap() - aux.abar).abs() < 1e-10);
    assert!((cell.aux(AuxIndex::BindingEnergy).unwrap() - aux.binding_energy).abs() < 1e-12);
}

#[test]
fn nse_cells_keep_profile_ye() {
    let mut h = uniform_hierarchy(8, 8, 6, 1).unwrap();
    let nse = Arc::new(StubNse::new(
        3.0e9,
        56.0,
        8.643,
        smallvec![0.0, 0.0, 0.0, 0.0, 0.1, 0.9],
    ));
    let problem = Problem::initialize(
        &ProblemConfig::default(),
        h.geometry(),
        reference_network(),
        Some(nse),
    )
    .unwrap();
    assert_eq!(problem.composition().name(), "nse");
    let profile = onion();
    let c = problem
        .constructor(profile.clone(), Arc::new(GammaLawEos::default()))
        .unwrap();
    c.fill_hierarchy(&mut h).unwrap();

    let center = c.params().center;
    let (mut hot, mut cold) = (0, 0);
    for_each_cell(&h, |pos, cell| {
        let r = (0..3).map(|d| (pos[d] - center[d]).powi(2)).sum::<f64>().sqrt();
        let sample = profile.sample(r).unwrap();
        if sample.temperature > 3.0e9 {
            hot += 1;
            assert!((cell.aux(AuxIndex::Ye).unwrap() - sample.ye).abs() < 1e-12);
            assert!((cell.aux(AuxIndex::Abar).unwrap() - 56.0).abs() < 1e-9);
            let x_ni = cell.mass_fraction(5).unwrap();
            assert!((x_ni - 0.9 / (1.0 + 4.0e-10)).abs() < 1e-9);
        } else {
            cold += 1;
            assert!(cell.aux(AuxIndex::Abar).unwrap() < 56.0);
        }
    });
    assert!(hot > 0 && cold > 0, "hot = {hot}, cold = {cold}");
}

#[test]
fn perturbation_is_masked_by_tracer() {
    let config = ProblemConfig {
        perturb_model: true,
        velpert_amplitude: 1.0e2,
        velpert_scale: 1.0,
        ..ProblemConfig::default()
    };
    let h = uniform_hierarchy(4, 4, 2, 1).unwrap();
    let problem = Problem::initialize(&config, h.geometry(), two_species_network(), None).unwrap();

    let without_si = problem
        .constructor(
            Arc::new(LinearProfile::new(flat_two_species_profile(1.0e6, 1.0e9, 0.0).unwrap())),
            Arc::new(GammaLawEos::default()),
        )
        .unwrap();
    let cell = without_si.construct_cell([0.1, 0.2, 0.3]).unwrap();
    // X_Si28 is floored to small_x, so the momentum is tiny but not zero
    assert!(cell.momentum.iter().all(|m| m.abs() < 1.0e-1));

    let with_si = problem
        .constructor(
            Arc::new(LinearProfile::new(flat_two_species_profile(1.0e6, 1.0e9, 0.5).unwrap())),
            Arc::new(GammaLawEos::default()),
        )
        .unwrap();
    let cell = with_si.construct_cell([0.1, 0.2, 0.3]).unwrap();
    let v = problem
        .params()
        .perturbation
        .as_ref()
        .unwrap()
        .field()
        .velocity([0.1, 0.2, 0.3]);
    for d in 0..3 {
        let expected = 1.0e6 * 1.0e2 * 0.5 * v[d];
        assert!((cell.momentum[d] - expected).abs() < 1e-6 * expected.abs().max(1.0));
    }
    assert_eq!(cell.rho_etot, cell.rho_eint);
}

#[test]
fn constant_profile_gives_identical_cells_everywhere() {
    let h = uniform_hierarchy(4, 4, 2, 1).unwrap();
    let problem = Problem::initialize(
        &ProblemConfig::default(),
        h.geometry(),
        two_species_network(),
        None,
    )
    .unwrap();
    let c = problem
        .constructor(
            Arc::new(LinearProfile::new(flat_two_species_profile(1.0e6, 1.0e9, 0.3).unwrap())),
            Arc::new(GammaLawEos::default()),
        )
        .unwrap();
    assert_eq!(c.params().center, [0.0; 3]);

    // centre, interior, and far beyond the last tabulated radius
    let at_center = c.construct_cell([0.0; 3]).unwrap();
    for pos in [[0.5, -0.3, 0.9], [-0.75, 0.25, 0.25], [2.0e12, 0.0, 0.0], [0.0, -5.0e12, 1.0]] {
        assert_eq!(c.construct_cell(pos).unwrap(), at_center, "at {pos:?}");
    }
    assert_eq!(at_center.rho, 1.0e6);
    assert_eq!(at_center.temperature, 1.0e9);
}

#[test]
fn eos_failure_aborts_fill() {
    let mut h = uniform_hierarchy(4, 2, 6, 1).unwrap();
    let problem = Problem::initialize(
        &ProblemConfig::default(),
        h.geometry(),
        reference_network(),
        None,
    )
    .unwrap();
    let eos: Arc<dyn ThermodynamicClosure> = Arc::new(FailingEos);
    let c = problem.constructor(onion(), eos).unwrap();
    assert!(matches!(
        c.fill_hierarchy(&mut h),
        Err(ConstructionError::Closure(_))
    ));
}

#[test]
fn profile_species_count_is_checked_at_bind() {
    let h = uniform_hierarchy(4, 4, 2, 1).unwrap();
    let problem = Problem::initialize(
        &ProblemConfig::default(),
        h.geometry(),
        two_species_network(),
        None,
    )
    .unwrap();
    let err = problem
        .constructor(onion(), Arc::new(GammaLawEos::default()))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::SpeciesCountMismatch {
            network: 2,
            profile: 6
        }
    );
}

proptest! {
    #[test]
    fn species_densities_always_sum_to_density(
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
        rho in 1.0e3f64..1.0e9,
    ) {
        let h = uniform_hierarchy(2, 2, 2, 1).unwrap();
        let problem = Problem::initialize(
            &ProblemConfig::default(),
            h.geometry(),
            two_species_network(),
            None,
        )
        .unwrap();
        let c = problem
            .constructor(
                Arc::new(ConstantProfile::new(rho, 1.0e9, smallvec![a, b], 0.5)),
                Arc::new(GammaLawEos::default()),
            )
            .unwrap();
        let cell = c.construct_cell([0.5, 0.5, 0.5]).unwrap();
        prop_assert!((cell.species_density_sum() - rho).abs() < 1e-12 * rho);
        prop_assert!(cell.rho_x.iter().all(|&rx| rx >= 0.0));
    }
}
