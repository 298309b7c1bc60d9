//! Per-cell initial-state construction.
//!
//! [`StateConstructor::construct_cell`] is a pure function of the cell
//! centre and the immutable [`ProblemParams`]; the fill methods run it in
//! parallel over every cell of a patch, level, or hierarchy.

use std::fmt;
use std::sync::Arc;

use ember_core::{
    CellState, ConstructionError, EosState, ProfileInterpolator, ThermodynamicClosure,
};
use ember_mesh::{Hierarchy, Level, LevelFrame, Patch};
use log::debug;
use rayon::prelude::*;

use crate::composition::{apply_floor, normalize, CompositionResolver};
use crate::problem::ProblemParams;

/// Builds thermodynamically consistent cell states from a stellar profile.
///
/// All collaborators are shared read-only, so one constructor serves
/// every worker thread.
pub struct StateConstructor {
    params: ProblemParams,
    profile: Arc<dyn ProfileInterpolator>,
    eos: Arc<dyn ThermodynamicClosure>,
    composition: Arc<dyn CompositionResolver>,
}

impl fmt::Debug for StateConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateConstructor")
            .field("params", &self.params)
            .field("composition", &self.composition.name())
            .finish_non_exhaustive()
    }
}

impl StateConstructor {
    /// Bind the problem parameters to the physics collaborators.
    ///
    /// Prefer [`Problem::constructor`](crate::Problem::constructor),
    /// which also checks the profile's species count.
    pub fn new(
        params: ProblemParams,
        profile: Arc<dyn ProfileInterpolator>,
        eos: Arc<dyn ThermodynamicClosure>,
        composition: Arc<dyn CompositionResolver>,
    ) -> Self {
        Self {
            params,
            profile,
            eos,
            composition,
        }
    }

    /// The immutable problem parameters.
    pub fn params(&self) -> &ProblemParams {
        &self.params
    }

    /// Build the conserved state of the cell centred at absolute
    /// position `pos`.
    pub fn construct_cell(&self, pos: [f64; 3]) -> Result<CellState, ConstructionError> {
        let center = self.params.center;
        let radius = (0..3)
            .map(|d| (pos[d] - center[d]).powi(2))
            .sum::<f64>()
            .sqrt();

        let sample = self.profile.sample(radius)?;
        if sample.xn.len() != self.params.n_species {
            return Err(ConstructionError::SpeciesCountMismatch {
                expected: self.params.n_species,
                actual: sample.xn.len(),
            });
        }
        let rho = sample.density;
        let temperature = sample.temperature;

        let mut xn = sample.xn;
        apply_floor(&mut xn, self.params.small_x);
        normalize(&mut xn, radius)?;

        let resolved = self
            .composition
            .resolve(rho, temperature, sample.ye, xn, radius)?;
        let eos_state = EosState {
            rho,
            temperature,
            xn: resolved.xn,
            aux: resolved.aux,
        };
        let e = self.eos.internal_energy(&eos_state)?;
        if !e.is_finite() {
            return Err(ConstructionError::NonFiniteEnergy { energy: e, radius });
        }

        let mut cell = CellState {
            rho,
            momentum: [0.0; 3],
            rho_etot: rho * e,
            rho_eint: rho * e,
            temperature,
            rho_x: eos_state.xn.iter().map(|x| rho * x).collect(),
            rho_aux: eos_state.aux.to_array().map(|a| rho * a),
        };
        if let Some(perturbation) = &self.params.perturbation {
            perturbation.apply(&mut cell, pos);
        }
        Ok(cell)
    }

    /// Fill every cell of `patch`, covered cells included.
    pub fn fill_patch(&self, frame: LevelFrame, patch: &mut Patch) -> Result<(), ConstructionError> {
        let bx = *patch.bx();
        patch
            .cells_mut()
            .par_iter_mut()
            .enumerate()
            .try_for_each(|(offset, cell)| {
                *cell = self.construct_cell(frame.cell_center(bx.index_at(offset)))?;
                Ok(())
            })
    }

    /// Fill every patch of `level`. The first failing cell aborts the fill.
    pub fn fill_level(&self, level: &mut Level) -> Result<(), ConstructionError> {
        let frame = level.frame();
        level
            .patches_mut()
            .par_iter_mut()
            .try_for_each(|patch| self.fill_patch(frame, patch))
    }

    /// Fill every level of `hierarchy`, coarsest first.
    pub fn fill_hierarchy(&self, hierarchy: &mut Hierarchy) -> Result<(), ConstructionError> {
        for level in hierarchy.levels_mut() {
            self.fill_level(level)?;
            debug!(
                "initialized level {} ({} patches, {} cells)",
                level.id(),
                level.patches().len(),
                level.cell_count()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::ExplicitComposition;
    use crate::perturbation::{Perturbation, PerturbationField};
    use ember_core::{AuxIndex, ClosureError, Network, ProfileSample, Species};
    use smallvec::smallvec;

    struct Uniform {
        xn: [f64; 2],
    }

    impl ProfileInterpolator for Uniform {
        fn sample(&self, _radius: f64) -> Result<ProfileSample, ClosureError> {
            Ok(ProfileSample {
                density: 2.0,
                temperature: 3.0,
                xn: smallvec![self.xn[0], self.xn[1]],
                ye: 0.5,
            })
        }

        fn species_count(&self) -> usize {
            2
        }
    }

    struct LinearInT(f64);

    impl ThermodynamicClosure for LinearInT {
        fn internal_energy(&self, state: &EosState) -> Result<f64, ClosureError> {
            Ok(self.0 * state.temperature)
        }
    }

    fn network() -> Network {
        Network::new(vec![
            Species::new("C12", 12.0, 6.0, 7.68),
            Species::new("Si28", 28.0, 14.0, 8.45),
        ])
    }

    fn params(perturbation: Option<Perturbation>) -> ProblemParams {
        ProblemParams {
            center: [0.0; 3],
            small_x: 1.0e-10,
            n_species: 2,
            perturbation,
            vortex_locations: vec![0.0],
        }
    }

    fn constructor(xn: [f64; 2], eos: f64, perturbation: Option<Perturbation>) -> StateConstructor {
        StateConstructor::new(
            params(perturbation),
            Arc::new(Uniform { xn }),
            Arc::new(LinearInT(eos)),
            Arc::new(ExplicitComposition::new(network())),
        )
    }

    #[test]
    fn cell_from_uniform_profile() {
        let c = constructor([0.5, 0.5], 4.0, None);
        let cell = c.construct_cell([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(cell.rho, 2.0);
        assert_eq!(cell.temperature, 3.0);
        assert_eq!(cell.rho_eint, 24.0);
        assert_eq!(cell.rho_etot, 24.0);
        assert_eq!(cell.momentum, [0.0; 3]);
        assert!((cell.species_density_sum() - cell.rho).abs() < 1e-12);
        assert!((cell.aux(AuxIndex::Ye).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn unnormalised_profile_is_renormalised() {
        let c = constructor([1.0, 3.0], 1.0, None);
        let cell = c.construct_cell([0.0; 3]).unwrap();
        assert!((cell.rho_x[0] - 0.5).abs() < 1e-9);
        assert!((cell.rho_x[1] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn zero_composition_is_degenerate_when_floor_is_zero() {
        let mut p = params(None);
        p.small_x = 0.0;
        let c = StateConstructor::new(
            p,
            Arc::new(Uniform { xn: [0.0, 0.0] }),
            Arc::new(LinearInT(1.0)),
            Arc::new(ExplicitComposition::new(network())),
        );
        assert!(matches!(
            c.construct_cell([3.0, 4.0, 0.0]),
            Err(ConstructionError::DegenerateComposition { radius, .. }) if radius == 5.0
        ));
    }

    #[test]
    fn non_finite_energy_is_rejected() {
        let c = constructor([0.5, 0.5], f64::INFINITY, None);
        assert!(matches!(
            c.construct_cell([0.0; 3]),
            Err(ConstructionError::NonFiniteEnergy { .. })
        ));
    }

    #[test]
    fn perturbation_adds_momentum_but_not_energy() {
        let field = PerturbationField::new(1.0);
        let pos = [0.1, 0.2, 0.3];
        let v = field.velocity(pos);
        let c = constructor([0.5, 0.5], 4.0, Some(Perturbation::new(field, 10.0, 1)));
        let cell = c.construct_cell(pos).unwrap();
        for d in 0..3 {
            // ρ · amplitude · X_Si28 · v = 2 · 10 · 0.5 · v
            assert!((cell.momentum[d] - 10.0 * v[d]).abs() < 1e-9);
        }
        assert_eq!(cell.rho_etot, cell.rho_eint);
    }
}
