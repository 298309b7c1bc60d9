//! Problem startup: validated configuration turned into immutable
//! per-run parameters.

use std::fmt;
use std::sync::Arc;

use ember_core::{Network, NseTable, ProfileInterpolator, StellarProfile, ThermodynamicClosure};
use ember_mesh::Geometry;
use log::{debug, info};

use crate::composition::{select_strategy, CompositionResolver};
use crate::config::{ConfigError, ProblemConfig};
use crate::constructor::StateConstructor;
use crate::perturbation::{Perturbation, PerturbationField};

/// Per-run parameters, fixed once startup succeeds.
#[derive(Clone, Debug, PartialEq)]
pub struct ProblemParams {
    /// Problem centre: the domain midpoint for Cartesian geometry, the
    /// origin otherwise.
    pub center: [f64; 3],
    /// Mass-fraction floor.
    pub small_x: f64,
    /// Species count of the network.
    pub n_species: usize,
    /// Velocity perturbation, if enabled.
    pub perturbation: Option<Perturbation>,
    /// Axis-0 positions of the vortex seed points.
    pub vortex_locations: Vec<f64>,
}

/// A started problem: parameters, network, and composition strategy.
pub struct Problem {
    config: ProblemConfig,
    params: ProblemParams,
    network: Network,
    composition: Arc<dyn CompositionResolver>,
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("config", &self.config)
            .field("params", &self.params)
            .field("composition", &self.composition.name())
            .finish_non_exhaustive()
    }
}

impl Problem {
    /// Validate `config` and derive the run parameters.
    ///
    /// The vortex-capacity check runs before anything else. An NSE table,
    /// when given, selects the NSE composition strategy.
    pub fn initialize(
        config: &ProblemConfig,
        geometry: &Geometry,
        network: Network,
        nse: Option<Arc<dyn NseTable>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if network.is_empty() {
            return Err(ConfigError::EmptyNetwork);
        }

        let center = geometry.center();
        let vortex_locations = vortex_locations(geometry, config.num_vortices);

        let perturbation = if config.perturb_model {
            let tracer = network.index_of(&config.tracer_species).ok_or_else(|| {
                ConfigError::UnknownTracerSpecies {
                    name: config.tracer_species.clone(),
                }
            })?;
            Some(Perturbation::new(
                PerturbationField::new(config.velpert_scale),
                config.velpert_amplitude,
                tracer,
            ))
        } else {
            None
        };

        let composition = select_strategy(&network, nse, config.small_x);

        info!(
            "problem '{}': center = {:?}, {} species, composition = {}",
            config.model_name,
            center,
            network.len(),
            composition.name()
        );
        info!("vortex seeds at x = {vortex_locations:?}");
        if let Some(p) = &perturbation {
            info!(
                "velocity perturbation on: amplitude = {}, scale = {}, tracer = {}",
                p.amplitude(),
                p.field().scale(),
                config.tracer_species
            );
        }

        Ok(Self {
            config: config.clone(),
            params: ProblemParams {
                center,
                small_x: config.small_x,
                n_species: network.len(),
                perturbation,
                vortex_locations,
            },
            network,
            composition,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &ProblemConfig {
        &self.config
    }

    /// The derived run parameters.
    pub fn params(&self) -> &ProblemParams {
        &self.params
    }

    /// The species network.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// The composition strategy selected at startup.
    pub fn composition(&self) -> &Arc<dyn CompositionResolver> {
        &self.composition
    }

    /// Bind a profile and an equation of state into a constructor.
    pub fn constructor(
        &self,
        profile: Arc<dyn ProfileInterpolator>,
        eos: Arc<dyn ThermodynamicClosure>,
    ) -> Result<StateConstructor, ConfigError> {
        if profile.species_count() != self.network.len() {
            return Err(ConfigError::SpeciesCountMismatch {
                network: self.network.len(),
                profile: profile.species_count(),
            });
        }
        Ok(StateConstructor::new(
            self.params.clone(),
            profile,
            eos,
            Arc::clone(&self.composition),
        ))
    }
}

/// `(i + 0.5) · (prob_hi.x − prob_lo.x) / n + prob_lo.x` for `i < n`.
fn vortex_locations(geometry: &Geometry, num_vortices: usize) -> Vec<f64> {
    if num_vortices == 0 {
        return Vec::new();
    }
    let lo = geometry.prob_lo()[0];
    let offset = (geometry.prob_hi()[0] - lo) / num_vortices as f64;
    (0..num_vortices)
        .map(|i| (i as f64 + 0.5) * offset + lo)
        .collect()
}

/// Write the radius and density of every profile point at debug level.
pub fn dump_profile(profile: &StellarProfile) {
    debug!("model '{}' ({} points)", profile.name(), profile.len());
    for (i, p) in profile.points().iter().enumerate() {
        debug!("{i} {} {}", p.radius, p.density);
    }
}
