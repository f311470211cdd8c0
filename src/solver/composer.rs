//! Composition of the full right-hand side.
//!
//! One evaluation:
//! 1. limit species mass fractions (when enabled), giving the state the
//!    rest of the evaluation sees and a relaxation source
//! 2. resolve the fluid state through the shock capturing strategy
//! 3. temperature seed tendency `T - T_seed`
//! 4. base operator + artificial viscosity + chemistry + sponge + ignition
//!    + limiter source

use std::sync::Arc;

use tracing::debug;

use crate::config::{ArtificialViscosity, SimulationConfig};
use crate::mesh::Discretization;
use crate::physics::{ConservedGradient, GasModel, SpatialOperator};
use crate::source::{
    ChemistrySource, CombinedTerms, ShockCapturing, SparkIgnition, SpeciesLimiter, SpongeProfile,
    SpongeRelaxation, TermContext, shock_capturing_for,
};
use crate::state::{ConservedFields, FluidState, SimulationState};

/// Which right-hand-side terms are active. Fixed at setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicsTermSet {
    pub chemistry: bool,
    pub artificial_viscosity: ArtificialViscosity,
    pub sponge: bool,
    pub ignition: bool,
    pub species_limiter: bool,
}

impl PhysicsTermSet {
    /// Terms selected by `config`, after gating on the species count.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            chemistry: config.combustion_enabled(),
            artificial_viscosity: config.shock_capturing.variant,
            sponge: config.sponge.enabled,
            ignition: config.ignition.enabled,
            species_limiter: config.species_limit_rate().is_some(),
        }
    }

    /// Only the base operator.
    pub fn base_only() -> Self {
        Self {
            chemistry: false,
            artificial_viscosity: ArtificialViscosity::Off,
            sponge: false,
            ignition: false,
            species_limiter: false,
        }
    }
}

/// Fluid state prepared for one evaluation or for the pre-step actions.
#[derive(Clone, Debug)]
pub struct PreparedState {
    /// Fluid state of the (possibly limited) conserved fields
    pub fluid: FluidState,
    /// Conserved gradient, when the shock capturing strategy computed it
    pub gradient: Option<ConservedGradient>,
    /// Species limiter relaxation source, when limiting is active
    pub limiter_source: Option<ConservedFields>,
}

/// Builds the additive tendency of the integrated state.
pub struct RhsComposer {
    terms: PhysicsTermSet,
    gas: Arc<dyn GasModel>,
    operator: Arc<dyn SpatialOperator>,
    discretization: Arc<Discretization>,
    shock_capturing: Box<dyn ShockCapturing>,
    sources: CombinedTerms,
    limiter: Option<SpeciesLimiter>,
    sponge_sigma: Option<Vec<f64>>,
}

impl RhsComposer {
    /// Build the composer for `config`.
    ///
    /// `reference` is the state the sponge relaxes toward; it is only read
    /// when the sponge is enabled.
    pub fn new(
        config: &SimulationConfig,
        gas: Arc<dyn GasModel>,
        operator: Arc<dyn SpatialOperator>,
        discretization: Arc<Discretization>,
        reference: &ConservedFields,
    ) -> Self {
        let terms = PhysicsTermSet::from_config(config);
        let shock_capturing = shock_capturing_for(
            config,
            Arc::clone(&gas),
            Arc::clone(&operator),
            Arc::clone(&discretization),
        );

        let mut sources = CombinedTerms::new();
        if terms.chemistry {
            sources.add(Box::new(ChemistrySource::new(Arc::clone(&gas))));
        }
        let mut sponge_sigma = None;
        if terms.sponge {
            let profile = SpongeProfile::from_params(&config.sponge, config.dt);
            let sponge = SpongeRelaxation::new(profile, &discretization.coords[0], reference.clone());
            sponge_sigma = Some(sponge.sigma().to_vec());
            sources.add(Box::new(sponge));
        }
        if terms.ignition {
            sources.add(Box::new(SparkIgnition::from_params(&config.ignition, config.dt)));
        }

        let limiter = config
            .species_limit_rate()
            .map(|rate| SpeciesLimiter::new(rate, Arc::clone(&gas)));

        debug!(
            operator = operator.name(),
            gas = gas.name(),
            shock_capturing = %terms.artificial_viscosity,
            sources = ?sources.names(),
            limiter = limiter.is_some(),
            "Composed right-hand side"
        );

        Self {
            terms,
            gas,
            operator,
            discretization,
            shock_capturing,
            sources,
            limiter,
            sponge_sigma,
        }
    }

    pub fn terms(&self) -> PhysicsTermSet {
        self.terms
    }

    pub fn gas(&self) -> &dyn GasModel {
        self.gas.as_ref()
    }

    pub fn operator(&self) -> &dyn SpatialOperator {
        self.operator.as_ref()
    }

    pub fn discretization(&self) -> &Discretization {
        &self.discretization
    }

    pub fn shock_capturing(&self) -> &dyn ShockCapturing {
        self.shock_capturing.as_ref()
    }

    /// Sponge strength per node, when the sponge is active.
    pub fn sponge_sigma(&self) -> Option<&[f64]> {
        self.sponge_sigma.as_deref()
    }

    /// Limit species and resolve the fluid state.
    pub fn prepare(
        &self,
        state: &SimulationState,
        cached_gradient: Option<&ConservedGradient>,
        time: f64,
    ) -> PreparedState {
        let seed = &state.temperature_seed;
        let (cv, limiter_source) = match &self.limiter {
            Some(limiter) => {
                let raw = self.gas.fluid_state(&state.cv, seed, None);
                let limited = limiter.apply(&raw);
                (limited.cv, Some(limited.source))
            }
            None => (state.cv.clone(), None),
        };

        let resolved = self.shock_capturing.resolve(&cv, seed, cached_gradient, time);
        PreparedState {
            fluid: resolved.fluid,
            gradient: resolved.gradient,
            limiter_source,
        }
    }

    /// Fluid state of `state` as the right-hand side sees it.
    pub fn fluid_state(&self, state: &SimulationState, time: f64) -> FluidState {
        self.prepare(state, None, time).fluid
    }

    /// Tendency of the integrated state.
    pub fn evaluate(&self, state: &SimulationState, time: f64) -> SimulationState {
        self.evaluate_with_gradient(state, None, time)
    }

    /// Tendency reusing a conserved gradient the caller already holds.
    pub fn evaluate_with_gradient(
        &self,
        state: &SimulationState,
        cached_gradient: Option<&ConservedGradient>,
        time: f64,
    ) -> SimulationState {
        let prepared = self.prepare(state, cached_gradient, time);
        self.evaluate_prepared(&prepared, &state.temperature_seed, time)
    }

    /// Tendency from an already prepared state.
    pub fn evaluate_prepared(
        &self,
        prepared: &PreparedState,
        temperature_seed: &[f64],
        time: f64,
    ) -> SimulationState {
        let fluid = &prepared.fluid;

        let seed_rhs: Vec<f64> = fluid
            .temperature
            .iter()
            .zip(temperature_seed)
            .map(|(t, seed)| t - seed)
            .collect();

        let mut cv_rhs = match &prepared.gradient {
            Some(gradient) => self.operator.tendency_with_gradient(fluid, gradient, time),
            None => self.operator.tendency(fluid, time),
        };

        if let Some(av) = self.shock_capturing.tendency(fluid, time) {
            cv_rhs.add_assign(&av);
        }

        let ctx = TermContext {
            fluid,
            coords: &self.discretization.coords,
            time,
        };
        self.sources.accumulate(&ctx, &mut cv_rhs);

        if let Some(source) = &prepared.limiter_source {
            cv_rhs.add_assign(source);
        }

        SimulationState {
            cv: cv_rhs,
            temperature_seed: seed_rhs,
        }
    }

    /// Artificial dissipation rate per node for the step bound.
    pub fn dissipation_rate(&self, fluid: &FluidState) -> Vec<f64> {
        self.shock_capturing.dissipation_rate(fluid)
    }
}
