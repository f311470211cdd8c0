//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use dg_march::config::{
    IgnitionParams, OutputIntervals, SimulationConfig, SpongeParams, TimestepMode,
};
use dg_march::physics::{ConservedGradient, GasModel, IdealGasModel, SpatialOperator};
use dg_march::{ConservedFields, Discretization, FluidState, MeshPartition, RhsComposer, SimulationState};

/// Operator with no spatial coupling.
pub struct ZeroOperator;

impl SpatialOperator for ZeroOperator {
    fn name(&self) -> &'static str {
        "zero"
    }

    fn tendency(&self, fluid: &FluidState, _time: f64) -> ConservedFields {
        fluid.cv.zeros_like()
    }

    fn gradient(&self, fluid: &FluidState, _time: f64) -> ConservedGradient {
        ConservedGradient::zeros(&fluid.cv)
    }

    fn dissipation(&self, fluid: &FluidState, _coefficient: &[f64], _time: f64) -> ConservedFields {
        fluid.cv.zeros_like()
    }
}

/// Operator that turns the mass tendency into NaN once `time > after`.
pub struct PoisonOperator {
    pub after: f64,
}

impl SpatialOperator for PoisonOperator {
    fn name(&self) -> &'static str {
        "poison"
    }

    fn tendency(&self, fluid: &FluidState, time: f64) -> ConservedFields {
        let mut out = fluid.cv.zeros_like();
        if time > self.after {
            out.mass = vec![f64::NAN; fluid.n_nodes()];
        }
        out
    }

    fn gradient(&self, fluid: &FluidState, _time: f64) -> ConservedGradient {
        ConservedGradient::zeros(&fluid.cv)
    }

    fn dissipation(&self, fluid: &FluidState, _coefficient: &[f64], _time: f64) -> ConservedFields {
        fluid.cv.zeros_like()
    }
}

/// Two-dimensional, order 1 run with only the base operator:
/// dt = 1e-8 to t = 1e-7.
pub fn base_config(restart_dir: &Path) -> SimulationConfig {
    let dim = 2;
    SimulationConfig::default()
        .with_casename("test")
        .with_restart_dir(restart_dir)
        .with_dim(dim)
        .with_order(1)
        .with_nspecies(0)
        .with_timestep(TimestepMode::ConstantDt { dt: 1.0e-8 })
        .with_t_final(1.0e-7)
        .with_intervals(OutputIntervals {
            nviz: 5,
            nrestart: 0,
            nhealth: 1,
            nstatus: 1,
            nlimit: 0,
        })
        .with_sponge(SpongeParams {
            enabled: false,
            ..SpongeParams::default()
        })
        .with_ignition(IgnitionParams {
            enabled: false,
            ..IgnitionParams::for_dim(dim)
        })
}

pub fn unit_mesh() -> MeshPartition {
    MeshPartition::uniform_box(&[0.0, 0.0], &[1.0, 0.5], &[4, 2])
}

pub fn gas(config: &SimulationConfig) -> Arc<IdealGasModel> {
    Arc::new(IdealGasModel::from_config(config).expect("simple transport"))
}

/// Air at rest-ish: p = 1 atm, T = 300 K, velocity (10, 0, ..),
/// density perturbed linearly in x.
pub fn air_state(gas: &dyn GasModel, disc: &Discretization, nspecies: usize) -> SimulationState {
    let n = disc.n_dofs();
    let dim = disc.dim();
    let mut cv = ConservedFields::zeros(dim, nspecies, n);
    let y: Vec<f64> = vec![1.0 / nspecies.max(1) as f64; nspecies];
    let mut temperature = vec![0.0; n];

    for i in 0..n {
        let x = disc.coords[0][i];
        let rho = gas.density(101_325.0, 300.0, &y) * (1.0 + 0.1 * x);
        let t = 101_325.0 / (rho * gas.gas_constant(&y));
        let u = 10.0;
        cv.mass[i] = rho;
        cv.momentum[0][i] = rho * u;
        cv.energy[i] = rho * (gas.internal_energy(t, &y) + 0.5 * u * u);
        for s in 0..nspecies {
            cv.species_mass[s][i] = rho * y[s];
        }
        temperature[i] = t;
    }

    SimulationState::new(cv, temperature)
}

/// Composer and initial state on [`unit_mesh`].
pub fn setup(
    config: &SimulationConfig,
    operator: Arc<dyn SpatialOperator>,
) -> (RhsComposer, SimulationState) {
    let gas = gas(config);
    let disc = Arc::new(Discretization::new(unit_mesh(), config.order));
    let state = air_state(gas.as_ref(), &disc, config.nspecies);
    let rhs = RhsComposer::new(config, gas, operator, disc, &state.cv);
    (rhs, state)
}
