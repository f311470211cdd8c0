//! Time integration and step size selection.

mod estimator;
pub mod integrator;

pub use estimator::{TimestepEstimate, TimestepEstimator, TimestepField, stable_timestep_field};
pub use integrator::{
    ClassicalRK4, ForwardEuler, Integrable, IntegratorInfo, LowStorageRK, StandardIntegrator,
    TimeIntegrator,
};
