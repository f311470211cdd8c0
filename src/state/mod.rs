//! Simulation state containers.
//!
//! - [`ConservedFields`]: mass, momentum, energy and species densities
//! - [`SimulationState`]: conserved fields plus the temperature seed; the
//!   quantity advanced by the integrators
//! - [`FluidState`]: conserved fields with the derived thermodynamic and
//!   transport fields
//! - [`Materialize`]: forcing deferred evaluation before I/O and checks

mod conserved;
mod fluid;
mod materialize;

pub use conserved::{ConservedFields, SimulationState};
pub use fluid::FluidState;
pub use materialize::Materialize;
