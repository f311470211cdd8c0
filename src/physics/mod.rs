//! Physics collaborators of the time loop.
//!
//! The loop never discretizes anything itself. It talks to:
//! - a [`GasModel`]: equation of state, transport and chemistry
//! - a [`SpatialOperator`]: fluxes, gradients and dissipation, with the
//!   boundary conditions owned by the operator
//! - an [`OrderConversion`]: moving fields between polynomial orders
//!
//! [`IdealGasModel`] and [`ModalProjection`] are reference implementations
//! that make the loop runnable without external kernels.

mod ideal_gas;
mod projection;
pub mod traits;

pub use ideal_gas::{IdealGasModel, TransportModel};
pub use projection::ModalProjection;
pub use traits::{ConservedGradient, GasModel, OrderConversion, SpatialOperator};
