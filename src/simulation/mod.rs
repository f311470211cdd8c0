//! Time-advancement control loop.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dg_march::comm::SerialCommunicator;
//! use dg_march::io::{CheckpointManager, NullSink};
//! use dg_march::simulation::{Controller, StepContext};
//! use dg_march::solver::RhsComposer;
//!
//! let rhs = RhsComposer::new(&config, gas, operator, disc, &reference);
//! let checkpoints = CheckpointManager::from_config(&config, comm.rank());
//! let mut controller = Controller::new(config, rhs, checkpoints, NullSink, SerialCommunicator);
//! let summary = controller.run(&mut state, StepContext::new(0, 0.0))?;
//! ```

mod controller;
mod error;

pub use controller::{Controller, StepContext, check_step};
pub use error::{HealthFailure, SimulationError};
