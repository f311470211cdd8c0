//! # dg-march
//!
//! Time-advancement control for distributed discontinuous Galerkin flow
//! simulations.
//!
//! This crate drives a partitioned, time-stepped simulation to its final
//! time:
//! - Stable step selection (constant CFL or constant dt)
//! - Composition of additive physics terms into one right-hand side
//!   (base operator, chemistry, artificial viscosity, sponge, ignition,
//!   species limiting)
//! - Distributed health checks with fail-fast semantics
//! - Checkpoint/restart with polynomial order projection
//!
//! The spatial operator and the gas model are supplied by the caller
//! through [`physics::SpatialOperator`] and [`physics::GasModel`]; an
//! [`physics::IdealGasModel`] is provided as a reference gas.

pub mod analysis;
pub mod basis;
pub mod comm;
pub mod config;
pub mod io;
pub mod mesh;
pub mod physics;
pub mod simulation;
pub mod solver;
pub mod source;
pub mod state;
pub mod time;
pub mod types;

// Re-export main types for convenience
pub use analysis::{HealthMonitor, HealthReport, RunSummary};
pub use comm::{Communicator, LocalCluster, SerialCommunicator};
pub use config::{ConfigError, OptionMap, OptionValue, SimulationConfig};
pub use io::{CheckpointManager, RestartRecord, VisualizationSink};
pub use mesh::{Discretization, MeshPartition};
pub use physics::{GasModel, IdealGasModel, OrderConversion, SpatialOperator};
pub use simulation::{Controller, SimulationError, StepContext};
pub use solver::{PhysicsTermSet, RhsComposer};
pub use state::{ConservedFields, FluidState, SimulationState};
pub use time::{StandardIntegrator, TimestepEstimator};
pub use types::{ElementIndex, RankIndex, ValueRange};
