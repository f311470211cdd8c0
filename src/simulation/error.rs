use thiserror::Error;

use crate::analysis::HealthReport;
use crate::config::ConfigError;
use crate::io::{CheckpointError, VizError};
use crate::state::SimulationState;

/// A failed health check and the state it was detected on.
#[derive(Debug, Clone)]
pub struct HealthFailure {
    pub step: u64,
    pub time: f64,
    pub report: HealthReport,
    /// Last state that entered the failed step
    pub last_state: SimulationState,
}

/// Error type of a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("health check failed at step {} (t = {:e}): {}", .0.step, .0.time, .0.report)]
    Health(Box<HealthFailure>),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error(transparent)]
    Visualization(#[from] VizError),

    #[error("run ended at t = {reached:e}, {expected:e} expected within {tolerance:e}")]
    FinalTimeMismatch {
        reached: f64,
        expected: f64,
        tolerance: f64,
    },
}

impl SimulationError {
    pub fn health_failure(&self) -> Option<&HealthFailure> {
        match self {
            SimulationError::Health(failure) => Some(failure),
            _ => None,
        }
    }
}
