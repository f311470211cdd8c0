//! Run configuration.
//!
//! The controller receives an already-resolved flat option set
//! ([`OptionMap`]); [`SimulationConfig::from_options`] validates it into a
//! typed configuration. Missing keys keep their defaults; unknown selector
//! values are fatal before the time loop starts.

mod error;
mod options;
mod selectors;
mod simulation;

pub use error::ConfigError;
pub use options::{OptionMap, OptionValue};
pub use selectors::{ArtificialViscosity, FluxFunction, IntegratorKind, TimestepMode, TransportKind};
pub use simulation::{
    HealthBounds, IgnitionParams, OutputIntervals, ShockCapturingParams, SimulationConfig,
    SpongeParams, TransportParams,
};
