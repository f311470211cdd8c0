use thiserror::Error;

/// Invalid configuration, detected before the time loop.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown integrator '{0}'; expected one of rk4, euler, lsrk54, lsrk144, compiled_lsrk54")]
    UnknownIntegrator(String),

    #[error("Unknown inviscid numerical flux '{0}'; expected rusanov or hll")]
    UnknownFluxFunction(String),

    #[error("Invalid artificial viscosity variant {0}; expected 0, 1, 2 or 3")]
    InvalidArtificialViscosity(i64),

    #[error("Unknown transport model {0}; expected 0, 1 or 2")]
    InvalidTransport(i64),

    #[error("Option '{key}' has the wrong type; expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}
