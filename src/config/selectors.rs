//! Enumerated configuration choices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Time integration scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegratorKind {
    Euler,
    #[default]
    Rk4,
    Lsrk54,
    Lsrk144,
    /// Same scheme as [`IntegratorKind::Lsrk54`]; kept as a distinct
    /// selector so existing inputs stay valid.
    CompiledLsrk54,
}

impl IntegratorKind {
    pub fn name(self) -> &'static str {
        match self {
            IntegratorKind::Euler => "euler",
            IntegratorKind::Rk4 => "rk4",
            IntegratorKind::Lsrk54 => "lsrk54",
            IntegratorKind::Lsrk144 => "lsrk144",
            IntegratorKind::CompiledLsrk54 => "compiled_lsrk54",
        }
    }
}

impl FromStr for IntegratorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euler" => Ok(IntegratorKind::Euler),
            "rk4" => Ok(IntegratorKind::Rk4),
            "lsrk54" => Ok(IntegratorKind::Lsrk54),
            "lsrk144" => Ok(IntegratorKind::Lsrk144),
            "compiled_lsrk54" => Ok(IntegratorKind::CompiledLsrk54),
            other => Err(ConfigError::UnknownIntegrator(other.to_string())),
        }
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inviscid numerical flux handed to the spatial operator factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FluxFunction {
    #[default]
    Rusanov,
    Hll,
}

impl FromStr for FluxFunction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rusanov" => Ok(FluxFunction::Rusanov),
            "hll" => Ok(FluxFunction::Hll),
            other => Err(ConfigError::UnknownFluxFunction(other.to_string())),
        }
    }
}

impl fmt::Display for FluxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FluxFunction::Rusanov => write!(f, "rusanov"),
            FluxFunction::Hll => write!(f, "hll"),
        }
    }
}

/// Step size policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimestepMode {
    /// Choose dt each step so the global CFL equals `cfl`.
    ConstantCfl { cfl: f64 },
    /// Fixed dt; the resulting CFL is reported.
    ConstantDt { dt: f64 },
}

/// Physical transport model selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransportKind {
    /// Constant viscosity, conductivity and species diffusivity.
    #[default]
    Simple,
    /// Temperature power law viscosity.
    PowerLaw,
    /// Mixture-averaged transport from a thermochemistry library.
    Mixture,
}

impl TryFrom<i64> for TransportKind {
    type Error = ConfigError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(TransportKind::Simple),
            1 => Ok(TransportKind::PowerLaw),
            2 => Ok(TransportKind::Mixture),
            other => Err(ConfigError::InvalidTransport(other)),
        }
    }
}

/// Artificial viscosity (shock capturing) variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArtificialViscosity {
    #[default]
    Off,
    /// Laplacian regularization weighted by the density modal-decay indicator.
    Laplacian,
    /// Physical viscosity augmentation, density modal-decay indicator.
    PhysicalDensity,
    /// Physical viscosity augmentation, velocity-divergence indicator.
    PhysicalDivergence,
}

impl ArtificialViscosity {
    pub fn is_enabled(self) -> bool {
        self != ArtificialViscosity::Off
    }

    /// Variants that augment the transport coefficients of the gas model.
    pub fn augments_transport(self) -> bool {
        matches!(
            self,
            ArtificialViscosity::PhysicalDensity | ArtificialViscosity::PhysicalDivergence
        )
    }
}

impl TryFrom<i64> for ArtificialViscosity {
    type Error = ConfigError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(ArtificialViscosity::Off),
            1 => Ok(ArtificialViscosity::Laplacian),
            2 => Ok(ArtificialViscosity::PhysicalDensity),
            3 => Ok(ArtificialViscosity::PhysicalDivergence),
            other => Err(ConfigError::InvalidArtificialViscosity(other)),
        }
    }
}

impl fmt::Display for ArtificialViscosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtificialViscosity::Off => write!(f, "off"),
            ArtificialViscosity::Laplacian => write!(f, "laplacian"),
            ArtificialViscosity::PhysicalDensity => write!(f, "physical viscosity, density indicator"),
            ArtificialViscosity::PhysicalDivergence => {
                write!(f, "physical viscosity, divergence indicator")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrator_names_round_trip() {
        for kind in [
            IntegratorKind::Euler,
            IntegratorKind::Rk4,
            IntegratorKind::Lsrk54,
            IntegratorKind::Lsrk144,
            IntegratorKind::CompiledLsrk54,
        ] {
            assert_eq!(kind.name().parse::<IntegratorKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_integrator() {
        assert_eq!(
            "rk3".parse::<IntegratorKind>(),
            Err(ConfigError::UnknownIntegrator("rk3".to_string()))
        );
    }

    #[test]
    fn test_av_variants() {
        assert_eq!(ArtificialViscosity::try_from(3), Ok(ArtificialViscosity::PhysicalDivergence));
        assert!(ArtificialViscosity::try_from(4).is_err());
        assert!(ArtificialViscosity::PhysicalDensity.augments_transport());
        assert!(!ArtificialViscosity::Laplacian.augments_transport());
    }

    #[test]
    fn test_flux_and_transport() {
        assert_eq!("hll".parse::<FluxFunction>(), Ok(FluxFunction::Hll));
        assert!("roe".parse::<FluxFunction>().is_err());
        assert_eq!(TransportKind::try_from(1), Ok(TransportKind::PowerLaw));
        assert_eq!(TransportKind::try_from(-1), Err(ConfigError::InvalidTransport(-1)));
    }
}
