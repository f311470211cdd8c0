//! Distributed physical admissibility checks.
//!
//! Every rank runs the same collectives in the same order:
//!
//! 1. pressure global min/max
//! 2. temperature global min/max
//! 3. per species mass fraction global min/max
//! 4. normalized temperature residual global max (reactive mixtures only)
//! 5. OR of the local error flags
//!
//! A non-finite pressure is a rank-local finding; the final OR carries it to
//! every rank so all of them fail on the same step.

use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, warn};

use crate::comm::Communicator;
use crate::config::{HealthBounds, SimulationConfig};
use crate::physics::GasModel;
use crate::state::FluidState;
use crate::types::{RankIndex, ValueRange};

/// One finding of a health check.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthIssue {
    /// NaN or Inf in this rank's pressure field.
    NonFinitePressure { rank: RankIndex },
    /// Global pressure range outside the admissible bounds.
    PressureOutOfRange { min: f64, max: f64, bounds: ValueRange },
    /// Global temperature range outside the admissible bounds.
    TemperatureOutOfRange { min: f64, max: f64, bounds: ValueRange },
    /// Global mass fraction range of one species outside the bounds.
    MassFractionOutOfRange {
        species: String,
        min: f64,
        max: f64,
        bounds: ValueRange,
    },
    /// Temperature solve not converged.
    TemperatureNotConverged { residual: f64, tolerance: f64 },
    /// Another rank flagged an error this rank did not see.
    RemoteFailure,
    /// Global step size or CFL is not finite.
    NonFiniteTimestep { dt: f64, cfl: f64 },
}

impl fmt::Display for HealthIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinitePressure { rank } => {
                write!(f, "rank {}: NaN/Inf in pressure data", rank)
            }
            Self::PressureOutOfRange { min, max, bounds } => write!(
                f,
                "Pressure range violation: simulation ({:.6e}, {:.6e}), limits {}",
                min, max, bounds
            ),
            Self::TemperatureOutOfRange { min, max, bounds } => write!(
                f,
                "Temperature range violation: simulation ({:.6e}, {:.6e}), limits {}",
                min, max, bounds
            ),
            Self::MassFractionOutOfRange {
                species,
                min,
                max,
                bounds,
            } => write!(
                f,
                "Species mass fraction range violation: {} ({:.6e}, {:.6e}), limits {}",
                species, min, max, bounds
            ),
            Self::TemperatureNotConverged {
                residual,
                tolerance,
            } => write!(
                f,
                "Temperature is not converged: {:.6e} > {:.6e}",
                residual, tolerance
            ),
            Self::RemoteFailure => write!(f, "health error reported by another rank"),
            Self::NonFiniteTimestep { dt, cfl } => {
                write!(f, "Non-finite timestep: dt = {:e}, cfl = {:e}", dt, cfl)
            }
        }
    }
}

/// Outcome of one health check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthReport {
    /// Global error flag; identical on every rank.
    pub error: bool,
    /// Findings visible from this rank.
    pub issues: Vec<HealthIssue>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        !self.error
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.error {
            return write!(f, "healthy");
        }
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// Normalized temperature residual `|ΔT| / T` per node.
pub fn normalized_temperature_residual(gas: &dyn GasModel, fluid: &FluidState) -> Vec<f64> {
    gas.temperature_residual(&fluid.cv, &fluid.temperature)
        .iter()
        .zip(&fluid.temperature)
        .map(|(dt, t)| (dt / t).abs())
        .collect()
}

fn has_non_finite(field: &[f64]) -> bool {
    #[cfg(feature = "parallel")]
    {
        field.par_iter().any(|v| !v.is_finite())
    }
    #[cfg(not(feature = "parallel"))]
    {
        field.iter().any(|v| !v.is_finite())
    }
}

/// Checks the fluid state against [`HealthBounds`].
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    bounds: HealthBounds,
    check_residual: bool,
    species_names: Vec<String>,
}

impl HealthMonitor {
    pub fn new(bounds: HealthBounds, check_residual: bool, species_names: Vec<String>) -> Self {
        Self {
            bounds,
            check_residual,
            species_names,
        }
    }

    pub fn from_config(config: &SimulationConfig, gas: &dyn GasModel) -> Self {
        Self::new(
            config.health,
            config.checks_temperature_residual(),
            gas.species_names(config.nspecies),
        )
    }

    pub fn bounds(&self) -> &HealthBounds {
        &self.bounds
    }

    /// Run every check. Collective.
    pub fn check<C: Communicator + ?Sized>(
        &self,
        fluid: &FluidState,
        gas: &dyn GasModel,
        comm: &C,
    ) -> HealthReport {
        let mut issues = Vec::new();

        if has_non_finite(&fluid.pressure) {
            info!(rank = %comm.rank(), "NaN/Inf in pressure data");
            issues.push(HealthIssue::NonFinitePressure { rank: comm.rank() });
        }

        let (p_min, p_max) = global_range(&fluid.pressure, comm);
        if out_of_bounds(p_min, p_max, &self.bounds.pressure) {
            issues.push(HealthIssue::PressureOutOfRange {
                min: p_min,
                max: p_max,
                bounds: self.bounds.pressure,
            });
        }

        let (t_min, t_max) = global_range(&fluid.temperature, comm);
        if out_of_bounds(t_min, t_max, &self.bounds.temperature) {
            issues.push(HealthIssue::TemperatureOutOfRange {
                min: t_min,
                max: t_max,
                bounds: self.bounds.temperature,
            });
        }

        for species in 0..fluid.cv.nspecies() {
            let y = fluid.cv.mass_fraction_field(species);
            let (y_min, y_max) = global_range(&y, comm);
            if out_of_bounds(y_min, y_max, &self.bounds.mass_fraction) {
                issues.push(HealthIssue::MassFractionOutOfRange {
                    species: self.species_name(species),
                    min: y_min,
                    max: y_max,
                    bounds: self.bounds.mass_fraction,
                });
            }
        }

        if self.check_residual {
            let residual = normalized_temperature_residual(gas, fluid);
            let worst = comm.global_max(&residual);
            if worst > self.bounds.temperature_tolerance {
                issues.push(HealthIssue::TemperatureNotConverged {
                    residual: worst,
                    tolerance: self.bounds.temperature_tolerance,
                });
            }
        }

        let error = comm.all_reduce_or(!issues.is_empty());
        if error && issues.is_empty() {
            issues.push(HealthIssue::RemoteFailure);
        }

        if error && comm.is_root() {
            for issue in &issues {
                warn!("{}", issue);
            }
        }

        HealthReport { error, issues }
    }

    fn species_name(&self, species: usize) -> String {
        self.species_names
            .get(species)
            .cloned()
            .unwrap_or_else(|| format!("species_{}", species))
    }
}

fn global_range<C: Communicator + ?Sized>(field: &[f64], comm: &C) -> (f64, f64) {
    (comm.global_min(field), comm.global_max(field))
}

fn out_of_bounds(min: f64, max: f64, bounds: &ValueRange) -> bool {
    bounds.excludes(min) || bounds.excludes(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::{LocalCluster, SerialCommunicator};
    use crate::physics::IdealGasModel;
    use crate::state::ConservedFields;

    fn fluid(n: usize, nspecies: usize) -> FluidState {
        let mut cv = ConservedFields::zeros(2, nspecies, n);
        cv.mass = vec![1.0; n];
        for s in 0..nspecies {
            cv.species_mass[s] = vec![1.0 / nspecies as f64; n];
        }
        FluidState::placeholder(cv)
    }

    fn gas() -> IdealGasModel {
        IdealGasModel::from_config(&SimulationConfig::default()).expect("simple transport")
    }

    fn monitor(check_residual: bool) -> HealthMonitor {
        HealthMonitor::new(HealthBounds::default(), check_residual, Vec::new())
    }

    #[test]
    fn test_healthy_state() {
        let gas = gas();
        let report = monitor(false).check(&fluid(8, 2), &gas, &SerialCommunicator);
        assert!(report.is_healthy());
        assert!(report.issues.is_empty());
        assert_eq!(report.to_string(), "healthy");
    }

    #[test]
    fn test_pressure_nan_detected() {
        let gas = gas();
        let mut f = fluid(8, 0);
        f.pressure[3] = f64::NAN;
        let report = monitor(false).check(&f, &gas, &SerialCommunicator);
        assert!(report.error);
        assert!(
            report
                .issues
                .contains(&HealthIssue::NonFinitePressure { rank: RankIndex::new(0) })
        );
    }

    #[test]
    fn test_temperature_range_violation() {
        let gas = gas();
        let mut f = fluid(4, 0);
        f.temperature[1] = 6000.0;
        let report = monitor(false).check(&f, &gas, &SerialCommunicator);
        assert!(report.error);
        assert!(matches!(
            report.issues[0],
            HealthIssue::TemperatureOutOfRange { max, .. } if max == 6000.0
        ));
    }

    #[test]
    fn test_mass_fraction_violation_names_species() {
        let gas = gas();
        let mut f = fluid(4, 2);
        f.cv.species_mass[1][0] = 20.0;
        let monitor = HealthMonitor::new(
            HealthBounds::default(),
            false,
            vec!["air".to_string(), "fuel".to_string()],
        );
        let report = monitor.check(&f, &gas, &SerialCommunicator);
        assert!(report.error);
        assert!(report.to_string().contains("fuel"));
    }

    #[test]
    fn test_nan_on_one_rank_fails_every_rank() {
        let reports = LocalCluster::run(4, |comm| {
            let gas = gas();
            let mut f = fluid(6, 0);
            if comm.rank().as_usize() == 2 {
                f.pressure[0] = f64::NAN;
            }
            monitor(false).check(&f, &gas, &comm)
        });
        assert!(reports.iter().all(|r| r.error));
        assert_eq!(reports[0].issues, vec![HealthIssue::RemoteFailure]);
        assert!(matches!(
            reports[2].issues[0],
            HealthIssue::NonFinitePressure { .. }
        ));
    }

    #[test]
    fn test_range_violation_seen_by_every_rank() {
        let reports = LocalCluster::run(3, |comm| {
            let gas = gas();
            let mut f = fluid(4, 0);
            if comm.rank().as_usize() == 1 {
                f.pressure[2] = 1.0e9;
            }
            monitor(false).check(&f, &gas, &comm)
        });
        for report in &reports {
            assert!(report.error);
            assert!(matches!(
                report.issues[0],
                HealthIssue::PressureOutOfRange { .. }
            ));
        }
    }
}
