//! Per-step bookkeeping and status reports.

use std::fmt;
use std::time::{Duration, Instant};

use crate::comm::Communicator;
use crate::state::FluidState;

/// Global (min, max) of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    /// Collective.
    pub fn global<C: Communicator + ?Sized>(field: &[f64], comm: &C) -> Self {
        Self {
            min: comm.global_min(field),
            max: comm.global_max(field),
        }
    }
}

/// Global state summary written every `nstatus` steps.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub dt: f64,
    pub cfl: f64,
    pub pressure: FieldRange,
    pub temperature: FieldRange,
    /// Normalized temperature residual, for reactive mixtures
    pub temperature_residual: Option<FieldRange>,
    pub species: Vec<(String, FieldRange)>,
}

impl StatusReport {
    /// Gather the global ranges. Collective.
    pub fn gather<C: Communicator + ?Sized>(
        fluid: &FluidState,
        residual: Option<&[f64]>,
        species_names: &[String],
        dt: f64,
        cfl: f64,
        comm: &C,
    ) -> Self {
        let pressure = FieldRange::global(&fluid.pressure, comm);
        let temperature = FieldRange::global(&fluid.temperature, comm);
        let temperature_residual = residual.map(|r| FieldRange::global(r, comm));
        let species = (0..fluid.cv.nspecies())
            .map(|s| {
                let name = species_names
                    .get(s)
                    .cloned()
                    .unwrap_or_else(|| format!("species_{}", s));
                let y = fluid.cv.mass_fraction_field(s);
                (name, FieldRange::global(&y, comm))
            })
            .collect();

        Self {
            dt,
            cfl,
            pressure,
            temperature,
            temperature_residual,
            species,
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-------- dt = {:1.3e}, cfl = {:1.4}", self.dt, self.cfl)?;
        writeln!(
            f,
            "-------- P (min, max) (Pa) = ({:1.9e}, {:1.9e})",
            self.pressure.min, self.pressure.max
        )?;
        write!(
            f,
            "-------- T (min, max) (K)  = ({:7}, {:7})",
            self.temperature.min, self.temperature.max
        )?;
        if let Some(r) = &self.temperature_residual {
            write!(f, "\n-------- T_resid (min, max) = ({:1.5e}, {:1.5e})", r.min, r.max)?;
        }
        for (name, y) in &self.species {
            write!(f, "\n-------- y_{} (min, max) = ({:1.3e}, {:1.3e})", name, y.min, y.max)?;
        }
        Ok(())
    }
}

/// What a finished run reports.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    pub final_step: u64,
    pub final_time: f64,
    /// Smallest and largest step taken; `None` when no step was taken
    pub dt_range: Option<(f64, f64)>,
    pub wall_time: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} steps to t = {:.6e} (step {}) in {:.3}s",
            self.steps,
            self.final_time,
            self.final_step,
            self.wall_time.as_secs_f64()
        )?;
        if let Some((lo, hi)) = self.dt_range {
            write!(f, ", dt in [{:.3e}, {:.3e}]", lo, hi)?;
        }
        Ok(())
    }
}

/// Diagnostics threaded through the pre-step and post-step calls.
#[derive(Debug, Clone)]
pub struct DiagnosticsContext {
    started: Instant,
    steps: u64,
    dt_min: f64,
    dt_max: f64,
    /// Step and CFL chosen by the most recent estimate
    pub last_dt: f64,
    pub last_cfl: f64,
}

impl Default for DiagnosticsContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticsContext {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            steps: 0,
            dt_min: f64::INFINITY,
            dt_max: 0.0,
            last_dt: 0.0,
            last_cfl: 0.0,
        }
    }

    /// Remember the estimate of the coming step.
    pub fn record_estimate(&mut self, dt: f64, cfl: f64) {
        self.last_dt = dt;
        self.last_cfl = cfl;
    }

    /// Count a completed step of size `dt`.
    pub fn record_step(&mut self, dt: f64) {
        self.steps += 1;
        self.dt_min = self.dt_min.min(dt);
        self.dt_max = self.dt_max.max(dt);
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn dt_range(&self) -> Option<(f64, f64)> {
        (self.steps > 0).then_some((self.dt_min, self.dt_max))
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn summary(&self, final_step: u64, final_time: f64) -> RunSummary {
        RunSummary {
            steps: self.steps,
            final_step,
            final_time,
            dt_range: self.dt_range(),
            wall_time: self.elapsed(),
        }
    }
}
