//! The time-advancement loop.
//!
//! Each iteration runs the pre-step actions, one integrator step over the
//! composed right-hand side, and the post-step bookkeeping:
//!
//! ```text
//! pre-step:  limit/resolve fluid -> estimate dt -> [health] -> [status]
//!            -> [checkpoint] -> [visualization]
//! step:      integrator(state, dt, t, rhs)
//! post-step: diagnostics
//! ```
//!
//! Bracketed actions run when their interval divides the step index. A
//! non-finite step estimate forces the health check and fails the run even
//! off the health cadence. Every collective in the pre-step runs on every
//! rank on the same step.

use tracing::{debug, error, info, trace, warn};

use super::{HealthFailure, SimulationError};
use crate::analysis::{
    DiagnosticsContext, HealthIssue, HealthMonitor, HealthReport, RunSummary, StatusReport,
    normalized_temperature_residual,
};
use crate::comm::Communicator;
use crate::config::{OutputIntervals, SimulationConfig};
use crate::io::{CheckpointManager, RestartRecord, VisualizationSink, VizInputs, assemble_fields};
use crate::solver::{PreparedState, RhsComposer};
use crate::state::{Materialize, SimulationState};
use crate::time::{StandardIntegrator, TimeIntegrator, TimestepEstimate, TimestepEstimator};

/// Whether an action with `interval` fires on `step`. Zero disables it.
#[inline]
pub fn check_step(step: u64, interval: u64) -> bool {
    interval > 0 && step % interval == 0
}

/// Position of the run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepContext {
    pub step: u64,
    pub time: f64,
    /// Trial step of the current iteration
    pub dt: f64,
}

impl StepContext {
    pub fn new(step: u64, time: f64) -> Self {
        Self {
            step,
            time,
            dt: 0.0,
        }
    }
}

/// Actions due on one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct DueActions {
    viz: bool,
    restart: bool,
    health: bool,
    status: bool,
}

impl DueActions {
    fn at(step: u64, intervals: &OutputIntervals) -> Self {
        Self {
            viz: check_step(step, intervals.nviz),
            restart: check_step(step, intervals.nrestart),
            health: check_step(step, intervals.nhealth),
            status: check_step(step, intervals.nstatus),
        }
    }
}

/// Everything the dumps of one step read.
struct StepView {
    prepared: PreparedState,
    alpha: Vec<f64>,
    estimate: TimestepEstimate,
    /// State as seen by the right-hand side (species limited)
    state: SimulationState,
}

/// Drives a partition of the simulation to the final time.
pub struct Controller<C, V, I = StandardIntegrator>
where
    C: Communicator,
    V: VisualizationSink,
    I: TimeIntegrator<SimulationState>,
{
    config: SimulationConfig,
    rhs: RhsComposer,
    integrator: I,
    estimator: TimestepEstimator,
    health: HealthMonitor,
    checkpoints: CheckpointManager,
    viz: V,
    comm: C,
    species_names: Vec<String>,
}

impl<C, V> Controller<C, V, StandardIntegrator>
where
    C: Communicator,
    V: VisualizationSink,
{
    /// Controller with the integrator selected by `config`.
    pub fn new(
        config: SimulationConfig,
        rhs: RhsComposer,
        checkpoints: CheckpointManager,
        viz: V,
        comm: C,
    ) -> Self {
        let integrator = StandardIntegrator::from(config.integrator);
        Self::with_integrator(config, rhs, integrator, checkpoints, viz, comm)
    }
}

impl<C, V, I> Controller<C, V, I>
where
    C: Communicator,
    V: VisualizationSink,
    I: TimeIntegrator<SimulationState>,
{
    pub fn with_integrator(
        config: SimulationConfig,
        rhs: RhsComposer,
        integrator: I,
        checkpoints: CheckpointManager,
        viz: V,
        comm: C,
    ) -> Self {
        let estimator = TimestepEstimator::new(config.timestep_mode(), config.t_final);
        let health = HealthMonitor::from_config(&config, rhs.gas());
        let species_names = rhs.gas().species_names(config.nspecies);
        Self {
            config,
            rhs,
            integrator,
            estimator,
            health,
            checkpoints,
            viz,
            comm,
            species_names,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn sink(&self) -> &V {
        &self.viz
    }

    pub fn into_sink(self) -> V {
        self.viz
    }

    /// Advance `state` from `start` to the final time.
    ///
    /// On return `state` holds the last integrated state. After a health
    /// failure the last good state has already been dumped and is also
    /// carried by the error.
    pub fn run(
        &mut self,
        state: &mut SimulationState,
        start: StepContext,
    ) -> Result<RunSummary, SimulationError> {
        let mut ctx = start;
        let mut diagnostics = DiagnosticsContext::new();

        if self.comm.is_root() {
            self.config.log_summary();
            info!(
                integrator = self.integrator.name(),
                ranks = self.comm.size(),
                step = ctx.step,
                time = ctx.time,
                "Starting time advancement"
            );
        }

        while self.config.t_final - ctx.time > self.config.finish_tolerance {
            let dt = self.pre_step(&mut ctx, state, &mut diagnostics)?;

            let rhs = &self.rhs;
            self.integrator
                .step(state, dt, ctx.time, |s, t| rhs.evaluate(s, t));

            ctx.time += dt;
            ctx.step += 1;
            self.post_step(&ctx, dt, &mut diagnostics);
        }

        if self.comm.is_root() {
            info!("Checkpointing final state ...");
        }
        let mut view = self.view(state, &ctx);
        diagnostics.record_estimate(view.estimate.dt, view.estimate.cfl);
        self.write_status(&view);
        self.write_viz(&ctx, &view)?;
        view.state.materialize();
        self.write_checkpoint(&ctx, view.state)?;

        let tolerance = self.config.finish_tolerance;
        if (ctx.time - self.config.t_final).abs() >= tolerance {
            return Err(SimulationError::FinalTimeMismatch {
                reached: ctx.time,
                expected: self.config.t_final,
                tolerance,
            });
        }

        let summary = diagnostics.summary(ctx.step, ctx.time);
        if self.comm.is_root() {
            info!(%summary, "Run complete");
        }
        Ok(summary)
    }

    /// Resolve the step's fluid state and estimate the step size.
    fn view(&self, state: &SimulationState, ctx: &StepContext) -> StepView {
        let prepared = self.rhs.prepare(state, None, ctx.time);
        let alpha = self.rhs.dissipation_rate(&prepared.fluid);
        let estimate = self.estimator.estimate(
            &prepared.fluid,
            &self.rhs.discretization().length_scales,
            &alpha,
            ctx.time,
            &self.comm,
        );
        let state = SimulationState {
            cv: prepared.fluid.cv.clone(),
            temperature_seed: state.temperature_seed.clone(),
        };
        StepView {
            prepared,
            alpha,
            estimate,
            state,
        }
    }

    fn pre_step(
        &mut self,
        ctx: &mut StepContext,
        state: &SimulationState,
        diagnostics: &mut DiagnosticsContext,
    ) -> Result<f64, SimulationError> {
        let due = DueActions::at(ctx.step, &self.config.intervals);
        let mut view = self.view(state, ctx);
        ctx.dt = view.estimate.dt;
        diagnostics.record_estimate(view.estimate.dt, view.estimate.cfl);

        // The estimate is globally reduced, so every rank agrees here.
        let admissible = view.estimate.is_admissible();
        if due.health || !admissible {
            view.prepared.fluid.materialize();
            let mut report = self
                .health
                .check(&view.prepared.fluid, self.rhs.gas(), &self.comm);
            if !admissible {
                report.error = true;
                report.issues.push(HealthIssue::NonFiniteTimestep {
                    dt: view.estimate.dt,
                    cfl: view.estimate.cfl,
                });
            }
            if report.error {
                if self.comm.is_root() {
                    warn!(step = ctx.step, "Fluid solution failed health check");
                }
                return Err(self.abort(ctx, view, report));
            }
        }

        if due.status {
            self.write_status(&view);
        }

        if due.restart {
            view.state.materialize();
            self.write_checkpoint(ctx, view.state.clone())?;
        }

        if due.viz {
            self.write_viz(ctx, &view)?;
        }

        Ok(ctx.dt)
    }

    fn post_step(&self, ctx: &StepContext, dt: f64, diagnostics: &mut DiagnosticsContext) {
        diagnostics.record_step(dt);
        trace!(step = ctx.step, time = ctx.time, dt, "Step complete");
    }

    /// Best-effort dump of the last good state, then the error.
    fn abort(
        &mut self,
        ctx: &StepContext,
        view: StepView,
        report: HealthReport,
    ) -> SimulationError {
        if self.comm.is_root() {
            error!("Errors detected; attempting graceful exit.");
        }
        if let Err(e) = self.write_viz(ctx, &view) {
            error!(error = %e, "Emergency visualization dump failed");
        }
        if let Err(e) = self.write_checkpoint(ctx, view.state.clone()) {
            error!(error = %e, "Emergency checkpoint failed");
        }

        SimulationError::Health(Box::new(HealthFailure {
            step: ctx.step,
            time: ctx.time,
            report,
            last_state: view.state,
        }))
    }

    fn write_status(&self, view: &StepView) {
        let fluid = &view.prepared.fluid;
        let residual = self
            .config
            .checks_temperature_residual()
            .then(|| normalized_temperature_residual(self.rhs.gas(), fluid));
        let report = StatusReport::gather(
            fluid,
            residual.as_deref(),
            &self.species_names,
            view.estimate.dt,
            view.estimate.cfl,
            &self.comm,
        );
        if self.comm.is_root() {
            info!("\n{}", report);
        }
    }

    fn write_checkpoint(
        &self,
        ctx: &StepContext,
        state: SimulationState,
    ) -> Result<(), SimulationError> {
        let disc = self.rhs.discretization();
        let record = RestartRecord {
            mesh: disc.mesh.clone(),
            state,
            time: ctx.time,
            step: ctx.step,
            order: disc.order,
            global_n_elements: disc.mesh.global_n_elements,
            num_parts: self.comm.size(),
            nspecies: self.config.nspecies,
        };
        if let Some(path) = self.checkpoints.write(&record)? {
            debug!(path = %path.display(), step = ctx.step, "Checkpoint written");
        }
        Ok(())
    }

    fn write_viz(&mut self, ctx: &StepContext, view: &StepView) -> Result<(), SimulationError> {
        let fluid = &view.prepared.fluid;
        let residual = self
            .config
            .checks_temperature_residual()
            .then(|| normalized_temperature_residual(self.rhs.gas(), fluid));
        let inputs = VizInputs {
            rank: self.comm.rank(),
            length_scales: &self.rhs.discretization().length_scales,
            alpha: &view.alpha,
            sponge_sigma: self.rhs.sponge_sigma(),
            timestep: Some(&view.estimate.field),
            temperature_residual: residual.as_deref(),
            species_names: &self.species_names,
        };
        let fields = assemble_fields(fluid, &inputs);
        self.viz.write(ctx.step, ctx.time, &fields)?;
        Ok(())
    }
}
