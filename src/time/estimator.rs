//! Stable step size selection.
//!
//! The node-local stable step combines acoustic and diffusive limits:
//!
//! ```text
//! dt_node = L / (|u| + c + (ν + D + α) / L)
//! ```
//!
//! with L the node length scale, ν the kinematic viscosity, D the largest
//! species diffusivity and α the artificial dissipation rate. Under
//! constant CFL the step is `cfl · min(dt_node)` over every rank; under
//! constant dt the reported CFL is `max(dt / dt_node)`. Either way the
//! step never passes the final time.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::comm::Communicator;
use crate::config::TimestepMode;
use crate::state::FluidState;

/// Node-local stability field of the current step.
#[derive(Clone, Debug, PartialEq)]
pub enum TimestepField {
    /// Stable step per node (constant CFL)
    Dt(Vec<f64>),
    /// Local CFL per node (constant dt)
    Cfl(Vec<f64>),
}

impl TimestepField {
    pub fn values(&self) -> &[f64] {
        match self {
            TimestepField::Dt(v) | TimestepField::Cfl(v) => v,
        }
    }

    /// Name for visualization output.
    pub fn label(&self) -> &'static str {
        match self {
            TimestepField::Dt(_) => "dt",
            TimestepField::Cfl(_) => "cfl",
        }
    }
}

/// Step chosen for one iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct TimestepEstimate {
    /// Trial step, already clamped to the remaining time
    pub dt: f64,
    /// Target CFL (constant CFL) or the global maximum CFL (constant dt)
    pub cfl: f64,
    pub field: TimestepField,
}

impl TimestepEstimate {
    /// False when the state behind the estimate holds NaN or Inf somewhere
    /// on any rank, or the step cannot advance. Identical on every rank.
    pub fn is_admissible(&self) -> bool {
        self.dt.is_finite() && self.dt > 0.0 && self.cfl.is_finite()
    }
}

/// Clamp to the remaining time without swallowing a NaN step.
fn clamp_to_remaining(dt: f64, remaining: f64) -> f64 {
    if dt.is_nan() { dt } else { dt.min(remaining) }
}

/// Node-local maximum stable step.
pub fn stable_timestep_field(
    fluid: &FluidState,
    length_scales: &[f64],
    dissipation_rate: &[f64],
) -> Vec<f64> {
    let node = |i: usize| {
        let length = length_scales[i];
        let diffusivity =
            fluid.kinematic_viscosity(i) + fluid.max_species_diffusivity(i) + dissipation_rate[i];
        length / (fluid.wavespeed(i) + diffusivity / length)
    };

    #[cfg(feature = "parallel")]
    {
        (0..fluid.n_nodes()).into_par_iter().map(node).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..fluid.n_nodes()).map(node).collect()
    }
}

/// Chooses the trial step each iteration.
#[derive(Clone, Copy, Debug)]
pub struct TimestepEstimator {
    mode: TimestepMode,
    t_final: f64,
}

impl TimestepEstimator {
    pub fn new(mode: TimestepMode, t_final: f64) -> Self {
        Self { mode, t_final }
    }

    /// Collective: every rank must call this on the same step.
    pub fn estimate<C: Communicator + ?Sized>(
        &self,
        fluid: &FluidState,
        length_scales: &[f64],
        dissipation_rate: &[f64],
        t: f64,
        comm: &C,
    ) -> TimestepEstimate {
        let dt_node = stable_timestep_field(fluid, length_scales, dissipation_rate);
        let remaining = (self.t_final - t).max(0.0);

        match self.mode {
            TimestepMode::ConstantCfl { cfl } => {
                let dt = cfl * comm.global_min(&dt_node);
                TimestepEstimate {
                    dt: clamp_to_remaining(dt, remaining),
                    cfl,
                    field: TimestepField::Dt(dt_node),
                }
            }
            TimestepMode::ConstantDt { dt } => {
                let cfl_field: Vec<f64> = dt_node.iter().map(|d| dt / d).collect();
                let cfl = comm.global_max(&cfl_field);
                TimestepEstimate {
                    dt: clamp_to_remaining(dt, remaining),
                    cfl,
                    field: TimestepField::Cfl(cfl_field),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::{LocalCluster, SerialCommunicator};
    use crate::state::ConservedFields;
    use proptest::prelude::*;

    fn fluid(speeds: &[f64], sound: f64, viscosity: f64) -> FluidState {
        let n = speeds.len();
        let mut cv = ConservedFields::zeros(1, 0, n);
        cv.mass = vec![1.0; n];
        cv.momentum[0] = speeds.to_vec();
        let mut fluid = FluidState::placeholder(cv);
        fluid.sound_speed = vec![sound; n];
        fluid.viscosity = vec![viscosity; n];
        fluid
    }

    #[test]
    fn test_acoustic_limit() {
        let f = fluid(&[10.0, 20.0], 90.0, 0.0);
        let dt = stable_timestep_field(&f, &[1.0, 1.0], &[0.0, 0.0]);
        assert!((dt[0] - 0.01).abs() < 1e-15);
        assert!((dt[1] - 1.0 / 110.0).abs() < 1e-15);
    }

    #[test]
    fn test_diffusion_tightens_bound() {
        let f = fluid(&[0.0], 100.0, 0.0);
        let inviscid = stable_timestep_field(&f, &[0.01], &[0.0])[0];
        let viscous = stable_timestep_field(&f, &[0.01], &[1.0])[0];
        assert!(viscous < inviscid);
        assert!((viscous - 0.01 / (100.0 + 100.0)).abs() < 1e-15);
    }

    #[test]
    fn test_constant_cfl_uses_global_minimum() {
        let f = fluid(&[10.0, 0.0], 90.0, 0.0);
        let estimator = TimestepEstimator::new(TimestepMode::ConstantCfl { cfl: 0.5 }, 1.0);
        let est = estimator.estimate(&f, &[1.0, 1.0], &[0.0, 0.0], 0.0, &SerialCommunicator);
        assert!((est.dt - 0.005).abs() < 1e-15);
        assert_eq!(est.cfl, 0.5);
        assert_eq!(est.field.label(), "dt");
        assert!(est.is_admissible());
    }

    #[test]
    fn test_constant_dt_reports_max_cfl() {
        let f = fluid(&[10.0, 0.0], 90.0, 0.0);
        let estimator = TimestepEstimator::new(TimestepMode::ConstantDt { dt: 0.001 }, 1.0);
        let est = estimator.estimate(&f, &[1.0, 1.0], &[0.0, 0.0], 0.0, &SerialCommunicator);
        assert_eq!(est.dt, 0.001);
        assert!((est.cfl - 0.1).abs() < 1e-14);
        assert_eq!(est.field.values().len(), 2);
    }

    #[test]
    fn test_step_clamped_to_final_time() {
        let f = fluid(&[0.0], 1.0, 0.0);
        let estimator = TimestepEstimator::new(TimestepMode::ConstantDt { dt: 1.0 }, 2.5);
        let est = estimator.estimate(&f, &[1.0], &[0.0], 2.0, &SerialCommunicator);
        assert_eq!(est.dt, 0.5);

        let past = estimator.estimate(&f, &[1.0], &[0.0], 3.0, &SerialCommunicator);
        assert_eq!(past.dt, 0.0);
        assert!(!past.is_admissible());
    }

    #[test]
    fn test_nan_state_yields_nan_step() {
        let mut f = fluid(&[10.0, 0.0], 90.0, 0.0);
        f.sound_speed[1] = f64::NAN;
        let estimator = TimestepEstimator::new(TimestepMode::ConstantCfl { cfl: 0.5 }, 1.0);
        let est = estimator.estimate(&f, &[1.0, 1.0], &[0.0, 0.0], 0.0, &SerialCommunicator);
        assert!(est.dt.is_nan());
        assert!(!est.is_admissible());

        let estimator = TimestepEstimator::new(TimestepMode::ConstantDt { dt: 0.001 }, 1.0);
        let est = estimator.estimate(&f, &[1.0, 1.0], &[0.0, 0.0], 0.0, &SerialCommunicator);
        assert_eq!(est.dt, 0.001);
        assert!(!est.is_admissible());
    }

    #[test]
    fn test_every_rank_agrees_on_dt() {
        let dts = LocalCluster::run(3, |comm| {
            let speed = 10.0 * comm.rank().as_usize() as f64;
            let f = fluid(&[speed], 90.0, 0.0);
            let estimator = TimestepEstimator::new(TimestepMode::ConstantCfl { cfl: 1.0 }, 1.0);
            estimator.estimate(&f, &[1.0], &[0.0], 0.0, &comm).dt
        });
        assert!(dts.iter().all(|&dt| (dt - 1.0 / 110.0).abs() < 1e-15));
    }

    proptest! {
        #[test]
        fn prop_constant_cfl_respects_every_node(
            speeds in proptest::collection::vec(0.0f64..500.0, 1..20),
            sound in 50.0f64..400.0,
            viscosity in 0.0f64..1.0e-3,
            length in 1.0e-4f64..1.0e-1,
            cfl in 0.05f64..1.0,
        ) {
            let f = fluid(&speeds, sound, viscosity);
            let lengths = vec![length; speeds.len()];
            let alpha = vec![0.0; speeds.len()];
            let estimator = TimestepEstimator::new(TimestepMode::ConstantCfl { cfl }, f64::INFINITY);
            let est = estimator.estimate(&f, &lengths, &alpha, 0.0, &SerialCommunicator);

            for &dt_node in est.field.values() {
                prop_assert!(est.dt * (1.0 / dt_node) <= 1.0 + 1e-12);
            }
        }
    }
}
