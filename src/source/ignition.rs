use super::{PhysicsTerm, TermContext};
use crate::config::IgnitionParams;
use crate::state::ConservedFields;

/// Gaussian spark depositing energy around a fixed center.
///
/// S_E = ρ A exp(-(t - t0)² / (2τ²)) exp(-r² / (2w²)); other components
/// receive nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct SparkIgnition {
    center: Vec<f64>,
    width: f64,
    amplitude: f64,
    peak_time: f64,
    time_width: f64,
}

impl SparkIgnition {
    pub fn new(center: Vec<f64>, width: f64, amplitude: f64, peak_time: f64, time_width: f64) -> Self {
        Self {
            center,
            width,
            amplitude,
            peak_time,
            time_width,
        }
    }

    /// Spark from the ignition parameters at step size `dt`.
    pub fn from_params(params: &IgnitionParams, dt: f64) -> Self {
        Self::new(
            params.center.clone(),
            params.width(),
            params.amplitude(dt),
            params.init_time,
            params.time_width(),
        )
    }

    /// Amplitude at time `t`.
    pub fn amplitude_at(&self, t: f64) -> f64 {
        let dt = t - self.peak_time;
        self.amplitude * (-(dt * dt) / (2.0 * self.time_width * self.time_width)).exp()
    }
}

impl PhysicsTerm for SparkIgnition {
    fn evaluate(&self, ctx: &TermContext<'_>) -> ConservedFields {
        let cv = &ctx.fluid.cv;
        let mut out = cv.zeros_like();
        let amplitude = self.amplitude_at(ctx.time);
        if amplitude == 0.0 {
            return out;
        }

        let two_w2 = 2.0 * self.width * self.width;
        for (i, energy) in out.energy.iter_mut().enumerate() {
            let r2: f64 = self
                .center
                .iter()
                .zip(ctx.coords)
                .map(|(c, x)| (x[i] - c) * (x[i] - c))
                .sum();
            *energy = cv.mass[i] * amplitude * (-r2 / two_w2).exp();
        }
        out
    }

    fn name(&self) -> &'static str {
        "ignition"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FluidState;

    fn fluid(mass: Vec<f64>) -> FluidState {
        let n = mass.len();
        let mut cv = ConservedFields::zeros(2, 0, n);
        cv.mass = mass;
        cv.energy = vec![1.0e5; n];
        FluidState::placeholder(cv)
    }

    #[test]
    fn test_peak_deposition_at_center() {
        let spark = SparkIgnition::new(vec![0.0, 0.0], 0.1, 10.0, 1.0, 0.5);
        let fluid = fluid(vec![2.0, 2.0]);
        let coords = vec![vec![0.0, 0.1], vec![0.0, 0.0]];
        let src = spark.evaluate(&TermContext {
            fluid: &fluid,
            coords: &coords,
            time: 1.0,
        });

        assert!((src.energy[0] - 20.0).abs() < 1e-12);
        assert!((src.energy[1] - 20.0 * (-0.5_f64).exp()).abs() < 1e-12);
        assert!(src.mass.iter().all(|&m| m == 0.0));
        assert!(src.momentum.iter().flatten().all(|&m| m == 0.0));
    }

    #[test]
    fn test_source_does_not_include_state_energy() {
        let spark = SparkIgnition::new(vec![0.0, 0.0], 1.0, 1.0, 0.0, 1.0);
        let fluid = fluid(vec![1.0]);
        let coords = vec![vec![0.0], vec![0.0]];
        let src = spark.evaluate(&TermContext {
            fluid: &fluid,
            coords: &coords,
            time: 0.0,
        });
        assert!((src.energy[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_spark_is_dormant() {
        let spark = SparkIgnition::from_params(&IgnitionParams::for_dim(2), 1.0e-8);
        assert_eq!(spark.amplitude_at(0.0), 0.0);
    }
}
