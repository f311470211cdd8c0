//! Artificial viscosity strategies.
//!
//! The configured variant is resolved once into a [`ShockCapturing`]
//! object; the RHS composer then asks it for the fluid state, the extra
//! tendency and the dissipation rate without branching on the variant.

use std::sync::Arc;

use crate::config::{ArtificialViscosity, SimulationConfig};
use crate::mesh::Discretization;
use crate::physics::{ConservedGradient, GasModel, SpatialOperator};
use crate::solver::smoothness::smoothness_indicator;
use crate::state::{ConservedFields, FluidState};

/// Fluid state resolved by a strategy, with the conserved gradient when
/// the strategy had to compute one.
#[derive(Clone, Debug)]
pub struct ResolvedFluid {
    pub fluid: FluidState,
    pub gradient: Option<ConservedGradient>,
}

/// One artificial viscosity variant.
pub trait ShockCapturing: Send + Sync {
    fn variant(&self) -> ArtificialViscosity;

    /// Fluid state with whatever transport augmentation the variant needs.
    ///
    /// `cached_gradient` lets callers that already hold the conserved
    /// gradient skip recomputing it.
    fn resolve(
        &self,
        cv: &ConservedFields,
        temperature_seed: &[f64],
        cached_gradient: Option<&ConservedGradient>,
        time: f64,
    ) -> ResolvedFluid;

    /// Extra tendency of the variant; `None` when it acts only through
    /// transport.
    fn tendency(&self, _fluid: &FluidState, _time: f64) -> Option<ConservedFields> {
        None
    }

    /// Artificial dissipation rate α per node for the stable step bound.
    fn dissipation_rate(&self, fluid: &FluidState) -> Vec<f64>;
}

/// Scaling shared by the enabled variants: α = alpha·|u|·L.
#[derive(Clone)]
struct DissipationScale {
    alpha: f64,
    discretization: Arc<Discretization>,
}

impl DissipationScale {
    fn rate(&self, fluid: &FluidState) -> Vec<f64> {
        (0..fluid.n_nodes())
            .map(|i| self.alpha * fluid.speed(i) * self.discretization.length_scales[i])
            .collect()
    }

    /// alpha·L, the per-node scale before the flow speed.
    fn scale(&self, node: usize) -> f64 {
        self.alpha * self.discretization.length_scales[node]
    }
}

// =============================================================================
// Variant 0: off
// =============================================================================

pub struct NoShockCapturing {
    gas: Arc<dyn GasModel>,
}

impl ShockCapturing for NoShockCapturing {
    fn variant(&self) -> ArtificialViscosity {
        ArtificialViscosity::Off
    }

    fn resolve(
        &self,
        cv: &ConservedFields,
        temperature_seed: &[f64],
        _cached_gradient: Option<&ConservedGradient>,
        _time: f64,
    ) -> ResolvedFluid {
        ResolvedFluid {
            fluid: self.gas.fluid_state(cv, temperature_seed, None),
            gradient: None,
        }
    }

    fn dissipation_rate(&self, fluid: &FluidState) -> Vec<f64> {
        vec![0.0; fluid.n_nodes()]
    }
}

// =============================================================================
// Variant 1: Laplacian regularization
// =============================================================================

/// Adds ∇·(α·indicator ∇q) with the density modal-decay indicator.
pub struct LaplacianRegularization {
    gas: Arc<dyn GasModel>,
    operator: Arc<dyn SpatialOperator>,
    scale: DissipationScale,
    kappa: f64,
    s0: f64,
}

impl ShockCapturing for LaplacianRegularization {
    fn variant(&self) -> ArtificialViscosity {
        ArtificialViscosity::Laplacian
    }

    fn resolve(
        &self,
        cv: &ConservedFields,
        temperature_seed: &[f64],
        _cached_gradient: Option<&ConservedGradient>,
        _time: f64,
    ) -> ResolvedFluid {
        // Transport is untouched; the indicator is kept for the tendency
        let mut fluid = self.gas.fluid_state(cv, temperature_seed, None);
        fluid.smoothness =
            smoothness_indicator(&cv.mass, &self.scale.discretization, self.kappa, self.s0);
        ResolvedFluid {
            fluid,
            gradient: None,
        }
    }

    fn tendency(&self, fluid: &FluidState, time: f64) -> Option<ConservedFields> {
        let coefficient: Vec<f64> = (0..fluid.n_nodes())
            .map(|i| self.scale.scale(i) * fluid.speed(i) * fluid.smoothness[i])
            .collect();
        Some(self.operator.dissipation(fluid, &coefficient, time))
    }

    fn dissipation_rate(&self, fluid: &FluidState) -> Vec<f64> {
        self.scale.rate(fluid)
    }
}

// =============================================================================
// Variant 2: physical viscosity, density indicator
// =============================================================================

pub struct PhysicalViscosityDensity {
    gas: Arc<dyn GasModel>,
    scale: DissipationScale,
    kappa: f64,
    s0: f64,
}

impl ShockCapturing for PhysicalViscosityDensity {
    fn variant(&self) -> ArtificialViscosity {
        ArtificialViscosity::PhysicalDensity
    }

    fn resolve(
        &self,
        cv: &ConservedFields,
        temperature_seed: &[f64],
        _cached_gradient: Option<&ConservedGradient>,
        _time: f64,
    ) -> ResolvedFluid {
        let indicator =
            smoothness_indicator(&cv.mass, &self.scale.discretization, self.kappa, self.s0);
        ResolvedFluid {
            fluid: self.gas.fluid_state(cv, temperature_seed, Some(&indicator)),
            gradient: None,
        }
    }

    fn dissipation_rate(&self, fluid: &FluidState) -> Vec<f64> {
        self.scale.rate(fluid)
    }
}

// =============================================================================
// Variant 3: physical viscosity, velocity-divergence indicator
// =============================================================================

/// Compression indicator from ∇·u, smoothed with a softplus:
///
/// ```text
/// c*  = sqrt(γ R T_stag 2/(γ+1))
/// ind = -γ_sc L (∇·u) / c*
/// s   = γ_sc L ln(1 + exp(θ (ind - β))) / θ
/// ```
pub struct PhysicalViscosityDivergence {
    gas: Arc<dyn GasModel>,
    operator: Arc<dyn SpatialOperator>,
    scale: DissipationScale,
    stagnation_temperature: f64,
    theta: f64,
    beta: f64,
    gamma_sc: f64,
}

impl PhysicalViscosityDivergence {
    fn indicator(&self, fluid: &FluidState, gradient: &ConservedGradient) -> Vec<f64> {
        let cv = &fluid.cv;
        let div_v = gradient.velocity_divergence(cv);
        (0..cv.n_nodes())
            .map(|i| {
                let y = cv.mass_fractions_at(i);
                let gamma = self.gas.gamma(&y, fluid.temperature[i]);
                let r = self.gas.gas_constant(&y);
                let c_star = (gamma * r * (2.0 / (gamma + 1.0) * self.stagnation_temperature)).sqrt();
                let length = self.scale.discretization.length_scales[i];

                let compression = -self.gamma_sc * length * div_v[i] / c_star;
                softplus(self.theta * (compression - self.beta)) / self.theta
                    * self.gamma_sc
                    * length
            })
            .collect()
    }
}

impl ShockCapturing for PhysicalViscosityDivergence {
    fn variant(&self) -> ArtificialViscosity {
        ArtificialViscosity::PhysicalDivergence
    }

    fn resolve(
        &self,
        cv: &ConservedFields,
        temperature_seed: &[f64],
        cached_gradient: Option<&ConservedGradient>,
        time: f64,
    ) -> ResolvedFluid {
        let plain = self.gas.fluid_state(cv, temperature_seed, None);
        let gradient = match cached_gradient {
            Some(g) => g.clone(),
            None => self.operator.gradient(&plain, time),
        };
        let indicator = self.indicator(&plain, &gradient);
        ResolvedFluid {
            fluid: self.gas.fluid_state(cv, temperature_seed, Some(&indicator)),
            gradient: Some(gradient),
        }
    }

    fn dissipation_rate(&self, fluid: &FluidState) -> Vec<f64> {
        self.scale.rate(fluid)
    }
}

/// ln(1 + e^x) without overflow.
#[inline]
fn softplus(x: f64) -> f64 {
    if x > 30.0 { x } else { x.exp().ln_1p() }
}

// =============================================================================
// Factory
// =============================================================================

/// Resolve the configured variant into its strategy.
pub fn shock_capturing_for(
    config: &SimulationConfig,
    gas: Arc<dyn GasModel>,
    operator: Arc<dyn SpatialOperator>,
    discretization: Arc<Discretization>,
) -> Box<dyn ShockCapturing> {
    let sc = &config.shock_capturing;
    let scale = DissipationScale {
        alpha: sc.alpha,
        discretization,
    };
    match sc.variant {
        ArtificialViscosity::Off => Box::new(NoShockCapturing { gas }),
        ArtificialViscosity::Laplacian => Box::new(LaplacianRegularization {
            gas,
            operator,
            scale,
            kappa: sc.kappa,
            s0: config.s0(),
        }),
        ArtificialViscosity::PhysicalDensity => Box::new(PhysicalViscosityDensity {
            gas,
            scale,
            kappa: sc.kappa,
            s0: config.s0(),
        }),
        ArtificialViscosity::PhysicalDivergence => Box::new(PhysicalViscosityDivergence {
            gas,
            operator,
            scale,
            stagnation_temperature: sc.stagnation_temperature,
            theta: sc.theta,
            beta: sc.beta,
            gamma_sc: sc.gamma,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShockCapturingParams;
    use crate::mesh::MeshPartition;
    use crate::physics::IdealGasModel;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Operator with zero tendency whose gradient reports a uniform
    /// compression ∂(ρu)/∂x = -rate.
    struct CompressingOperator {
        rate: f64,
        gradient_calls: AtomicUsize,
    }

    impl SpatialOperator for CompressingOperator {
        fn name(&self) -> &'static str {
            "compressing"
        }

        fn tendency(&self, fluid: &FluidState, _time: f64) -> ConservedFields {
            fluid.cv.zeros_like()
        }

        fn gradient(&self, fluid: &FluidState, _time: f64) -> ConservedGradient {
            self.gradient_calls.fetch_add(1, Ordering::SeqCst);
            let mut g = ConservedGradient::zeros(&fluid.cv);
            g.components[1][0] = vec![-self.rate; fluid.n_nodes()];
            g
        }

        fn dissipation(&self, fluid: &FluidState, coefficient: &[f64], _time: f64) -> ConservedFields {
            let mut out = fluid.cv.zeros_like();
            out.mass = coefficient.to_vec();
            out
        }
    }

    fn setup(variant: ArtificialViscosity) -> (Box<dyn ShockCapturing>, Arc<CompressingOperator>, Arc<Discretization>) {
        let config = SimulationConfig::default().with_shock_capturing(ShockCapturingParams {
            variant,
            ..ShockCapturingParams::default()
        });
        let gas: Arc<dyn GasModel> =
            Arc::new(IdealGasModel::from_config(&config).expect("simple transport"));
        let operator = Arc::new(CompressingOperator {
            rate: 1.0e4,
            gradient_calls: AtomicUsize::new(0),
        });
        let mesh = MeshPartition::uniform_box(&[0.0, 0.0], &[1.0, 1.0], &[2, 2]);
        let disc = Arc::new(Discretization::new(mesh, 1));
        let op: Arc<dyn SpatialOperator> = operator.clone();
        (shock_capturing_for(&config, gas, op, Arc::clone(&disc)), operator, disc)
    }

    fn uniform_flow(n: usize) -> ConservedFields {
        let mut cv = ConservedFields::zeros(2, 0, n);
        cv.mass = vec![1.0; n];
        cv.momentum[0] = vec![100.0; n];
        cv.energy = vec![2.5e5 + 0.5 * 100.0 * 100.0; n];
        cv
    }

    #[test]
    fn test_off_has_no_dissipation() {
        let (sc, _, disc) = setup(ArtificialViscosity::Off);
        let cv = uniform_flow(disc.n_dofs());
        let resolved = sc.resolve(&cv, &vec![300.0; cv.n_nodes()], None, 0.0);
        assert!(sc.tendency(&resolved.fluid, 0.0).is_none());
        assert!(sc.dissipation_rate(&resolved.fluid).iter().all(|&a| a == 0.0));
    }

    #[test]
    fn test_enabled_rate_scales_with_speed_and_length() {
        let (sc, _, disc) = setup(ArtificialViscosity::PhysicalDensity);
        let cv = uniform_flow(disc.n_dofs());
        let resolved = sc.resolve(&cv, &vec![300.0; cv.n_nodes()], None, 0.0);
        let rate = sc.dissipation_rate(&resolved.fluid);
        // alpha 0.3, |u| = 100, L = 0.5
        assert!(rate.iter().all(|&a| (a - 15.0).abs() < 1e-9));
    }

    #[test]
    fn test_laplacian_smooth_flow_has_zero_coefficient() {
        let (sc, _, disc) = setup(ArtificialViscosity::Laplacian);
        let cv = uniform_flow(disc.n_dofs());
        let resolved = sc.resolve(&cv, &vec![300.0; cv.n_nodes()], None, 0.0);
        let tendency = sc.tendency(&resolved.fluid, 0.0).expect("laplacian adds a tendency");
        assert!(tendency.mass.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_divergence_variant_reuses_cached_gradient() {
        let (sc, operator, disc) = setup(ArtificialViscosity::PhysicalDivergence);
        let cv = uniform_flow(disc.n_dofs());
        let seed = vec![300.0; cv.n_nodes()];

        let first = sc.resolve(&cv, &seed, None, 0.0);
        assert_eq!(operator.gradient_calls.load(Ordering::SeqCst), 1);
        let gradient = first.gradient.clone().expect("gradient computed");

        let second = sc.resolve(&cv, &seed, Some(&gradient), 0.0);
        assert_eq!(operator.gradient_calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.fluid, second.fluid);

        // Compression raises viscosity above the physical value
        let plain = setup(ArtificialViscosity::Off).0.resolve(&cv, &seed, None, 0.0);
        assert!(first.fluid.viscosity[0] > plain.fluid.viscosity[0]);
    }

    #[test]
    fn test_softplus_is_stable() {
        assert!((softplus(0.0) - 2.0_f64.ln()).abs() < 1e-15);
        assert_eq!(softplus(1000.0), 1000.0);
        assert!(softplus(-1000.0) >= 0.0);
    }
}
