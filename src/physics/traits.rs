//! Trait interfaces of the physics collaborators.

use crate::state::{ConservedFields, FluidState, SimulationState};

// =============================================================================
// Gas model
// =============================================================================

/// Equation of state, transport model and chemistry of the working fluid.
///
/// Node-wise helpers take mass fractions as a slice with one entry per
/// species (empty for a single gas).
pub trait GasModel: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Derive the full fluid state.
    ///
    /// `temperature_seed` warm-starts any iterative temperature solve.
    /// `smoothness` is the artificial viscosity indicator used to augment
    /// transport; `None` means no augmentation.
    fn fluid_state(
        &self,
        cv: &ConservedFields,
        temperature_seed: &[f64],
        smoothness: Option<&[f64]>,
    ) -> FluidState;

    /// Chemical production rates as a conserved-variable tendency.
    fn species_source_terms(&self, cv: &ConservedFields, temperature: &[f64]) -> ConservedFields;

    /// Temperature update ΔT of one Newton iteration from `temperature`.
    ///
    /// Zero when the temperature is exact.
    fn temperature_residual(&self, cv: &ConservedFields, temperature: &[f64]) -> Vec<f64>;

    /// Density from pressure, temperature and composition.
    fn density(&self, pressure: f64, temperature: f64, mass_fractions: &[f64]) -> f64;

    /// Specific internal energy from temperature and composition.
    fn internal_energy(&self, temperature: f64, mass_fractions: &[f64]) -> f64;

    /// Ratio of specific heats.
    fn gamma(&self, mass_fractions: &[f64], temperature: f64) -> f64;

    /// Specific gas constant of the mixture.
    fn gas_constant(&self, mass_fractions: &[f64]) -> f64;

    /// Species names, used for field labels.
    fn species_names(&self, nspecies: usize) -> Vec<String> {
        (0..nspecies).map(|s| format!("species_{}", s)).collect()
    }
}

// =============================================================================
// Spatial operator
// =============================================================================

/// Gradient of every conserved component.
///
/// `components[c][axis][node]`, with components in
/// [`ConservedFields::components`] order.
#[derive(Clone, Debug, PartialEq)]
pub struct ConservedGradient {
    pub components: Vec<Vec<Vec<f64>>>,
}

impl ConservedGradient {
    /// All-zero gradient shaped like `cv`.
    pub fn zeros(cv: &ConservedFields) -> Self {
        let n = cv.n_nodes();
        let dim = cv.dim();
        Self {
            components: cv.components().map(|_| vec![vec![0.0; n]; dim]).collect(),
        }
    }

    /// ∇·u from the gradients of mass and momentum.
    ///
    /// ∂u_a/∂x_a = (∂(ρu_a)/∂x_a - u_a ∂ρ/∂x_a) / ρ
    pub fn velocity_divergence(&self, cv: &ConservedFields) -> Vec<f64> {
        let dim = cv.dim();
        let grad_mass = &self.components[0];
        (0..cv.n_nodes())
            .map(|i| {
                let rho = cv.mass[i];
                (0..dim)
                    .map(|a| {
                        let grad_mom = self.components[1 + a][a][i];
                        let u = cv.momentum[a][i] / rho;
                        (grad_mom - u * grad_mass[a][i]) / rho
                    })
                    .sum()
            })
            .collect()
    }
}

/// Spatial discretization of the flow equations.
///
/// Implementations own their boundary conditions and numerical fluxes.
pub trait SpatialOperator: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Inviscid plus viscous tendency of the conserved fields.
    fn tendency(&self, fluid: &FluidState, time: f64) -> ConservedFields;

    /// Tendency reusing an already computed gradient of the conserved
    /// fields. Defaults to [`SpatialOperator::tendency`].
    fn tendency_with_gradient(
        &self,
        fluid: &FluidState,
        _gradient: &ConservedGradient,
        time: f64,
    ) -> ConservedFields {
        self.tendency(fluid, time)
    }

    /// Gradient of the conserved fields.
    fn gradient(&self, fluid: &FluidState, time: f64) -> ConservedGradient;

    /// Laplacian-type dissipation ∇·(ε∇q) with node-wise coefficient ε.
    fn dissipation(&self, fluid: &FluidState, coefficient: &[f64], time: f64) -> ConservedFields;
}

// =============================================================================
// Order conversion
// =============================================================================

/// Maps nodal fields between two polynomial orders on the same elements.
pub trait OrderConversion {
    fn source_order(&self) -> usize;

    fn target_order(&self) -> usize;

    /// Convert one scalar nodal field.
    fn convert(&self, field: &[f64]) -> Vec<f64>;

    /// Convert every field of a state.
    fn convert_state(&self, state: &SimulationState) -> SimulationState {
        SimulationState {
            cv: state.cv.map_components(|c| self.convert(c)),
            temperature_seed: self.convert(&state.temperature_seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_divergence_of_linear_flow() {
        // u = (x, 0) at rho = 2: ρu_x = 2x, ∂(ρu_x)/∂x = 2, ∇ρ = 0, div u = 1
        let mut cv = ConservedFields::zeros(2, 0, 3);
        cv.mass = vec![2.0; 3];
        cv.momentum[0] = vec![0.0, 1.0, 2.0];

        let mut grad = ConservedGradient::zeros(&cv);
        grad.components[1][0] = vec![2.0; 3];

        let div = grad.velocity_divergence(&cv);
        assert!(div.iter().all(|&d| (d - 1.0).abs() < 1e-14));
    }

    #[test]
    fn test_divergence_accounts_for_density_gradient() {
        // ρ = x + 1, ρu = ρ (u = 1): div u = 0
        let mut cv = ConservedFields::zeros(1, 0, 2);
        cv.mass = vec![1.0, 2.0];
        cv.momentum[0] = vec![1.0, 2.0];

        let mut grad = ConservedGradient::zeros(&cv);
        grad.components[0][0] = vec![1.0; 2];
        grad.components[1][0] = vec![1.0; 2];

        assert!(grad.velocity_divergence(&cv).iter().all(|d| d.abs() < 1e-14));
    }
}
