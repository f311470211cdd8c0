use super::ConservedFields;

/// Conserved fields with their derived thermodynamic and transport fields.
///
/// Produced by a gas model from conserved fields and a temperature seed.
/// `smoothness` is the artificial viscosity indicator the transport
/// coefficients were augmented with (zero when none is active).
#[derive(Clone, Debug, PartialEq)]
pub struct FluidState {
    pub cv: ConservedFields,
    pub pressure: Vec<f64>,
    pub temperature: Vec<f64>,
    pub sound_speed: Vec<f64>,
    pub viscosity: Vec<f64>,
    pub thermal_conductivity: Vec<f64>,
    /// Per species, per node
    pub species_diffusivity: Vec<Vec<f64>>,
    /// Per species, per node
    pub species_enthalpies: Vec<Vec<f64>>,
    pub smoothness: Vec<f64>,
}

impl FluidState {
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.cv.n_nodes()
    }

    /// |u| at one node.
    #[inline]
    pub fn speed(&self, node: usize) -> f64 {
        self.cv.speed_squared(node).sqrt()
    }

    /// Flow speed field.
    pub fn speed_field(&self) -> Vec<f64> {
        (0..self.n_nodes()).map(|i| self.speed(i)).collect()
    }

    /// Acoustic wavespeed |u| + c at one node.
    #[inline]
    pub fn wavespeed(&self, node: usize) -> f64 {
        self.speed(node) + self.sound_speed[node]
    }

    /// Mach number field.
    pub fn mach_field(&self) -> Vec<f64> {
        (0..self.n_nodes())
            .map(|i| self.speed(i) / self.sound_speed[i])
            .collect()
    }

    /// Kinematic viscosity ν = μ/ρ at one node.
    #[inline]
    pub fn kinematic_viscosity(&self, node: usize) -> f64 {
        self.viscosity[node] / self.cv.mass[node]
    }

    /// Largest species diffusivity at one node; zero without species.
    #[inline]
    pub fn max_species_diffusivity(&self, node: usize) -> f64 {
        self.species_diffusivity
            .iter()
            .map(|d| d[node])
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
impl FluidState {
    /// Fluid state around `cv` with placeholder thermodynamics.
    pub(crate) fn placeholder(cv: ConservedFields) -> Self {
        let n = cv.n_nodes();
        let nspecies = cv.nspecies();
        Self {
            cv,
            pressure: vec![1.0e5; n],
            temperature: vec![300.0; n],
            sound_speed: vec![340.0; n],
            viscosity: vec![0.0; n],
            thermal_conductivity: vec![0.0; n],
            species_diffusivity: vec![vec![0.0; n]; nspecies],
            species_enthalpies: vec![vec![0.0; n]; nspecies],
            smoothness: vec![0.0; n],
        }
    }
}
