//! Conserved variables on the rank-local nodes.

use serde::{Deserialize, Serialize};

use crate::time::Integrable;

/// Conserved variables, one value per node per component.
///
/// - `mass`: ρ
/// - `momentum[axis]`: ρu_axis
/// - `energy`: ρE (total energy density)
/// - `species_mass[s]`: ρY_s
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConservedFields {
    pub mass: Vec<f64>,
    pub momentum: Vec<Vec<f64>>,
    pub energy: Vec<f64>,
    pub species_mass: Vec<Vec<f64>>,
}

impl ConservedFields {
    /// All-zero fields for `n` nodes.
    pub fn zeros(dim: usize, nspecies: usize, n: usize) -> Self {
        Self {
            mass: vec![0.0; n],
            momentum: vec![vec![0.0; n]; dim],
            energy: vec![0.0; n],
            species_mass: vec![vec![0.0; n]; nspecies],
        }
    }

    /// Zero fields with the same shape as `self`.
    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.dim(), self.nspecies(), self.n_nodes())
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.mass.len()
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.momentum.len()
    }

    #[inline]
    pub fn nspecies(&self) -> usize {
        self.species_mass.len()
    }

    /// Every component field in a fixed order: mass, momentum, energy,
    /// species.
    pub fn components(&self) -> impl Iterator<Item = &Vec<f64>> {
        std::iter::once(&self.mass)
            .chain(self.momentum.iter())
            .chain(std::iter::once(&self.energy))
            .chain(self.species_mass.iter())
    }

    /// Mutable counterpart of [`ConservedFields::components`].
    pub fn components_mut(&mut self) -> impl Iterator<Item = &mut Vec<f64>> {
        std::iter::once(&mut self.mass)
            .chain(self.momentum.iter_mut())
            .chain(std::iter::once(&mut self.energy))
            .chain(self.species_mass.iter_mut())
    }

    /// Build fields component by component, in [`ConservedFields::components`]
    /// order.
    pub fn from_components(dim: usize, mut components: Vec<Vec<f64>>) -> Self {
        let species_mass = components.split_off(dim + 2);
        let energy = components.pop().unwrap_or_default();
        let momentum = components.split_off(1);
        let mass = components.pop().unwrap_or_default();
        Self {
            mass,
            momentum,
            energy,
            species_mass,
        }
    }

    /// Apply `f` to every component field.
    pub fn map_components(&self, mut f: impl FnMut(&[f64]) -> Vec<f64>) -> Self {
        let components = self.components().map(|c| f(c.as_slice())).collect();
        Self::from_components(self.dim(), components)
    }

    /// self <- c * self
    pub fn scale(&mut self, c: f64) {
        for field in self.components_mut() {
            field.iter_mut().for_each(|v| *v *= c);
        }
    }

    /// self <- self + c * other
    pub fn axpy(&mut self, c: f64, other: &Self) {
        for (field, src) in self.components_mut().zip(other.components()) {
            for (v, s) in field.iter_mut().zip(src) {
                *v += c * s;
            }
        }
    }

    /// self <- self + other
    pub fn add_assign(&mut self, other: &Self) {
        self.axpy(1.0, other);
    }

    /// Velocity component at one node.
    #[inline]
    pub fn velocity(&self, axis: usize, node: usize) -> f64 {
        self.momentum[axis][node] / self.mass[node]
    }

    /// Velocity field along one axis.
    pub fn velocity_field(&self, axis: usize) -> Vec<f64> {
        self.momentum[axis]
            .iter()
            .zip(&self.mass)
            .map(|(m, rho)| m / rho)
            .collect()
    }

    /// |u|² at one node.
    #[inline]
    pub fn speed_squared(&self, node: usize) -> f64 {
        (0..self.dim())
            .map(|axis| {
                let u = self.velocity(axis, node);
                u * u
            })
            .sum()
    }

    /// Y_s at one node.
    #[inline]
    pub fn mass_fraction(&self, species: usize, node: usize) -> f64 {
        self.species_mass[species][node] / self.mass[node]
    }

    /// Mass fraction field of one species.
    pub fn mass_fraction_field(&self, species: usize) -> Vec<f64> {
        self.species_mass[species]
            .iter()
            .zip(&self.mass)
            .map(|(ry, rho)| ry / rho)
            .collect()
    }

    /// Mass fractions of every species at one node.
    pub fn mass_fractions_at(&self, node: usize) -> Vec<f64> {
        (0..self.nspecies())
            .map(|s| self.mass_fraction(s, node))
            .collect()
    }

    /// True when every component value is finite.
    pub fn is_finite(&self) -> bool {
        self.components().all(|c| c.iter().all(|v| v.is_finite()))
    }
}

/// The integrated state: conserved fields plus the temperature seed that
/// warm-starts the temperature solve.
///
/// The seed is advanced with tendency `T_solved - T_seed`, so it tracks the
/// solved temperature without an extra solve per stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub cv: ConservedFields,
    pub temperature_seed: Vec<f64>,
}

impl SimulationState {
    pub fn new(cv: ConservedFields, temperature_seed: Vec<f64>) -> Self {
        debug_assert_eq!(cv.n_nodes(), temperature_seed.len());
        Self {
            cv,
            temperature_seed,
        }
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.cv.n_nodes()
    }
}

impl Integrable for SimulationState {
    fn scale(&mut self, c: f64) {
        self.cv.scale(c);
        self.temperature_seed.iter_mut().for_each(|v| *v *= c);
    }

    fn axpy(&mut self, c: f64, other: &Self) {
        self.cv.axpy(c, &other.cv);
        for (v, s) in self.temperature_seed.iter_mut().zip(&other.temperature_seed) {
            *v += c * s;
        }
    }
}
