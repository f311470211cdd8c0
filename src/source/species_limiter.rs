//! Species mass fraction limiter.
//!
//! Mass fractions are clamped to [0, 1] and renormalized to sum to one.
//! The conserved state is rebuilt at the same pressure, temperature and
//! velocity, and a relaxation source `rate·ρ·(Y_lim - Y)` drives the
//! species densities toward the limited composition. The mass, momentum
//! and energy components of the source carry the matching perturbation so
//! the source stays consistent with the species change.

use std::sync::Arc;

use crate::physics::GasModel;
use crate::state::{ConservedFields, FluidState};

/// Clamp mass fractions to [0, 1] and rescale them to sum to one.
///
/// A composition that clamps to all zeros becomes uniform.
pub fn limit_mass_fractions(y: &mut [f64]) {
    if y.is_empty() {
        return;
    }
    let mut sum = 0.0;
    for v in y.iter_mut() {
        *v = v.clamp(0.0, 1.0);
        sum += *v;
    }
    if sum > 0.0 {
        y.iter_mut().for_each(|v| *v /= sum);
    } else {
        let uniform = 1.0 / y.len() as f64;
        y.iter_mut().for_each(|v| *v = uniform);
    }
}

/// Limited conserved state and the relaxation source toward it.
#[derive(Clone, Debug, PartialEq)]
pub struct LimitedSpecies {
    pub cv: ConservedFields,
    pub source: ConservedFields,
}

/// Bound-preserving species limiter with a relaxation rate.
pub struct SpeciesLimiter {
    rate: f64,
    gas: Arc<dyn GasModel>,
}

impl SpeciesLimiter {
    /// `rate` is the relaxation rate [1/s], 1/(nlimit·dt) in a run.
    pub fn new(rate: f64, gas: Arc<dyn GasModel>) -> Self {
        Self { rate, gas }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Limit the composition of `fluid`.
    pub fn apply(&self, fluid: &FluidState) -> LimitedSpecies {
        let cv = &fluid.cv;
        let n = cv.n_nodes();
        let dim = cv.dim();
        let nspecies = cv.nspecies();

        let mut limited = cv.zeros_like();
        let mut source = cv.zeros_like();

        let mut y = vec![0.0; nspecies];
        let mut u = vec![0.0; dim];
        for i in 0..n {
            let rho = cv.mass[i];
            for (s, ys) in y.iter_mut().enumerate() {
                *ys = cv.mass_fraction(s, i);
            }
            let mut y_lim = y.clone();
            limit_mass_fractions(&mut y_lim);

            for (a, ua) in u.iter_mut().enumerate() {
                *ua = cv.velocity(a, i);
            }
            let kinetic = 0.5 * u.iter().map(|v| v * v).sum::<f64>();

            // Rebuild at the same p, T and u
            let (p, t) = (fluid.pressure[i], fluid.temperature[i]);
            let rho_lim = self.gas.density(p, t, &y_lim);
            let e_lim = self.gas.internal_energy(t, &y_lim);
            limited.mass[i] = rho_lim;
            for a in 0..dim {
                limited.momentum[a][i] = rho_lim * u[a];
            }
            limited.energy[i] = rho_lim * (e_lim + kinetic);
            for s in 0..nspecies {
                limited.species_mass[s][i] = rho_lim * y_lim[s];
            }

            // Relaxation source
            let mut mass_src = 0.0;
            let mut energy_src = 0.0;
            for s in 0..nspecies {
                let src = self.rate * rho * (y_lim[s] - y[s]);
                source.species_mass[s][i] = src;
                mass_src += src;
                energy_src += src * fluid.species_enthalpies[s][i];
            }
            source.mass[i] = mass_src;
            for a in 0..dim {
                source.momentum[a][i] = u[a] * mass_src;
            }
            source.energy[i] = energy_src + kinetic * mass_src;
        }

        LimitedSpecies {
            cv: limited,
            source,
        }
    }
}
