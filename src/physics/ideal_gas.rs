//! Single calorically perfect gas with passive species.

use super::GasModel;
use crate::config::{ConfigError, SimulationConfig, TransportKind};
use crate::state::{ConservedFields, FluidState};

/// Molecular transport coefficients of the physical gas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransportModel {
    /// Constant μ, κ and species diffusivity.
    Simple {
        viscosity: f64,
        conductivity: f64,
        species_diffusivity: f64,
    },
    /// μ = β·T^n, κ = σ·μ·c_v.
    PowerLaw {
        beta: f64,
        n: f64,
        sigma: f64,
        species_diffusivity: f64,
    },
}

/// Artificial viscosity augmentation of the transport coefficients:
/// μ + μ_av·s and κ + c_p·μ_av·s / Pr_av for indicator s.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ArtificialTransport {
    viscosity: f64,
    prandtl: f64,
}

/// Ideal gas `p = ρRT` with constant γ; species are passive scalars.
#[derive(Clone, Debug, PartialEq)]
pub struct IdealGasModel {
    gamma: f64,
    gas_constant: f64,
    transport: TransportModel,
    artificial: Option<ArtificialTransport>,
}

/// Universal gas constant [J/(kmol·K)].
const UNIVERSAL_GAS_CONSTANT: f64 = 8314.59;

impl IdealGasModel {
    pub fn new(gamma: f64, gas_constant: f64, transport: TransportModel) -> Self {
        Self {
            gamma,
            gas_constant,
            transport,
            artificial: None,
        }
    }

    /// O2/N2 working gas (27.3% O2 by mass, γ = 1.4) with the configured
    /// transport model and artificial viscosity augmentation.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        let gamma = 1.4;
        let mf_o2 = 0.273;
        let mw = 2.0 * 15.999 * mf_o2 + 2.0 * 14.0067 * (1.0 - mf_o2);
        let gas_constant = UNIVERSAL_GAS_CONSTANT / mw;
        let cp = gas_constant * gamma / (gamma - 1.0);

        let tp = &config.transport;
        let transport = match tp.kind {
            TransportKind::Simple => TransportModel::Simple {
                viscosity: tp.viscosity,
                conductivity: cp * tp.viscosity / tp.prandtl,
                species_diffusivity: tp.species_diffusivity,
            },
            TransportKind::PowerLaw => TransportModel::PowerLaw {
                beta: tp.power_law_beta,
                n: tp.power_law_n,
                sigma: tp.power_law_sigma,
                species_diffusivity: tp.species_diffusivity,
            },
            TransportKind::Mixture => {
                return Err(ConfigError::InvalidValue {
                    key: "transport".to_string(),
                    reason: "mixture transport requires a thermochemistry gas model".to_string(),
                });
            }
        };

        let mut model = Self::new(gamma, gas_constant, transport);
        let sc = &config.shock_capturing;
        if sc.variant.augments_transport() {
            model = model.with_artificial_viscosity(sc.alpha, sc.prandtl);
        }
        Ok(model)
    }

    /// Augment transport with artificial viscosity `viscosity·s`.
    pub fn with_artificial_viscosity(mut self, viscosity: f64, prandtl: f64) -> Self {
        self.artificial = Some(ArtificialTransport { viscosity, prandtl });
        self
    }

    #[inline]
    fn cv(&self) -> f64 {
        self.gas_constant / (self.gamma - 1.0)
    }

    #[inline]
    fn cp(&self) -> f64 {
        self.gamma * self.cv()
    }

    /// Physical (μ, κ, D) at temperature `t`.
    fn transport_at(&self, t: f64) -> (f64, f64, f64) {
        match self.transport {
            TransportModel::Simple {
                viscosity,
                conductivity,
                species_diffusivity,
            } => (viscosity, conductivity, species_diffusivity),
            TransportModel::PowerLaw {
                beta,
                n,
                sigma,
                species_diffusivity,
            } => {
                let mu = beta * t.powf(n);
                (mu, sigma * mu * self.cv(), species_diffusivity)
            }
        }
    }
}

impl GasModel for IdealGasModel {
    fn name(&self) -> &'static str {
        "ideal-gas"
    }

    fn fluid_state(
        &self,
        cv: &ConservedFields,
        _temperature_seed: &[f64],
        smoothness: Option<&[f64]>,
    ) -> FluidState {
        let n = cv.n_nodes();
        let nspecies = cv.nspecies();
        let c_v = self.cv();
        let c_p = self.cp();

        let mut pressure = Vec::with_capacity(n);
        let mut temperature = Vec::with_capacity(n);
        let mut sound_speed = Vec::with_capacity(n);
        let mut viscosity = Vec::with_capacity(n);
        let mut thermal_conductivity = Vec::with_capacity(n);
        let mut diffusivity = Vec::with_capacity(n);

        for i in 0..n {
            let rho = cv.mass[i];
            let kinetic = 0.5 * rho * cv.speed_squared(i);
            let e_int = (cv.energy[i] - kinetic) / rho;
            let t = e_int / c_v;
            let p = rho * self.gas_constant * t;

            let (mut mu, mut kappa, d) = self.transport_at(t);
            if let (Some(av), Some(s)) = (self.artificial, smoothness) {
                let mu_av = av.viscosity * s[i];
                mu += mu_av;
                kappa += c_p * mu_av / av.prandtl;
            }

            temperature.push(t);
            pressure.push(p);
            sound_speed.push((self.gamma * p / rho).sqrt());
            viscosity.push(mu);
            thermal_conductivity.push(kappa);
            diffusivity.push(d);
        }

        let enthalpy: Vec<f64> = temperature.iter().map(|t| c_p * t).collect();
        let species_enthalpies = vec![enthalpy; nspecies];
        let species_diffusivity = vec![diffusivity; nspecies];
        let smoothness = match smoothness {
            Some(s) => s.to_vec(),
            None => vec![0.0; n],
        };

        FluidState {
            cv: cv.clone(),
            pressure,
            temperature,
            sound_speed,
            viscosity,
            thermal_conductivity,
            species_diffusivity,
            species_enthalpies,
            smoothness,
        }
    }

    fn species_source_terms(&self, cv: &ConservedFields, _temperature: &[f64]) -> ConservedFields {
        cv.zeros_like()
    }

    fn temperature_residual(&self, cv: &ConservedFields, temperature: &[f64]) -> Vec<f64> {
        // The temperature is explicit in the energy; one Newton step from
        // any guess lands on it exactly.
        let c_v = self.cv();
        (0..cv.n_nodes())
            .map(|i| {
                let rho = cv.mass[i];
                let e_int = (cv.energy[i] - 0.5 * rho * cv.speed_squared(i)) / rho;
                e_int / c_v - temperature[i]
            })
            .collect()
    }

    fn density(&self, pressure: f64, temperature: f64, _mass_fractions: &[f64]) -> f64 {
        pressure / (self.gas_constant * temperature)
    }

    fn internal_energy(&self, temperature: f64, _mass_fractions: &[f64]) -> f64 {
        self.cv() * temperature
    }

    fn gamma(&self, _mass_fractions: &[f64], _temperature: f64) -> f64 {
        self.gamma
    }

    fn gas_constant(&self, _mass_fractions: &[f64]) -> f64 {
        self.gas_constant
    }

    fn species_names(&self, nspecies: usize) -> Vec<String> {
        match nspecies {
            2 => vec!["air".to_string(), "fuel".to_string()],
            _ => (0..nspecies).map(|s| format!("species_{}", s)).collect(),
        }
    }
}
