//! Typed run configuration with the driver defaults.

use std::path::PathBuf;

use tracing::{info, warn};

use super::options::OptionReader;
use super::{
    ArtificialViscosity, ConfigError, FluxFunction, IntegratorKind, OptionMap, TimestepMode,
    TransportKind,
};
use crate::types::ValueRange;

// =============================================================================
// Parameter groups
// =============================================================================

/// Step cadences of the periodic pre-step actions. Zero disables an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputIntervals {
    /// Visualization snapshots
    pub nviz: u64,
    /// Checkpoints
    pub nrestart: u64,
    /// Health checks
    pub nhealth: u64,
    /// Status reports
    pub nstatus: u64,
    /// Species limiter relaxation horizon in steps (0 disables limiting)
    pub nlimit: u64,
}

impl Default for OutputIntervals {
    fn default() -> Self {
        Self {
            nviz: 500,
            nrestart: 5000,
            nhealth: 1,
            nstatus: 1,
            nlimit: 0,
        }
    }
}

/// Admissible ranges checked by the health monitor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthBounds {
    pub pressure: ValueRange,
    pub temperature: ValueRange,
    pub mass_fraction: ValueRange,
    /// Largest admissible normalized temperature residual |ΔT|/T
    pub temperature_tolerance: f64,
}

impl Default for HealthBounds {
    fn default() -> Self {
        Self {
            pressure: ValueRange::new(1.0e-1, 2.0e6),
            temperature: ValueRange::new(1.0, 5000.0),
            mass_fraction: ValueRange::new(-10.0, 10.0),
            temperature_tolerance: 1.0e-4,
        }
    }
}

/// Physical transport coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransportParams {
    pub kind: TransportKind,
    /// Dynamic viscosity for the simple model [Pa·s]
    pub viscosity: f64,
    /// Diffusivity shared by every species [m²/s]
    pub species_diffusivity: f64,
    /// Prandtl number linking conductivity to viscosity
    pub prandtl: f64,
    /// Power law bulk viscosity ratio
    pub power_law_alpha: f64,
    /// Power law prefactor: μ = β·T^n
    pub power_law_beta: f64,
    /// Power law conductivity factor: κ = σ·μ·c_v
    pub power_law_sigma: f64,
    /// Power law exponent
    pub power_law_n: f64,
}

impl Default for TransportParams {
    fn default() -> Self {
        // O2/N2 mixture at 400C with 27.3% O2 by mass
        let mf_o2 = 0.273;
        let viscosity = 3.76e-5 * mf_o2 + 3.19e-5 * (1.0 - mf_o2);
        Self {
            kind: TransportKind::Simple,
            viscosity,
            species_diffusivity: 1.0e-4,
            prandtl: 0.75,
            power_law_alpha: 0.6,
            power_law_beta: 4.093e-7,
            power_law_sigma: 2.0,
            power_law_n: 0.666,
        }
    }
}

/// Shock capturing (artificial viscosity) controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShockCapturingParams {
    pub variant: ArtificialViscosity,
    /// Artificial viscosity magnitude
    pub alpha: f64,
    /// Half-width of the indicator activation ramp, in log10 units
    pub kappa: f64,
    /// Prandtl number of the artificial conductivity
    pub prandtl: f64,
    /// Flow stagnation temperature for the divergence indicator [K]
    pub stagnation_temperature: f64,
    /// Steepness of the softplus ramp in the divergence indicator
    pub theta: f64,
    /// Activation offset of the divergence indicator
    pub beta: f64,
    /// Scale of the divergence indicator
    pub gamma: f64,
}

impl Default for ShockCapturingParams {
    fn default() -> Self {
        Self {
            variant: ArtificialViscosity::Off,
            alpha: 0.3,
            kappa: 0.5,
            prandtl: 0.75,
            stagnation_temperature: 2076.43,
            theta: 100.0,
            beta: 0.01,
            gamma: 1.5,
        }
    }
}

impl ShockCapturingParams {
    /// Indicator activation center: log10(1e-4 / order⁴).
    pub fn s0(&self, order: usize) -> f64 {
        (1.0e-4 / (order as f64).powi(4)).log10()
    }
}

/// Outflow sponge controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpongeParams {
    pub enabled: bool,
    /// Nondimensional strength; amplitude = sigma / dt / 1000
    pub sigma: f64,
    /// Sponge onset along x
    pub x0: f64,
    /// Ramp thickness
    pub thickness: f64,
}

impl Default for SpongeParams {
    fn default() -> Self {
        Self {
            enabled: true,
            sigma: 1.0,
            x0: 0.9,
            thickness: 0.09,
        }
    }
}

impl SpongeParams {
    /// Relaxation amplitude for step size `dt`.
    pub fn amplitude(&self, dt: f64) -> f64 {
        self.sigma / dt / 1000.0
    }
}

/// Gaussian spark ignition controls.
#[derive(Clone, Debug, PartialEq)]
pub struct IgnitionParams {
    pub enabled: bool,
    /// Spark center, one coordinate per dimension
    pub center: Vec<f64>,
    /// Full width at half maximum of the spatial profile
    pub diameter: f64,
    /// Deposited energy scale; amplitude = strength / dt
    pub strength: f64,
    /// Time of peak deposition
    pub init_time: f64,
    /// Full duration of the deposition pulse
    pub duration: f64,
}

impl IgnitionParams {
    /// Defaults for a `dim`-dimensional domain.
    pub fn for_dim(dim: usize) -> Self {
        let mut center = vec![0.677, -0.021, 0.035 / 2.0];
        center.truncate(dim);
        center.resize(dim, 0.0);
        Self {
            enabled: false,
            center,
            diameter: 0.0025,
            strength: 3.0e7,
            init_time: 999_999_999.0,
            duration: 1.0e-8,
        }
    }

    /// Gaussian standard deviation in space: half the energy falls within
    /// `diameter`.
    pub fn width(&self) -> f64 {
        self.diameter / 2.355
    }

    /// Gaussian standard deviation in time.
    pub fn time_width(&self) -> f64 {
        self.duration / 6.0697
    }

    /// Peak amplitude for step size `dt`.
    pub fn amplitude(&self, dt: f64) -> f64 {
        self.strength / dt
    }
}

// =============================================================================
// Simulation configuration
// =============================================================================

/// Complete run configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Prefix of checkpoint and visualization names
    pub casename: String,
    /// Directory for checkpoint files
    pub restart_dir: PathBuf,
    pub intervals: OutputIntervals,
    pub integrator: IntegratorKind,
    pub flux: FluxFunction,
    /// Configured step size; also scales the sponge, spark and limiter rates
    pub dt: f64,
    /// Target CFL under constant-CFL stepping
    pub cfl: f64,
    /// Adapt dt to hold the CFL instead of holding dt
    pub constant_cfl: bool,
    pub t_final: f64,
    /// Loop ends once `t_final - t` is within this tolerance
    pub finish_tolerance: f64,
    /// Polynomial order
    pub order: usize,
    /// Spatial dimension
    pub dim: usize,
    /// Number of transported species
    pub nspecies: usize,
    /// Newton iterations of the temperature solve
    pub temperature_iterations: usize,
    /// Chemistry source request; effective only for reactive mixtures
    pub use_combustion: bool,
    pub health: HealthBounds,
    pub transport: TransportParams,
    pub shock_capturing: ShockCapturingParams,
    pub sponge: SpongeParams,
    pub ignition: IgnitionParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            casename: "simulation".to_string(),
            restart_dir: PathBuf::from("restart_data"),
            intervals: OutputIntervals::default(),
            integrator: IntegratorKind::Rk4,
            flux: FluxFunction::Rusanov,
            dt: 1.0e-8,
            cfl: 1.0,
            constant_cfl: false,
            t_final: 1.0e-7,
            finish_tolerance: 1.0e-16,
            order: 1,
            dim: 2,
            nspecies: 0,
            temperature_iterations: 3,
            use_combustion: true,
            health: HealthBounds::default(),
            transport: TransportParams::default(),
            shock_capturing: ShockCapturingParams::default(),
            sponge: SpongeParams::default(),
            ignition: IgnitionParams::for_dim(2),
        }
    }
}

/// Option names understood by [`SimulationConfig::from_options`].
const KNOWN_OPTIONS: &[&str] = &[
    "nviz",
    "nrestart",
    "nhealth",
    "nstatus",
    "nlimit",
    "current_dt",
    "current_cfl",
    "constant_cfl",
    "t_final",
    "integrator",
    "inviscid_numerical_flux",
    "order",
    "dimen",
    "alpha_sc",
    "kappa_sc",
    "s0_sc",
    "mu",
    "spec_diff",
    "nspecies",
    "transport",
    "pyro_temp_iter",
    "pyro_temp_tol",
    "health_pres_min",
    "health_pres_max",
    "health_temp_min",
    "health_temp_max",
    "health_mass_frac_min",
    "health_mass_frac_max",
    "use_ignition",
    "ignition_init_time",
    "use_sponge",
    "sponge_sigma",
    "use_av",
    "use_combustion",
];

impl SimulationConfig {
    /// Build a configuration from a flat option set.
    ///
    /// Absent keys keep the defaults. Unknown keys are logged and ignored.
    pub fn from_options(options: &OptionMap) -> Result<Self, ConfigError> {
        let r = OptionReader::new(options);
        let mut cfg = Self::default();

        for key in r.unknown_keys(KNOWN_OPTIONS) {
            warn!(key, "Ignoring unknown option");
        }

        // Output cadence
        if let Some(v) = r.usize("nviz")? {
            cfg.intervals.nviz = v as u64;
        }
        if let Some(v) = r.usize("nrestart")? {
            cfg.intervals.nrestart = v as u64;
        }
        if let Some(v) = r.usize("nhealth")? {
            cfg.intervals.nhealth = v as u64;
        }
        if let Some(v) = r.usize("nstatus")? {
            cfg.intervals.nstatus = v as u64;
        }
        if let Some(v) = r.usize("nlimit")? {
            cfg.intervals.nlimit = v as u64;
        }

        // Time stepping
        if let Some(v) = r.f64("current_dt")? {
            cfg.dt = v;
        }
        if let Some(v) = r.f64("current_cfl")? {
            cfg.cfl = v;
        }
        if let Some(v) = r.bool("constant_cfl")? {
            cfg.constant_cfl = v;
        }
        if let Some(v) = r.f64("t_final")? {
            cfg.t_final = v;
        }
        if let Some(v) = r.str("integrator")? {
            cfg.integrator = v.parse()?;
        }
        if let Some(v) = r.str("inviscid_numerical_flux")? {
            cfg.flux = v.parse()?;
        }

        // Discretization
        if let Some(v) = r.usize("order")? {
            cfg.order = v;
        }
        if let Some(v) = r.usize("dimen")? {
            cfg = cfg.with_dim(v);
        }

        // Shock capturing
        if let Some(v) = r.i64("use_av")? {
            cfg.shock_capturing.variant = ArtificialViscosity::try_from(v)?;
        }
        if let Some(v) = r.f64("alpha_sc")? {
            cfg.shock_capturing.alpha = v;
        }
        if let Some(v) = r.f64("kappa_sc")? {
            cfg.shock_capturing.kappa = v;
        }
        if r.contains("s0_sc") {
            warn!("Option s0_sc is ignored; the indicator center is derived from the order");
        }

        // Material properties
        if let Some(v) = r.f64("mu")? {
            cfg.transport.viscosity = v;
        }
        if let Some(v) = r.f64("spec_diff")? {
            cfg.transport.species_diffusivity = v;
        }
        if let Some(v) = r.i64("transport")? {
            cfg.transport.kind = TransportKind::try_from(v)?;
        }
        if let Some(v) = r.usize("nspecies")? {
            cfg.nspecies = v;
        }
        if let Some(v) = r.usize("pyro_temp_iter")? {
            cfg.temperature_iterations = v;
        }
        if let Some(v) = r.f64("pyro_temp_tol")? {
            cfg.health.temperature_tolerance = v;
        }

        // Health bounds
        let p = cfg.health.pressure;
        let t = cfg.health.temperature;
        let y = cfg.health.mass_fraction;
        cfg.health.pressure = read_range(&r, ("health_pres_min", "health_pres_max"), p)?;
        cfg.health.temperature = read_range(&r, ("health_temp_min", "health_temp_max"), t)?;
        cfg.health.mass_fraction =
            read_range(&r, ("health_mass_frac_min", "health_mass_frac_max"), y)?;

        // Source terms
        if let Some(v) = r.bool("use_ignition")? {
            cfg.ignition.enabled = v;
        }
        if let Some(v) = r.f64("ignition_init_time")? {
            cfg.ignition.init_time = v;
        }
        if let Some(v) = r.bool("use_sponge")? {
            cfg.sponge.enabled = v;
        }
        if let Some(v) = r.f64("sponge_sigma")? {
            cfg.sponge.sigma = v;
        }
        if let Some(v) = r.bool("use_combustion")? {
            cfg.use_combustion = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value constraints the types cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, reason: String| ConfigError::InvalidValue {
            key: key.to_string(),
            reason,
        };

        if !(1..=3).contains(&self.dim) {
            return Err(invalid("dimen", format!("dimension {} is not 1, 2 or 3", self.dim)));
        }
        if self.order == 0 {
            return Err(invalid("order", "polynomial order must be at least 1".to_string()));
        }
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(invalid("current_dt", format!("{} is not a positive step", self.dt)));
        }
        if self.constant_cfl && !(self.cfl > 0.0) {
            return Err(invalid("current_cfl", format!("{} is not a positive CFL", self.cfl)));
        }
        if !self.t_final.is_finite() || self.t_final < 0.0 {
            return Err(invalid("t_final", format!("{} is not a final time", self.t_final)));
        }
        if self.sponge.enabled && !(self.sponge.thickness > 0.0 && self.sponge.thickness.is_finite()) {
            return Err(invalid(
                "sponge thickness",
                format!("{} is not a positive ramp thickness", self.sponge.thickness),
            ));
        }
        if self.ignition.center.len() != self.dim {
            return Err(invalid(
                "ignition center",
                format!("{} coordinates for dimension {}", self.ignition.center.len(), self.dim),
            ));
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Builder setters
    // -------------------------------------------------------------------------

    pub fn with_casename(mut self, casename: impl Into<String>) -> Self {
        self.casename = casename.into();
        self
    }

    pub fn with_restart_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.restart_dir = dir.into();
        self
    }

    pub fn with_intervals(mut self, intervals: OutputIntervals) -> Self {
        self.intervals = intervals;
        self
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    /// Set the stepping policy. Constant-CFL keeps the configured dt for
    /// the rate scales that depend on it.
    pub fn with_timestep(mut self, mode: TimestepMode) -> Self {
        match mode {
            TimestepMode::ConstantCfl { cfl } => {
                self.constant_cfl = true;
                self.cfl = cfl;
            }
            TimestepMode::ConstantDt { dt } => {
                self.constant_cfl = false;
                self.dt = dt;
            }
        }
        self
    }

    pub fn with_t_final(mut self, t_final: f64) -> Self {
        self.t_final = t_final;
        self
    }

    pub fn with_finish_tolerance(mut self, tolerance: f64) -> Self {
        self.finish_tolerance = tolerance;
        self
    }

    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Set the dimension; the spark center is reset when its length no
    /// longer matches.
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        if self.ignition.center.len() != dim {
            self.ignition.center = IgnitionParams::for_dim(dim).center;
        }
        self
    }

    pub fn with_nspecies(mut self, nspecies: usize) -> Self {
        self.nspecies = nspecies;
        self
    }

    pub fn with_combustion(mut self, enabled: bool) -> Self {
        self.use_combustion = enabled;
        self
    }

    pub fn with_health(mut self, health: HealthBounds) -> Self {
        self.health = health;
        self
    }

    pub fn with_transport(mut self, transport: TransportParams) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_shock_capturing(mut self, params: ShockCapturingParams) -> Self {
        self.shock_capturing = params;
        self
    }

    pub fn with_sponge(mut self, sponge: SpongeParams) -> Self {
        self.sponge = sponge;
        self
    }

    pub fn with_ignition(mut self, ignition: IgnitionParams) -> Self {
        self.ignition = ignition;
        self
    }

    // -------------------------------------------------------------------------
    // Derived quantities
    // -------------------------------------------------------------------------

    pub fn timestep_mode(&self) -> TimestepMode {
        if self.constant_cfl {
            TimestepMode::ConstantCfl { cfl: self.cfl }
        } else {
            TimestepMode::ConstantDt { dt: self.dt }
        }
    }

    /// Chemistry needs a full reacting mixture.
    pub fn combustion_enabled(&self) -> bool {
        self.use_combustion && self.nspecies >= 3
    }

    /// Species limiter relaxation rate 1/(nlimit·dt), when limiting applies.
    pub fn species_limit_rate(&self) -> Option<f64> {
        (self.intervals.nlimit > 0 && self.nspecies > 0)
            .then(|| 1.0 / self.intervals.nlimit as f64 / self.dt)
    }

    /// Smoothness indicator activation center for this order.
    pub fn s0(&self) -> f64 {
        self.shock_capturing.s0(self.order)
    }

    /// The temperature residual is meaningful only for reacting mixtures.
    pub fn checks_temperature_residual(&self) -> bool {
        self.nspecies >= 3
    }

    /// Log the resolved configuration.
    pub fn log_summary(&self) {
        let iv = &self.intervals;
        info!(
            casename = %self.casename,
            nviz = iv.nviz,
            nrestart = iv.nrestart,
            nhealth = iv.nhealth,
            nstatus = iv.nstatus,
            "I/O cadence"
        );
        match self.timestep_mode() {
            TimestepMode::ConstantCfl { cfl } => info!(
                integrator = %self.integrator,
                cfl,
                t_final = self.t_final,
                "Constant CFL time stepping"
            ),
            TimestepMode::ConstantDt { dt } => info!(
                integrator = %self.integrator,
                dt,
                t_final = self.t_final,
                "Constant dt time stepping"
            ),
        }
        info!(
            order = self.order,
            dim = self.dim,
            flux = %self.flux,
            nspecies = self.nspecies,
            transport = ?self.transport.kind,
            "Discretization and model"
        );
        let sc = &self.shock_capturing;
        match sc.variant {
            ArtificialViscosity::Off => info!("Artificial viscosity disabled"),
            ArtificialViscosity::Laplacian => info!(
                alpha = sc.alpha,
                s0 = self.s0(),
                kappa = sc.kappa,
                "Laplacian artificial viscosity"
            ),
            ArtificialViscosity::PhysicalDensity => info!(
                alpha = sc.alpha,
                s0 = self.s0(),
                prandtl = sc.prandtl,
                "Physical artificial viscosity, density indicator"
            ),
            ArtificialViscosity::PhysicalDivergence => info!(
                alpha = sc.alpha,
                gamma = sc.gamma,
                theta = sc.theta,
                beta = sc.beta,
                stagnation_temperature = sc.stagnation_temperature,
                "Physical artificial viscosity, divergence indicator"
            ),
        }
        info!(
            combustion = self.combustion_enabled(),
            sponge = self.sponge.enabled,
            ignition = self.ignition.enabled,
            species_limiter = self.species_limit_rate().is_some(),
            "Source terms"
        );
        if self.ignition.enabled {
            info!(
                center = ?self.ignition.center,
                diameter = self.ignition.diameter,
                strength = self.ignition.amplitude(self.dt),
                init_time = self.ignition.init_time,
                duration = self.ignition.duration,
                "Spark ignition"
            );
        }
    }
}

fn read_range(
    r: &OptionReader<'_>,
    (min_key, max_key): (&str, &str),
    current: ValueRange,
) -> Result<ValueRange, ConfigError> {
    let min = r.f64(min_key)?.unwrap_or(current.min);
    let max = r.f64(max_key)?.unwrap_or(current.max);
    if !(min <= max) {
        return Err(ConfigError::InvalidValue {
            key: min_key.to_string(),
            reason: format!("minimum {} exceeds maximum {}", min, max),
        });
    }
    Ok(ValueRange::new(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptionValue;

    fn options(entries: &[(&str, OptionValue)]) -> OptionMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_empty_options_give_defaults() {
        let cfg = SimulationConfig::from_options(&OptionMap::new()).expect("defaults are valid");
        assert_eq!(cfg, SimulationConfig::default());
        assert_eq!(cfg.intervals.nviz, 500);
        assert_eq!(cfg.integrator, IntegratorKind::Rk4);
        assert_eq!(cfg.timestep_mode(), TimestepMode::ConstantDt { dt: 1.0e-8 });
    }

    #[test]
    fn test_parse_full_option_set() {
        let opts = options(&[
            ("nviz", 10_i64.into()),
            ("nrestart", 20_i64.into()),
            ("current_dt", 2.0e-9.into()),
            ("t_final", 1.0e-6.into()),
            ("integrator", "lsrk144".into()),
            ("inviscid_numerical_flux", "hll".into()),
            ("order", 3_i64.into()),
            ("dimen", 3_i64.into()),
            ("use_av", 2_i64.into()),
            ("nspecies", 7_i64.into()),
            ("health_pres_min", 10.0.into()),
            ("use_sponge", false.into()),
            ("constant_cfl", true.into()),
            ("current_cfl", 0.5.into()),
        ]);
        let cfg = SimulationConfig::from_options(&opts).expect("valid options");

        assert_eq!(cfg.intervals.nviz, 10);
        assert_eq!(cfg.intervals.nrestart, 20);
        assert_eq!(cfg.integrator, IntegratorKind::Lsrk144);
        assert_eq!(cfg.flux, FluxFunction::Hll);
        assert_eq!(cfg.dim, 3);
        assert_eq!(cfg.ignition.center.len(), 3);
        assert_eq!(cfg.shock_capturing.variant, ArtificialViscosity::PhysicalDensity);
        assert_eq!(cfg.health.pressure, ValueRange::new(10.0, 2.0e6));
        assert!(!cfg.sponge.enabled);
        assert!(cfg.combustion_enabled());
        assert_eq!(cfg.timestep_mode(), TimestepMode::ConstantCfl { cfl: 0.5 });
    }

    #[test]
    fn test_unknown_integrator_is_fatal() {
        let opts = options(&[("integrator", "leapfrog".into())]);
        assert_eq!(
            SimulationConfig::from_options(&opts),
            Err(ConfigError::UnknownIntegrator("leapfrog".to_string()))
        );
    }

    #[test]
    fn test_invalid_av_variant_is_fatal() {
        let opts = options(&[("use_av", 5_i64.into())]);
        assert_eq!(
            SimulationConfig::from_options(&opts),
            Err(ConfigError::InvalidArtificialViscosity(5))
        );
    }

    #[test]
    fn test_zero_order_rejected() {
        let opts = options(&[("order", 0_i64.into())]);
        assert!(matches!(
            SimulationConfig::from_options(&opts),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_limiter_requires_species() {
        let cfg = SimulationConfig::default().with_intervals(OutputIntervals {
            nlimit: 10,
            ..OutputIntervals::default()
        });
        assert_eq!(cfg.species_limit_rate(), None);

        let cfg = cfg.with_nspecies(2);
        let rate = cfg.species_limit_rate().expect("limiting enabled");
        assert!((rate - 1.0 / 10.0 / 1.0e-8).abs() < 1.0);
    }

    #[test]
    fn test_combustion_needs_reacting_mixture() {
        let cfg = SimulationConfig::default().with_nspecies(2);
        assert!(!cfg.combustion_enabled());
        assert!(!cfg.checks_temperature_residual());
        assert!(cfg.with_nspecies(3).combustion_enabled());
    }

    #[test]
    fn test_derived_scales() {
        let cfg = SimulationConfig::default().with_order(2);
        assert!((cfg.s0() - (1.0e-4_f64 / 16.0).log10()).abs() < 1e-12);
        assert!((cfg.sponge.amplitude(cfg.dt) - 1.0e5).abs() < 1e-6);
        assert!((cfg.ignition.width() - 0.0025 / 2.355).abs() < 1e-15);
    }

    #[test]
    fn test_degenerate_sponge_rejected() {
        let sponge = |thickness| SpongeParams {
            thickness,
            ..SpongeParams::default()
        };
        for thickness in [0.0, -0.1, f64::NAN] {
            let cfg = SimulationConfig::default().with_sponge(sponge(thickness));
            assert!(matches!(cfg.validate(), Err(ConfigError::InvalidValue { .. })));
        }
        let disabled = SimulationConfig::default().with_sponge(SpongeParams {
            enabled: false,
            ..sponge(0.0)
        });
        assert!(disabled.validate().is_ok());
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_health_range_rejected() {
        let opts = options(&[("health_temp_min", 6000.0.into())]);
        assert!(SimulationConfig::from_options(&opts).is_err());
    }
}
