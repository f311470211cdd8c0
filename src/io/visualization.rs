//! Visualization output boundary.
//!
//! The controller assembles an ordered list of named nodal fields and hands
//! it to a [`VisualizationSink`]; file formats live behind the trait.

use thiserror::Error;

use crate::state::FluidState;
use crate::time::TimestepField;
use crate::types::RankIndex;

/// Error type for visualization sinks.
#[derive(Debug, Error)]
pub enum VizError {
    #[error("visualization I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("visualization sink error: {0}")]
    Sink(String),
}

/// One named nodal field.
pub type NamedField = (String, Vec<f64>);

/// Receives visualization snapshots.
pub trait VisualizationSink {
    fn write(&mut self, step: u64, time: f64, fields: &[NamedField]) -> Result<(), VizError>;
}

/// Discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl VisualizationSink for NullSink {
    fn write(&mut self, _step: u64, _time: f64, _fields: &[NamedField]) -> Result<(), VizError> {
        Ok(())
    }
}

/// Snapshot kept by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub step: u64,
    pub time: f64,
    pub fields: Vec<NamedField>,
}

impl Snapshot {
    pub fn field(&self, name: &str) -> Option<&[f64]> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }
}

/// Keeps every snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub snapshots: Vec<Snapshot>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> Vec<u64> {
        self.snapshots.iter().map(|s| s.step).collect()
    }
}

impl VisualizationSink for RecordingSink {
    fn write(&mut self, step: u64, time: f64, fields: &[NamedField]) -> Result<(), VizError> {
        self.snapshots.push(Snapshot {
            step,
            time,
            fields: fields.to_vec(),
        });
        Ok(())
    }
}

const AXES: [&str; 3] = ["x", "y", "z"];

/// Inputs of one visualization snapshot beyond the fluid state.
#[derive(Debug, Clone, Copy)]
pub struct VizInputs<'a> {
    pub rank: RankIndex,
    pub length_scales: &'a [f64],
    /// Artificial dissipation rate α
    pub alpha: &'a [f64],
    pub sponge_sigma: Option<&'a [f64]>,
    pub timestep: Option<&'a TimestepField>,
    /// Normalized temperature residual, for reactive mixtures
    pub temperature_residual: Option<&'a [f64]>,
    pub species_names: &'a [String],
}

/// Assemble the ordered field list of one snapshot.
pub fn assemble_fields(fluid: &FluidState, inputs: &VizInputs<'_>) -> Vec<NamedField> {
    let cv = &fluid.cv;
    let n = fluid.n_nodes();
    let mut fields: Vec<NamedField> = Vec::new();

    fields.push(("mass".to_string(), cv.mass.clone()));
    for (axis, m) in cv.momentum.iter().enumerate() {
        fields.push((format!("momentum_{}", AXES[axis]), m.clone()));
    }
    fields.push(("energy".to_string(), cv.energy.clone()));
    for (s, rho_y) in cv.species_mass.iter().enumerate() {
        fields.push((format!("species_mass_{}", s), rho_y.clone()));
    }

    fields.push(("pressure".to_string(), fluid.pressure.clone()));
    fields.push(("temperature".to_string(), fluid.temperature.clone()));
    fields.push(("mach".to_string(), fluid.mach_field()));
    fields.push((
        "rank".to_string(),
        vec![inputs.rank.as_usize() as f64; n],
    ));
    for axis in 0..cv.dim() {
        fields.push((format!("velocity_{}", AXES[axis]), cv.velocity_field(axis)));
    }
    if let Some(sigma) = inputs.sponge_sigma {
        fields.push(("sponge_sigma".to_string(), sigma.to_vec()));
    }
    fields.push(("alpha".to_string(), inputs.alpha.to_vec()));
    fields.push(("smoothness".to_string(), fluid.smoothness.clone()));
    fields.push(("viscosity".to_string(), fluid.viscosity.clone()));
    if let Some(ts) = inputs.timestep {
        fields.push((ts.label().to_string(), ts.values().to_vec()));
    }
    for s in 0..cv.nspecies() {
        let name = inputs
            .species_names
            .get(s)
            .cloned()
            .unwrap_or_else(|| format!("species_{}", s));
        fields.push((format!("Y_{}", name), cv.mass_fraction_field(s)));
    }
    if let Some(residual) = inputs.temperature_residual {
        fields.push(("temperature_residual".to_string(), residual.to_vec()));
    }

    let cell_reynolds = (0..n)
        .map(|i| cv.mass[i] * fluid.speed(i) * inputs.length_scales[i] / fluid.viscosity[i])
        .collect();
    fields.push(("cell_reynolds".to_string(), cell_reynolds));

    fields
}
