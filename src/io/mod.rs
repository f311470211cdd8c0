//! Restart files and visualization output.

mod checkpoint;
mod visualization;

pub use checkpoint::{CheckpointError, CheckpointManager, RestartExpectation, RestartRecord};
pub use visualization::{
    NamedField, NullSink, RecordingSink, Snapshot, VisualizationSink, VizError, VizInputs,
    assemble_fields,
};
