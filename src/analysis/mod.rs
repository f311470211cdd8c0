//! Health checks and run diagnostics.

mod diagnostics;
mod health;

pub use diagnostics::{DiagnosticsContext, FieldRange, RunSummary, StatusReport};
pub use health::{HealthIssue, HealthMonitor, HealthReport, normalized_temperature_residual};
