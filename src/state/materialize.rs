/// Forces evaluation of lazily computed data.
///
/// The time loop calls this at exactly two points: before a checkpoint is
/// written and before a health check reads field values. Eager containers
/// need nothing and use the default.
pub trait Materialize {
    fn materialize(&mut self) {}
}

impl Materialize for super::SimulationState {}

impl Materialize for super::FluidState {}
