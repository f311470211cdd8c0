use std::sync::Arc;

use super::{PhysicsTerm, TermContext};
use crate::physics::GasModel;
use crate::state::ConservedFields;

/// Chemical production rates from the gas model.
pub struct ChemistrySource {
    gas: Arc<dyn GasModel>,
}

impl ChemistrySource {
    pub fn new(gas: Arc<dyn GasModel>) -> Self {
        Self { gas }
    }
}

impl PhysicsTerm for ChemistrySource {
    fn evaluate(&self, ctx: &TermContext<'_>) -> ConservedFields {
        self.gas
            .species_source_terms(&ctx.fluid.cv, &ctx.fluid.temperature)
    }

    fn name(&self) -> &'static str {
        "chemistry"
    }
}
