//! Additive physics terms of the right-hand side.
//!
//! Each term maps the current fluid state to a conserved-variable tendency
//! that is summed into the total:
//!
//! dq/dt = L(q) + Σ S_k(q, x, t)

use crate::state::{ConservedFields, FluidState};

/// Everything a term may read during one evaluation.
#[derive(Clone, Copy, Debug)]
pub struct TermContext<'a> {
    pub fluid: &'a FluidState,
    /// Node coordinates, `coords[axis][node]`
    pub coords: &'a [Vec<f64>],
    pub time: f64,
}

/// One additive tendency contribution.
pub trait PhysicsTerm: Send + Sync {
    fn evaluate(&self, ctx: &TermContext<'_>) -> ConservedFields;

    /// Name for logging.
    fn name(&self) -> &'static str;
}

/// Sum of several terms, evaluated in insertion order.
#[derive(Default)]
pub struct CombinedTerms {
    terms: Vec<Box<dyn PhysicsTerm>>,
}

impl CombinedTerms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, term: Box<dyn PhysicsTerm>) {
        self.terms.push(term);
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.terms.iter().map(|t| t.name()).collect()
    }

    /// Add every term's contribution into `total`.
    pub fn accumulate(&self, ctx: &TermContext<'_>, total: &mut ConservedFields) {
        for term in &self.terms {
            total.add_assign(&term.evaluate(ctx));
        }
    }
}

impl PhysicsTerm for CombinedTerms {
    fn evaluate(&self, ctx: &TermContext<'_>) -> ConservedFields {
        let mut total = ctx.fluid.cv.zeros_like();
        self.accumulate(ctx, &mut total);
        total
    }

    fn name(&self) -> &'static str {
        "combined"
    }
}
