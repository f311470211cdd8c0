//! Outflow sponge: relaxation toward a reference state.
//!
//! S = σ(x) (q_ref - q), with σ = A ((x - x0)/δ)² for x > x0 and 0 elsewhere.

use super::{PhysicsTerm, TermContext};
use crate::config::SpongeParams;
use crate::state::ConservedFields;

/// Quadratic sponge ramp along x.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpongeProfile {
    pub amplitude: f64,
    pub x0: f64,
    pub thickness: f64,
}

impl SpongeProfile {
    /// Profile from the sponge parameters at step size `dt`.
    pub fn from_params(params: &SpongeParams, dt: f64) -> Self {
        Self {
            amplitude: params.amplitude(dt),
            x0: params.x0,
            thickness: params.thickness,
        }
    }

    /// σ at one x position.
    #[inline]
    pub fn sigma(&self, x: f64) -> f64 {
        if x > self.x0 && self.amplitude != 0.0 {
            let xi = (x - self.x0) / self.thickness;
            self.amplitude * xi * xi
        } else {
            0.0
        }
    }

    /// σ at every node.
    pub fn sigma_field(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&x| self.sigma(x)).collect()
    }
}

/// Sponge relaxation toward a fixed reference state.
pub struct SpongeRelaxation {
    sigma: Vec<f64>,
    reference: ConservedFields,
}

impl SpongeRelaxation {
    /// `x` holds the node x coordinates; `reference` the target state.
    pub fn new(profile: SpongeProfile, x: &[f64], reference: ConservedFields) -> Self {
        Self {
            sigma: profile.sigma_field(x),
            reference,
        }
    }

    /// σ at every node.
    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }
}

impl PhysicsTerm for SpongeRelaxation {
    fn evaluate(&self, ctx: &TermContext<'_>) -> ConservedFields {
        let cv = &ctx.fluid.cv;
        let mut out = cv.zeros_like();
        for ((dst, current), reference) in out
            .components_mut()
            .zip(cv.components())
            .zip(self.reference.components())
        {
            for (i, &sigma) in self.sigma.iter().enumerate() {
                // Untouched nodes stay exactly zero, even for non-finite states
                if sigma != 0.0 {
                    dst[i] = sigma * (reference[i] - current[i]);
                }
            }
        }
        out
    }

    fn name(&self) -> &'static str {
        "sponge"
    }
}
