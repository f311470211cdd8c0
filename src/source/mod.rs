//! Right-hand-side physics terms.
//!
//! - [`ChemistrySource`]: chemical production rates
//! - [`SpongeRelaxation`]: outflow relaxation toward a reference state
//! - [`SparkIgnition`]: Gaussian energy deposition
//! - [`SpeciesLimiter`]: mass fraction bounds with a relaxation source
//! - [`ShockCapturing`]: artificial viscosity strategies

mod chemistry;
mod ignition;
pub mod shock_capturing;
mod species_limiter;
mod sponge;
mod traits;

pub use chemistry::ChemistrySource;
pub use ignition::SparkIgnition;
pub use shock_capturing::{ResolvedFluid, ShockCapturing, shock_capturing_for};
pub use species_limiter::{LimitedSpecies, SpeciesLimiter, limit_mass_fractions};
pub use sponge::{SpongeProfile, SpongeRelaxation};
pub use traits::{CombinedTerms, PhysicsTerm, TermContext};
