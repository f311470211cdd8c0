//! Right-hand-side composition and the smoothness indicator.

pub mod composer;
pub mod smoothness;

pub use composer::{PhysicsTermSet, PreparedState, RhsComposer};
pub use smoothness::{activation_ramp, smoothness_indicator};
