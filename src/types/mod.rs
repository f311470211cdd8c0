//! Strongly-typed domain types.
//!
//! Newtypes keep element and rank indices apart, and [`ValueRange`] gives the
//! admissible `[min, max]` intervals used by health checks a name.
//!
//! # Example
//!
//! ```
//! use dg_march::types::{ElementIndex, ValueRange};
//!
//! let k = ElementIndex::new(3);
//! assert_eq!(k.as_usize(), 3);
//!
//! let pressure = ValueRange::new(1.0e-1, 2.0e6);
//! assert!(pressure.contains(101_325.0));
//! assert!(!pressure.contains(-1.0));
//! ```

mod indices;
mod range;

pub use indices::{ElementIndex, RankIndex};
pub use range::ValueRange;
