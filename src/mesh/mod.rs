//! Mesh partitions and their nodal discretization.
//!
//! - [`MeshPartition`]: the axis-aligned box elements owned by one rank
//! - [`Discretization`]: GLL node coordinates, length scales and quadrature
//!   weights of a partition at a given polynomial order

mod discretization;
mod partition;

pub use discretization::Discretization;
pub use partition::{BoxElement, MeshPartition};
