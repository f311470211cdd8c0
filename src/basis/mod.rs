//! Nodal/modal basis machinery for tensor-product elements.
//!
//! Elements carry `(order + 1)^dim` Gauss-Lobatto-Legendre (GLL) nodes laid
//! out with the x index fastest. The same orthonormal Legendre family is
//! used at every order, so converting between orders is a modal truncation
//! or zero-padding, and the decay of the highest modes measures how smooth a
//! field is inside an element.
//!
//! - [`legendre`]: Legendre polynomials, GLL nodes and weights
//! - [`Vandermonde1D`]: nodal-modal transforms on one axis
//! - [`tensor`]: applying 1D operators along every axis of an element

pub mod legendre;
pub mod tensor;
mod vandermonde;

pub use legendre::{gauss_lobatto_nodes, gauss_lobatto_weights, legendre, legendre_and_derivative};
pub use tensor::{apply_along_axes, modal_decay, project_element};
pub use vandermonde::Vandermonde1D;
