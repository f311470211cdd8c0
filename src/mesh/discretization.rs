//! Nodal discretization of a mesh partition.
//!
//! Each element carries `(order + 1)^dim` GLL nodes, stored contiguously
//! element by element with the x index fastest inside an element.

use crate::basis::Vandermonde1D;
use crate::mesh::MeshPartition;

/// Node coordinates, length scales and quadrature weights for one
/// partition at one polynomial order.
#[derive(Clone, Debug)]
pub struct Discretization {
    /// The partition being discretized
    pub mesh: MeshPartition,
    /// Polynomial order
    pub order: usize,
    /// 1D basis shared by every axis
    pub basis: Vandermonde1D,
    /// Node coordinates: `coords[axis][node]`
    pub coords: Vec<Vec<f64>>,
    /// Characteristic length scale per node
    pub length_scales: Vec<f64>,
    /// Quadrature weight per node, including the element Jacobian
    pub weights: Vec<f64>,
}

impl Discretization {
    /// Discretize `mesh` at polynomial order `order`.
    pub fn new(mesh: MeshPartition, order: usize) -> Self {
        let basis = Vandermonde1D::new(order);
        let dim = mesh.dim;
        let n_1d = basis.n_1d();
        let n_local = n_1d.pow(dim as u32);
        let n_dofs = n_local * mesh.n_elements();

        // Smallest reference node spacing, on [-1, 1]
        let min_spacing = if order == 0 {
            2.0
        } else {
            basis.nodes[1] - basis.nodes[0]
        };

        let mut coords = vec![Vec::with_capacity(n_dofs); dim];
        let mut length_scales = Vec::with_capacity(n_dofs);
        let mut weights = Vec::with_capacity(n_dofs);

        for element in &mesh.elements {
            let scale = element.min_extent() * min_spacing / 2.0;
            let jacobian: f64 = (0..dim).map(|axis| element.extent(axis) / 2.0).product();

            for idx in 0..n_local {
                let mut rest = idx;
                let mut weight = jacobian;
                for (axis, axis_coords) in coords.iter_mut().enumerate() {
                    let i = rest % n_1d;
                    rest /= n_1d;
                    let r = basis.nodes[i];
                    axis_coords.push(element.lower[axis] + 0.5 * (r + 1.0) * element.extent(axis));
                    weight *= basis.weights[i];
                }
                length_scales.push(scale);
                weights.push(weight);
            }
        }

        Self {
            mesh,
            order,
            basis,
            coords,
            length_scales,
            weights,
        }
    }

    /// Spatial dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.mesh.dim
    }

    /// Nodes per element.
    #[inline]
    pub fn nodes_per_element(&self) -> usize {
        self.basis.n_1d().pow(self.mesh.dim as u32)
    }

    /// Local degrees of freedom per scalar field.
    #[inline]
    pub fn n_dofs(&self) -> usize {
        self.weights.len()
    }

    /// Element owning a local node.
    #[inline]
    pub fn element_of(&self, node: usize) -> usize {
        node / self.nodes_per_element()
    }

    /// Quadrature integral of a nodal field over the partition.
    pub fn integrate(&self, field: &[f64]) -> f64 {
        field.iter().zip(&self.weights).map(|(f, w)| f * w).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ModalProjection, OrderConversion};

    #[test]
    fn test_node_count_and_layout() {
        let mesh = MeshPartition::uniform_box(&[0.0, 0.0], &[1.0, 1.0], &[2, 2]);
        let disc = Discretization::new(mesh, 2);
        assert_eq!(disc.nodes_per_element(), 9);
        assert_eq!(disc.n_dofs(), 36);

        // First element spans [0, 0.5]²; node 1 sits at its x midpoint.
        assert!((disc.coords[0][1] - 0.25).abs() < 1e-14);
        assert!(disc.coords[1][1].abs() < 1e-14);
        assert_eq!(disc.element_of(17), 1);
    }

    #[test]
    fn test_weights_sum_to_volume() {
        let mesh = MeshPartition::uniform_box(&[0.0, -1.0], &[3.0, 1.0], &[3, 4]);
        let disc = Discretization::new(mesh, 3);
        let ones = vec![1.0; disc.n_dofs()];
        assert!((disc.integrate(&ones) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_scale_is_min_node_spacing() {
        let mesh = MeshPartition::uniform_box(&[0.0], &[1.0], &[4]);
        let disc = Discretization::new(mesh, 1);
        // Order 1 spacing equals the element width
        assert!(disc.length_scales.iter().all(|&l| (l - 0.25).abs() < 1e-14));
    }

    #[test]
    fn test_projection_preserves_integral() {
        let mesh = MeshPartition::uniform_box(&[0.0, 0.0], &[1.0, 1.0], &[2, 3]);
        let fine = Discretization::new(mesh.clone(), 4);
        let coarse = Discretization::new(mesh, 1);

        let field: Vec<f64> = (0..fine.n_dofs())
            .map(|n| 1.0 + (5.0 * fine.coords[0][n]).sin() * fine.coords[1][n].powi(3))
            .collect();
        let projected = ModalProjection::new(2, 4, 1).convert(&field);

        assert_eq!(projected.len(), coarse.n_dofs());
        assert!((fine.integrate(&field) - coarse.integrate(&projected)).abs() < 1e-12);
    }
}
