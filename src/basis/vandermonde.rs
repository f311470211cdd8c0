//! Vandermonde matrix for nodal-modal transforms on one axis.
//!
//! V[i, j] = φ_j(r_i) with the orthonormal Legendre basis
//! φ_j = sqrt((2j+1)/2) P_j, so
//! - nodal = V · modal
//! - modal = V⁻¹ · nodal

use faer::{Mat, linalg::solvers::Solve};

use super::legendre::{gauss_lobatto_nodes, gauss_lobatto_weights, legendre};

/// 1D GLL nodes, weights and the Vandermonde pair for one order.
#[derive(Clone, Debug)]
pub struct Vandermonde1D {
    /// Polynomial order.
    pub order: usize,
    /// GLL nodes on [-1, 1].
    pub nodes: Vec<f64>,
    /// GLL weights.
    pub weights: Vec<f64>,
    /// V[i, j] = φ_j(r_i).
    pub v: Mat<f64>,
    /// Inverse of `v`.
    pub v_inv: Mat<f64>,
}

impl Vandermonde1D {
    /// Build the transform pair for `order`.
    pub fn new(order: usize) -> Self {
        let nodes = gauss_lobatto_nodes(order);
        let weights = gauss_lobatto_weights(order);
        let n = order + 1;

        let v = Mat::from_fn(n, n, |i, j| normalized_legendre(j, nodes[i]));

        let lu = v.as_ref().full_piv_lu();
        let mut v_inv = Mat::zeros(n, n);
        for j in 0..n {
            let mut rhs = Mat::zeros(n, 1);
            rhs[(j, 0)] = 1.0;
            let col = lu.solve(&rhs);
            for i in 0..n {
                v_inv[(i, j)] = col[(i, 0)];
            }
        }

        Self {
            order,
            nodes,
            weights,
            v,
            v_inv,
        }
    }

    /// Number of nodes (and modes) on this axis.
    pub fn n_1d(&self) -> usize {
        self.order + 1
    }

    /// Operator mapping nodal values at this order to nodal values at
    /// `target` order through the shared modal basis.
    ///
    /// Modes above the smaller order are dropped (coarsening) or zero
    /// (refining). The mean (mode 0) is carried over exactly.
    pub fn projection_to(&self, target: &Vandermonde1D) -> Mat<f64> {
        let n_in = self.n_1d();
        let n_out = target.n_1d();
        let n_modes = n_in.min(n_out);
        Mat::from_fn(n_out, n_in, |i, j| {
            (0..n_modes)
                .map(|m| target.v[(i, m)] * self.v_inv[(m, j)])
                .sum()
        })
    }
}

/// Orthonormal Legendre polynomial sqrt((2j+1)/2) P_j(x).
fn normalized_legendre(j: usize, x: f64) -> f64 {
    ((2 * j + 1) as f64 / 2.0).sqrt() * legendre(j, x)
}
