//! Rank-local mesh partitions of axis-aligned box elements.

use serde::{Deserialize, Serialize};

use crate::types::ElementIndex;

/// One axis-aligned box element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxElement {
    /// Lower corner, one coordinate per dimension
    pub lower: Vec<f64>,
    /// Upper corner
    pub upper: Vec<f64>,
}

impl BoxElement {
    /// Extent along `axis`.
    #[inline]
    pub fn extent(&self, axis: usize) -> f64 {
        self.upper[axis] - self.lower[axis]
    }

    /// Smallest extent over all axes.
    pub fn min_extent(&self) -> f64 {
        (0..self.lower.len())
            .map(|axis| self.extent(axis))
            .fold(f64::INFINITY, f64::min)
    }

    /// Element volume (length in 1D, area in 2D).
    pub fn volume(&self) -> f64 {
        (0..self.lower.len()).map(|axis| self.extent(axis)).product()
    }
}

/// The part of a global mesh owned by one rank.
///
/// Elements are kept in global order; `first_element` is the global index
/// of `elements[0]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshPartition {
    /// Spatial dimension (1, 2 or 3)
    pub dim: usize,
    /// Elements owned by this partition
    pub elements: Vec<BoxElement>,
    /// Global index of the first local element
    pub first_element: usize,
    /// Element count of the whole mesh
    pub global_n_elements: usize,
}

impl MeshPartition {
    /// A uniform box mesh of `[lower, upper]` with `n_per_axis` elements
    /// along each axis, as a single partition holding every element.
    ///
    /// Elements are ordered with the x index fastest.
    pub fn uniform_box(lower: &[f64], upper: &[f64], n_per_axis: &[usize]) -> Self {
        let dim = lower.len();
        assert!(
            (1..=3).contains(&dim),
            "Dimension must be 1, 2 or 3, got {}",
            dim
        );
        assert_eq!(upper.len(), dim, "Corner dimensions differ");
        assert_eq!(n_per_axis.len(), dim, "Need an element count per axis");
        assert!(n_per_axis.iter().all(|&n| n > 0), "Need at least one element per axis");
        for axis in 0..dim {
            assert!(upper[axis] > lower[axis], "Empty extent on axis {}", axis);
        }

        let h: Vec<f64> = (0..dim)
            .map(|axis| (upper[axis] - lower[axis]) / n_per_axis[axis] as f64)
            .collect();
        let n_total: usize = n_per_axis.iter().product();

        let elements = (0..n_total)
            .map(|k| {
                let mut rest = k;
                let mut lo = Vec::with_capacity(dim);
                let mut hi = Vec::with_capacity(dim);
                for axis in 0..dim {
                    let i = rest % n_per_axis[axis];
                    rest /= n_per_axis[axis];
                    lo.push(lower[axis] + i as f64 * h[axis]);
                    hi.push(lower[axis] + (i + 1) as f64 * h[axis]);
                }
                BoxElement { lower: lo, upper: hi }
            })
            .collect();

        Self {
            dim,
            elements,
            first_element: 0,
            global_n_elements: n_total,
        }
    }

    /// Number of local elements.
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Global index of a local element.
    pub fn global_index(&self, local: ElementIndex) -> usize {
        self.first_element + local.as_usize()
    }

    /// Split into `n_parts` contiguous partitions of near-equal size.
    ///
    /// The first `n % n_parts` partitions receive one extra element.
    pub fn split_contiguous(&self, n_parts: usize) -> Vec<MeshPartition> {
        assert!(n_parts > 0, "Need at least one partition");
        let n = self.elements.len();
        let base = n / n_parts;
        let extra = n % n_parts;

        let mut parts = Vec::with_capacity(n_parts);
        let mut start = 0;
        for p in 0..n_parts {
            let count = base + usize::from(p < extra);
            parts.push(MeshPartition {
                dim: self.dim,
                elements: self.elements[start..start + count].to_vec(),
                first_element: self.first_element + start,
                global_n_elements: self.global_n_elements,
            });
            start += count;
        }
        parts
    }
}
