//! Tensor-product application of 1D operators on element-local data.
//!
//! Element data is stored with the x index fastest:
//! `idx = i + n·(j + n·k)`.

use faer::Mat;

use super::Vandermonde1D;

/// Apply `op` (n_out × n_in) along `axis` of a tensor with extents `shape`.
///
/// Returns the new data; `shape[axis]` is updated to n_out in place.
fn apply_axis(data: &[f64], shape: &mut [usize], axis: usize, op: &Mat<f64>) -> Vec<f64> {
    let n_in = shape[axis];
    let n_out = op.nrows();
    debug_assert_eq!(op.ncols(), n_in);

    let stride: usize = shape[..axis].iter().product();
    let outer: usize = shape[axis + 1..].iter().product();

    let mut out = vec![0.0; stride * n_out * outer];
    for o in 0..outer {
        for s in 0..stride {
            for i in 0..n_out {
                let mut acc = 0.0;
                for j in 0..n_in {
                    acc += op[(i, j)] * data[s + stride * (j + n_in * o)];
                }
                out[s + stride * (i + n_out * o)] = acc;
            }
        }
    }

    shape[axis] = n_out;
    out
}

/// Apply the same 1D operator along every one of `dim` axes.
///
/// `data` must hold `op.ncols()^dim` values.
pub fn apply_along_axes(data: &[f64], dim: usize, op: &Mat<f64>) -> Vec<f64> {
    let mut shape = vec![op.ncols(); dim];
    let mut current = data.to_vec();
    for axis in 0..dim {
        current = apply_axis(&current, &mut shape, axis, op);
    }
    current
}

/// Project one element's nodal values from `from`'s order to `to`'s order.
pub fn project_element(
    nodal: &[f64],
    dim: usize,
    from: &Vandermonde1D,
    to: &Vandermonde1D,
) -> Vec<f64> {
    if from.order == to.order {
        return nodal.to_vec();
    }
    apply_along_axes(nodal, dim, &from.projection_to(to))
}

/// Fraction of the modal energy held by the highest modes, as log10.
///
/// A mode counts as highest when any of its per-axis indices equals the
/// element order. Returns `log10(E_high / (E_total + 1e-12) + 1e-12)`.
/// Order 0 elements have no resolvable decay; their value is -12.
pub fn modal_decay(nodal: &[f64], dim: usize, vdm: &Vandermonde1D) -> f64 {
    if vdm.order == 0 {
        return -12.0;
    }

    let modal = apply_along_axes(nodal, dim, &vdm.v_inv);
    let n = vdm.n_1d();

    let mut total = 0.0;
    let mut high = 0.0;
    for (idx, &c) in modal.iter().enumerate() {
        let energy = c * c;
        total += energy;

        let mut rest = idx;
        let mut is_high = false;
        for _ in 0..dim {
            if rest % n == vdm.order {
                is_high = true;
            }
            rest /= n;
        }
        if is_high {
            high += energy;
        }
    }

    (high / (total + 1e-12) + 1e-12).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor_nodes(vdm: &Vandermonde1D, dim: usize) -> Vec<Vec<f64>> {
        let n = vdm.n_1d();
        let total = n.pow(dim as u32);
        (0..total)
            .map(|idx| {
                let mut rest = idx;
                (0..dim)
                    .map(|_| {
                        let r = vdm.nodes[rest % n];
                        rest /= n;
                        r
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_projection_2d_reproduces_bilinear() {
        let from = Vandermonde1D::new(1);
        let to = Vandermonde1D::new(3);
        let f = |x: &[f64]| 2.0 + x[0] - 3.0 * x[1] + 0.5 * x[0] * x[1];

        let nodal: Vec<f64> = tensor_nodes(&from, 2).iter().map(|x| f(x)).collect();
        let projected = project_element(&nodal, 2, &from, &to);
        let expected: Vec<f64> = tensor_nodes(&to, 2).iter().map(|x| f(x)).collect();

        assert_eq!(projected.len(), 16);
        for (p, e) in projected.iter().zip(&expected) {
            assert!((p - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_same_order_is_identity() {
        let vdm = Vandermonde1D::new(2);
        let nodal: Vec<f64> = (0..9).map(|i| i as f64).collect();
        assert_eq!(project_element(&nodal, 2, &vdm, &vdm), nodal);
    }

    #[test]
    fn test_modal_decay_constant_is_smooth() {
        let vdm = Vandermonde1D::new(3);
        let nodal = vec![1.5; 16];
        assert!(modal_decay(&nodal, 2, &vdm) < -10.0);
    }

    #[test]
    fn test_modal_decay_oscillation_is_rough() {
        let vdm = Vandermonde1D::new(3);
        let nodal: Vec<f64> = tensor_nodes(&vdm, 1)
            .iter()
            .enumerate()
            .map(|(i, _)| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        assert!(modal_decay(&nodal, 1, &vdm) > -1.0);
    }
}
