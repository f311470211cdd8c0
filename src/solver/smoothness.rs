//! Modal-decay smoothness indicator.
//!
//! Per element, the share of modal energy in the highest modes is measured
//! as `s = log10(E_high / E_total)` and mapped through a sine ramp:
//!
//! ```text
//! indicator = 0                                 s < s0 - κ
//!           = ½ (1 + sin(π (s - s0) / (2κ)))    |s - s0| ≤ κ
//!           = 1                                 s > s0 + κ
//! ```

use std::f64::consts::PI;

use crate::basis::modal_decay;
use crate::mesh::Discretization;

/// Sine activation ramp of width 2κ centered on `s0`.
#[inline]
pub fn activation_ramp(s: f64, s0: f64, kappa: f64) -> f64 {
    if s < s0 - kappa {
        0.0
    } else if s > s0 + kappa {
        1.0
    } else {
        0.5 * (1.0 + (PI * (s - s0) / (2.0 * kappa)).sin())
    }
}

/// Element-wise indicator of `field`, broadcast to every node of the element.
pub fn smoothness_indicator(field: &[f64], disc: &Discretization, kappa: f64, s0: f64) -> Vec<f64> {
    let n_elem = disc.nodes_per_element();
    let dim = disc.dim();
    let mut out = Vec::with_capacity(field.len());
    for element in field.chunks(n_elem) {
        let s = modal_decay(element, dim, &disc.basis);
        let value = activation_ramp(s, s0, kappa);
        out.extend(std::iter::repeat_n(value, element.len()));
    }
    out
}
