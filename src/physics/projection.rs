use super::OrderConversion;
use crate::basis::{Vandermonde1D, project_element};

/// Legendre modal projection between two orders.
///
/// Per axis, modes shared by both orders are kept, higher source modes are
/// dropped and missing target modes are zero. The element mean is
/// preserved exactly, so total mass is conserved.
#[derive(Clone, Debug)]
pub struct ModalProjection {
    dim: usize,
    from: Vandermonde1D,
    to: Vandermonde1D,
}

impl ModalProjection {
    pub fn new(dim: usize, from_order: usize, to_order: usize) -> Self {
        Self {
            dim,
            from: Vandermonde1D::new(from_order),
            to: Vandermonde1D::new(to_order),
        }
    }

    fn nodes_per_element(&self, basis: &Vandermonde1D) -> usize {
        basis.n_1d().pow(self.dim as u32)
    }
}

impl OrderConversion for ModalProjection {
    fn source_order(&self) -> usize {
        self.from.order
    }

    fn target_order(&self) -> usize {
        self.to.order
    }

    fn convert(&self, field: &[f64]) -> Vec<f64> {
        let n_from = self.nodes_per_element(&self.from);
        let n_to = self.nodes_per_element(&self.to);
        let mut out = Vec::with_capacity(field.len() / n_from * n_to);
        for element in field.chunks_exact(n_from) {
            out.extend(project_element(element, self.dim, &self.from, &self.to));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ConservedFields, SimulationState};

    #[test]
    fn test_convert_state_resizes_every_field() {
        let n_from = 9 * 2; // two order-2 elements in 2D
        let mut cv = ConservedFields::zeros(2, 1, n_from);
        cv.mass = (0..n_from).map(|i| 1.0 + 0.1 * i as f64).collect();
        let state = SimulationState::new(cv, vec![300.0; n_from]);

        let projection = ModalProjection::new(2, 2, 1);
        let converted = projection.convert_state(&state);

        assert_eq!(converted.n_nodes(), 8);
        assert_eq!(converted.cv.species_mass[0].len(), 8);
        assert!(converted.temperature_seed.iter().all(|&t| (t - 300.0).abs() < 1e-10));
    }
}
