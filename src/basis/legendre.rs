//! Legendre polynomials and Gauss-Lobatto-Legendre quadrature.
//!
//! Legendre polynomials are orthogonal on [-1, 1]:
//! ∫ P_m P_n dx = 2/(2n+1) δ_mn

use std::f64::consts::PI;

/// Evaluate P_n(x) with the three-term recurrence
/// (k+1) P_{k+1} = (2k+1) x P_k - k P_{k-1}.
pub fn legendre(n: usize, x: f64) -> f64 {
    legendre_and_derivative(n, x).0
}

/// Evaluate P_n(x) and P'_n(x) in one recurrence sweep.
pub fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    match n {
        0 => return (1.0, 0.0),
        1 => return (x, 1.0),
        _ => {}
    }

    let mut p_prev = 1.0;
    let mut p_curr = x;
    for k in 1..n {
        let p_next = ((2 * k + 1) as f64 * x * p_curr - k as f64 * p_prev) / (k + 1) as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }

    // P'_n at the endpoints, where the closed form below divides by zero
    if (x - 1.0).abs() < 1e-14 {
        return (p_curr, (n * (n + 1)) as f64 / 2.0);
    }
    if (x + 1.0).abs() < 1e-14 {
        let sign = if n % 2 == 0 { -1.0 } else { 1.0 };
        return (p_curr, sign * (n * (n + 1)) as f64 / 2.0);
    }

    let dp = n as f64 * (x * p_curr - p_prev) / (x * x - 1.0);
    (p_curr, dp)
}

/// GLL nodes for polynomial order `order`: the `order + 1` roots of
/// (1 - x²) P'_N(x), ascending, endpoints included.
pub fn gauss_lobatto_nodes(order: usize) -> Vec<f64> {
    let n = order;
    if n == 0 {
        return vec![0.0];
    }

    // Chebyshev-Lobatto initial guess, refined by Newton on (1 - x²) P'_N.
    // Its derivative reduces to -N(N+1) P_N, so the update is
    // x += (1 - x²) P'_N / (N(N+1) P_N).
    let mut nodes: Vec<f64> = (0..=n).map(|j| -(PI * j as f64 / n as f64).cos()).collect();
    nodes[0] = -1.0;
    nodes[n] = 1.0;

    let nn1 = (n * (n + 1)) as f64;
    for x in nodes.iter_mut().take(n).skip(1) {
        for _ in 0..100 {
            let (p, dp) = legendre_and_derivative(n, *x);
            let update = (1.0 - *x * *x) * dp / (nn1 * p);
            *x += update;
            if update.abs() < 1e-15 {
                break;
            }
        }
    }

    nodes
}

/// GLL quadrature weights w_j = 2 / (N(N+1) P_N(x_j)²).
///
/// Exact for polynomials of degree ≤ 2N - 1; weights sum to 2.
pub fn gauss_lobatto_weights(order: usize) -> Vec<f64> {
    if order == 0 {
        return vec![2.0];
    }
    let nn1 = (order * (order + 1)) as f64;
    gauss_lobatto_nodes(order)
        .iter()
        .map(|&x| {
            let p = legendre(order, x);
            2.0 / (nn1 * p * p)
        })
        .collect()
}
