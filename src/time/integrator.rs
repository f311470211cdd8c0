//! Explicit time integrators.
//!
//! Integrators advance any [`Integrable`] state with a right-hand-side
//! closure `f(state, time) -> tendency`. The schemes:
//! - forward Euler (1st order)
//! - classical RK4
//! - 2N-storage low-storage RK: LSRK54 (Carpenter & Kennedy) and LSRK144
//!   (Niegemann, Diehl & Busch), both 4th order
//!
//! # Example
//! ```
//! use dg_march::time::{Integrable, StandardIntegrator, TimeIntegrator};
//!
//! #[derive(Clone)]
//! struct Scalar(f64);
//!
//! impl Integrable for Scalar {
//!     fn scale(&mut self, c: f64) { self.0 *= c; }
//!     fn axpy(&mut self, c: f64, other: &Self) { self.0 += c * other.0; }
//! }
//!
//! let mut u = Scalar(1.0);
//! StandardIntegrator::Rk4.step(&mut u, 0.1, 0.0, |s, _t| Scalar(-s.0));
//! assert!((u.0 - (-0.1_f64).exp()).abs() < 1e-6);
//! ```

use crate::config::IntegratorKind;

// =============================================================================
// Integrable Trait
// =============================================================================

/// Vector space operations needed by explicit integrators.
pub trait Integrable: Clone + Send + Sized {
    /// self <- c * self
    fn scale(&mut self, c: f64);

    /// self <- self + c * other
    fn axpy(&mut self, c: f64, other: &Self);

    /// Zero state with the same shape.
    fn zeros_like(&self) -> Self {
        let mut result = self.clone();
        result.scale(0.0);
        result
    }
}

// =============================================================================
// IntegratorInfo Trait (non-generic, dyn-compatible)
// =============================================================================

/// Non-generic information about a time integrator.
pub trait IntegratorInfo: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Order of accuracy.
    fn order(&self) -> usize;

    /// Right-hand-side evaluations per step.
    fn n_stages(&self) -> usize;

    /// Stage evaluation offsets relative to the step start.
    fn stage_times(&self, dt: f64) -> Vec<f64>;
}

// =============================================================================
// TimeIntegrator Trait
// =============================================================================

/// Explicit one-step integrator.
pub trait TimeIntegrator<S: Integrable>: IntegratorInfo {
    /// Advance `state` from `t` to `t + dt`.
    fn step<F>(&self, state: &mut S, dt: f64, t: f64, rhs: F)
    where
        F: Fn(&S, f64) -> S;
}

// =============================================================================
// Forward Euler
// =============================================================================

/// u_new = u + dt L(u, t)
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl IntegratorInfo for ForwardEuler {
    fn name(&self) -> &'static str {
        "euler"
    }

    fn order(&self) -> usize {
        1
    }

    fn n_stages(&self) -> usize {
        1
    }

    fn stage_times(&self, _dt: f64) -> Vec<f64> {
        vec![0.0]
    }
}

impl<S: Integrable> TimeIntegrator<S> for ForwardEuler {
    fn step<F>(&self, state: &mut S, dt: f64, t: f64, rhs: F)
    where
        F: Fn(&S, f64) -> S,
    {
        let l_u = rhs(state, t);
        state.axpy(dt, &l_u);
    }
}

// =============================================================================
// Classical RK4
// =============================================================================

/// Classical four-stage Runge-Kutta.
///
/// ```text
/// k1 = L(u, t)
/// k2 = L(u + dt/2 k1, t + dt/2)
/// k3 = L(u + dt/2 k2, t + dt/2)
/// k4 = L(u + dt k3, t + dt)
/// u_new = u + dt/6 (k1 + 2 k2 + 2 k3 + k4)
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassicalRK4;

impl IntegratorInfo for ClassicalRK4 {
    fn name(&self) -> &'static str {
        "rk4"
    }

    fn order(&self) -> usize {
        4
    }

    fn n_stages(&self) -> usize {
        4
    }

    fn stage_times(&self, dt: f64) -> Vec<f64> {
        vec![0.0, 0.5 * dt, 0.5 * dt, dt]
    }
}

impl<S: Integrable> TimeIntegrator<S> for ClassicalRK4 {
    fn step<F>(&self, state: &mut S, dt: f64, t: f64, rhs: F)
    where
        F: Fn(&S, f64) -> S,
    {
        let k1 = rhs(state, t);

        let mut stage = state.clone();
        stage.axpy(0.5 * dt, &k1);
        let k2 = rhs(&stage, t + 0.5 * dt);

        let mut stage = state.clone();
        stage.axpy(0.5 * dt, &k2);
        let k3 = rhs(&stage, t + 0.5 * dt);

        let mut stage = state.clone();
        stage.axpy(dt, &k3);
        let k4 = rhs(&stage, t + dt);

        state.axpy(dt / 6.0, &k1);
        state.axpy(dt / 3.0, &k2);
        state.axpy(dt / 3.0, &k3);
        state.axpy(dt / 6.0, &k4);
    }
}

// =============================================================================
// Low-storage Runge-Kutta
// =============================================================================

/// 2N-storage explicit Runge-Kutta scheme.
///
/// Per stage i:
/// ```text
/// k = A_i k + dt L(u, t + C_i dt)
/// u = u + B_i k
/// ```
#[derive(Clone, Copy, Debug)]
pub struct LowStorageRK {
    name: &'static str,
    a: &'static [f64],
    b: &'static [f64],
    c: &'static [f64],
}

const LSRK54_A: [f64; 5] = [
    0.0,
    -567301805773.0 / 1357537059087.0,
    -2404267990393.0 / 2016746695238.0,
    -3550918686646.0 / 2091501179385.0,
    -1275806237668.0 / 842570457699.0,
];

const LSRK54_B: [f64; 5] = [
    1432997174477.0 / 9575080441755.0,
    5161836677717.0 / 13612068292357.0,
    1720146321549.0 / 2090206949498.0,
    3134564353537.0 / 4481467310338.0,
    2277821191437.0 / 14882151754819.0,
];

const LSRK54_C: [f64; 5] = [
    0.0,
    1432997174477.0 / 9575080441755.0,
    2526269341429.0 / 6820363962896.0,
    2006345519317.0 / 3224310063776.0,
    2802321613138.0 / 2924317926251.0,
];

const LSRK144_A: [f64; 14] = [
    0.0,
    -0.7188012108672410,
    -0.7785331173421570,
    -0.0053282796654044,
    -0.8552979934029281,
    -3.9564138245774565,
    -1.5780575380587385,
    -2.0837094552574054,
    -0.7483334182761610,
    -0.7032861106563359,
    0.0013917096117681,
    -0.0932075369637460,
    -0.9514200470875948,
    -7.1151571693922548,
];

const LSRK144_B: [f64; 14] = [
    0.0367762454319673,
    0.3136296607553959,
    0.1531848691869027,
    0.0030097086818182,
    0.3326293790646110,
    0.2440251405350864,
    0.3718879239592277,
    0.6204126221582444,
    0.1524043173028741,
    0.0760894927419266,
    0.0077604214040978,
    0.0024647284755382,
    0.0780348340049386,
    5.5059777270269628,
];

const LSRK144_C: [f64; 14] = [
    0.0,
    0.0367762454319673,
    0.1249685262725025,
    0.2446177702277698,
    0.2476149531070420,
    0.2969311120382472,
    0.3978149645802642,
    0.5270854589440328,
    0.6981269994175695,
    0.8190890835352128,
    0.8527059887098624,
    0.8604711817462826,
    0.8627060376969976,
    0.8734213127600976,
];

impl LowStorageRK {
    /// Five-stage fourth-order scheme of Carpenter & Kennedy (1994).
    pub const LSRK54: LowStorageRK = LowStorageRK {
        name: "lsrk54",
        a: &LSRK54_A,
        b: &LSRK54_B,
        c: &LSRK54_C,
    };

    /// Fourteen-stage fourth-order scheme of Niegemann, Diehl & Busch (2012).
    pub const LSRK144: LowStorageRK = LowStorageRK {
        name: "lsrk144",
        a: &LSRK144_A,
        b: &LSRK144_B,
        c: &LSRK144_C,
    };
}

impl IntegratorInfo for LowStorageRK {
    fn name(&self) -> &'static str {
        self.name
    }

    fn order(&self) -> usize {
        4
    }

    fn n_stages(&self) -> usize {
        self.a.len()
    }

    fn stage_times(&self, dt: f64) -> Vec<f64> {
        self.c.iter().map(|c| c * dt).collect()
    }
}

impl<S: Integrable> TimeIntegrator<S> for LowStorageRK {
    fn step<F>(&self, state: &mut S, dt: f64, t: f64, rhs: F)
    where
        F: Fn(&S, f64) -> S,
    {
        let mut k = state.zeros_like();
        for ((&a, &b), &c) in self.a.iter().zip(self.b).zip(self.c) {
            let l_u = rhs(state, t + c * dt);
            k.scale(a);
            k.axpy(dt, &l_u);
            state.axpy(b, &k);
        }
    }
}

// =============================================================================
// Standard Integrator Enum (Zero-Cost Dispatch)
// =============================================================================

/// Built-in integrators selectable at runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StandardIntegrator {
    ForwardEuler,
    #[default]
    Rk4,
    Lsrk54,
    Lsrk144,
}

impl From<IntegratorKind> for StandardIntegrator {
    fn from(kind: IntegratorKind) -> Self {
        match kind {
            IntegratorKind::Euler => StandardIntegrator::ForwardEuler,
            IntegratorKind::Rk4 => StandardIntegrator::Rk4,
            IntegratorKind::Lsrk54 | IntegratorKind::CompiledLsrk54 => StandardIntegrator::Lsrk54,
            IntegratorKind::Lsrk144 => StandardIntegrator::Lsrk144,
        }
    }
}

impl StandardIntegrator {
    fn info(&self) -> &dyn IntegratorInfo {
        match self {
            StandardIntegrator::ForwardEuler => &ForwardEuler,
            StandardIntegrator::Rk4 => &ClassicalRK4,
            StandardIntegrator::Lsrk54 => &LowStorageRK::LSRK54,
            StandardIntegrator::Lsrk144 => &LowStorageRK::LSRK144,
        }
    }
}

impl IntegratorInfo for StandardIntegrator {
    fn name(&self) -> &'static str {
        self.info().name()
    }

    fn order(&self) -> usize {
        self.info().order()
    }

    fn n_stages(&self) -> usize {
        self.info().n_stages()
    }

    fn stage_times(&self, dt: f64) -> Vec<f64> {
        self.info().stage_times(dt)
    }
}

impl<S: Integrable> TimeIntegrator<S> for StandardIntegrator {
    fn step<F>(&self, state: &mut S, dt: f64, t: f64, rhs: F)
    where
        F: Fn(&S, f64) -> S,
    {
        match self {
            StandardIntegrator::ForwardEuler => ForwardEuler.step(state, dt, t, rhs),
            StandardIntegrator::Rk4 => ClassicalRK4.step(state, dt, t, rhs),
            StandardIntegrator::Lsrk54 => LowStorageRK::LSRK54.step(state, dt, t, rhs),
            StandardIntegrator::Lsrk144 => LowStorageRK::LSRK144.step(state, dt, t, rhs),
        }
    }
}
