//! # Numerical integration
//!
//! Fixed-step integrators shared by the simulated systems. Second-order
//! systems are advanced from generalized positions `q`, velocities `v` and
//! accelerations `a`; first-order systems use [`rk4`] over a derivative
//! function.

use serde::{Deserialize, Serialize};

fn axpy<const N: usize>(y: &[f64; N], a: f64, x: &[f64; N]) -> [f64; N] {
    std::array::from_fn(|i| y[i] + a * x[i])
}

/// Explicit Euler: positions advance with the old velocities.
#[must_use]
pub fn explicit_euler<const N: usize>(
    q: [f64; N],
    v: [f64; N],
    a: [f64; N],
    dt: f64,
) -> ([f64; N], [f64; N]) {
    (axpy(&q, dt, &v), axpy(&v, dt, &a))
}

/// Semi-implicit (symplectic) Euler: positions advance with the new velocities.
#[must_use]
pub fn semi_implicit_euler<const N: usize>(
    q: [f64; N],
    v: [f64; N],
    a: [f64; N],
    dt: f64,
) -> ([f64; N], [f64; N]) {
    let v = axpy(&v, dt, &a);
    (axpy(&q, dt, &v), v)
}

/// One classic fourth-order Runge-Kutta step of `dy/dt = derivs(y)`.
pub fn rk4<const N: usize>(derivs: impl Fn(&[f64; N]) -> [f64; N], y0: &[f64; N], dt: f64) -> [f64; N] {
    let half = dt / 2.0;
    let k1 = derivs(y0);
    let k2 = derivs(&axpy(y0, half, &k1));
    let k3 = derivs(&axpy(y0, half, &k2));
    let k4 = derivs(&axpy(y0, dt, &k3));
    std::array::from_fn(|i| y0[i] + dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]))
}

/// Choice of Euler scheme for second-order systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    Euler,
    #[default]
    SemiImplicitEuler,
}

impl Integrator {
    #[must_use]
    pub fn advance<const N: usize>(
        self,
        q: [f64; N],
        v: [f64; N],
        a: [f64; N],
        dt: f64,
    ) -> ([f64; N], [f64; N]) {
        match self {
            Integrator::Euler => explicit_euler(q, v, a, dt),
            Integrator::SemiImplicitEuler => semi_implicit_euler(q, v, a, dt),
        }
    }
}
