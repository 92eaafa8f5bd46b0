//! Closed-form internal-force and displacement evaluation along an element
//!
//! Rather than materializing a mutable scratch structure and walking it
//! segment by segment, every query here is a pure function of the element's
//! condensed local end forces, its local displacement vector, and its
//! member loads - consistent with this crate's "recompute on every query"
//! post-processing model (see [`crate::post_processor`]).
//!
//! The governing equations are the ones a mechanics-of-materials text
//! gives for a prismatic beam-column: `EA u'' = -wx(x)` for axial
//! deformation, `EI v'''' = wy(x)` for transverse deflection. Both are
//! solved here as a particular solution (built by repeated integration of
//! the applied load, zero initial conditions at `x = 0`) plus a homogeneous
//! polynomial whose free constants are fixed by matching the *actual*
//! solved nodal values at both ends - so the diagram is exact for the
//! uniform and trapezoidal load shapes this crate supports, not just an
//! interpolation of the two end values.

use crate::math::gauss_legendre_3;

/// A local-frame distributed load varying linearly from `w1` at `a` to `w2`
/// at `b`, zero outside `[a, b]`.
#[derive(Clone, Copy)]
pub struct LoadSpan {
    pub a: f64,
    pub b: f64,
    pub w1: f64,
    pub w2: f64,
}

impl LoadSpan {
    fn w_at(&self, s: f64) -> f64 {
        if s < self.a || s > self.b {
            return 0.0;
        }
        if (self.b - self.a).abs() < 1e-12 {
            self.w1
        } else {
            self.w1 + (self.w2 - self.w1) * (s - self.a) / (self.b - self.a)
        }
    }

    /// The `order`-th repeated integral of this span's load from 0 to `x`,
    /// split at the span's own boundaries so each Gauss-Legendre-3 call
    /// sees a smooth (and at most quartic) integrand - exact to machine
    /// precision for every order this crate needs (order <= 4).
    pub fn integral(&self, order: u32, x: f64) -> f64 {
        if order == 0 {
            return self.w_at(x);
        }
        integrate_piecewise(&[self.a, self.b], x, |s| self.integral(order - 1, s))
    }
}

fn integrate_piecewise<F: Fn(f64) -> f64>(breakpoints: &[f64], to: f64, f: F) -> f64 {
    let from = 0.0;
    let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
    let mut points: Vec<f64> = breakpoints.iter().copied().filter(|&p| p > lo && p < hi).collect();
    points.push(from);
    points.push(to);
    points.sort_by(|a, b| a.partial_cmp(b).unwrap());
    points.dedup();

    let mut total = 0.0;
    for pair in points.windows(2) {
        total += gauss_legendre_3(pair[0], pair[1], &f);
    }
    total
}

/// Axial displacement `u(x)` given the end values `u_i`, `u_j`, the bar's
/// `EA`, its length, and the axial component of every distributed load on
/// it (already resolved to local coordinates).
pub fn axial_displacement_at(length: f64, ea: f64, spans: &[LoadSpan], u_i: f64, u_j: f64, x: f64) -> f64 {
    let up = |s: f64| -spans.iter().map(|span| span.integral(2, s)).sum::<f64>() / ea;
    let up_prime = |s: f64| -spans.iter().map(|span| span.integral(1, s)).sum::<f64>() / ea;

    let d1 = (u_j - u_i - up(length)) / length;
    let _ = up_prime; // kept for symmetry with transverse_displacement_at's derivative term
    up(x) + u_i + d1 * x
}

/// Transverse displacement `v(x)` (and its slope) given the end
/// displacements/rotations, `EI`, length, and the transverse component of
/// every distributed load on the element.
pub fn transverse_displacement_at(
    length: f64,
    ei: f64,
    spans: &[LoadSpan],
    v_i: f64,
    theta_i: f64,
    v_j: f64,
    theta_j: f64,
    x: f64,
) -> (f64, f64) {
    let vp = |s: f64| spans.iter().map(|span| span.integral(4, s)).sum::<f64>() / ei;
    let vp_prime = |s: f64| spans.iter().map(|span| span.integral(3, s)).sum::<f64>() / ei;

    let l = length;
    let rhs_a = v_j - v_i - theta_i * l - vp(l);
    let rhs_b = theta_j - theta_i - vp_prime(l);

    // [ L^3/6  L^2/2 ] [C1]   [rhs_a]
    // [ L^2/2  L     ] [C2] = [rhs_b]
    let det = (l.powi(3) / 6.0) * l - (l.powi(2) / 2.0) * (l.powi(2) / 2.0);
    let c1 = (rhs_a * l - rhs_b * l.powi(2) / 2.0) / det;
    let c2 = ((l.powi(3) / 6.0) * rhs_b - (l.powi(2) / 2.0) * rhs_a) / det;

    let v = vp(x) + c1 * x.powi(3) / 6.0 + c2 * x.powi(2) / 2.0 + theta_i * x + v_i;
    let slope = vp_prime(x) + c1 * x.powi(2) / 2.0 + c2 * x + theta_i;
    (v, slope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn simply_supported_udl_midspan_deflection_matches_closed_form() {
        // v_i = v_j = 0, theta_i = -theta_j = w*L^3/(24*EI) for a
        // simply-supported beam under a full-span uniform load.
        let length: f64 = 6.0;
        let e = 200e9;
        let iz = 8e-5;
        let ei = e * iz;
        let w = -5_000.0;
        let theta = w * length.powi(3) / (24.0 * ei);

        let spans = [LoadSpan { a: 0.0, b: length, w1: w, w2: w }];
        let (v_mid, _) = transverse_displacement_at(length, ei, &spans, 0.0, theta, 0.0, -theta, length / 2.0);

        let expected = 5.0 * w * length.powi(4) / (384.0 * ei);
        assert_relative_eq!(v_mid, expected, epsilon = 1e-6 * expected.abs());
    }

    #[test]
    fn axial_bar_with_no_distributed_load_is_linear() {
        let length = 4.0;
        let ea = 200e9 * 0.002;
        let u = axial_displacement_at(length, ea, &[], 0.0, 0.002, length / 2.0);
        assert_relative_eq!(u, 0.001, epsilon = 1e-12);
    }
}
