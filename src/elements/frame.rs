//! A two-node planar beam-column element

use super::contract::{condense_and_globalize, resolve_to_local, ElementContract, EndReleases};
use crate::loads::{FramePointLoad, FrameTrapezoidalLoad, FrameUniformLoad};
use crate::math::{self, Mat6, ShapeMat, Vec6};
use serde::{Deserialize, Serialize};

/// A beam-column element with the standard 2D Euler-Bernoulli stiffness
/// (axial EA/L plus bending EI/L^3 terms), optionally pinned at one or both
/// ends via static condensation of the released rotational DOF.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameElement {
    /// Elastic modulus
    pub e: f64,
    /// Cross-sectional area
    pub a: f64,
    /// Second moment of area about the local z axis
    pub iz: f64,
    pub releases: EndReleases,
}

impl FrameElement {
    pub fn new(e: f64, a: f64, iz: f64) -> Self {
        Self {
            e,
            a,
            iz,
            releases: EndReleases::none(),
        }
    }

    pub fn with_releases(mut self, releases: EndReleases) -> Self {
        self.releases = releases;
        self
    }

    fn raw_local_stiffness(&self, length: f64) -> Mat6 {
        math::frame_local_stiffness(self.e, self.a, self.iz, length)
    }
}

impl ElementContract for FrameElement {
    fn local_stiffness(&self, length: f64) -> Mat6 {
        math::apply_releases(&self.raw_local_stiffness(length), &self.releases())
    }

    fn releases(&self) -> [bool; 6] {
        self.releases.as_dof_mask()
    }

    fn local_fer_point(&self, load: &FramePointLoad, length: f64, t: &Mat6) -> Vec6 {
        let (fx, fy, mz) = resolve_to_local(load.fx, load.fy, load.mz, load.direction, t);
        let axial = math::fer_point_axial(fx, load.position, length);
        let transverse = math::fer_point_transverse(fy, mz, load.position, length);
        let fer = Vec6::from_row_slice(&[
            axial[0],
            transverse[0],
            transverse[1],
            axial[1],
            transverse[2],
            transverse[3],
        ]);
        condense_and_globalize(fer, &self.raw_local_stiffness(length), &self.releases(), t)
    }

    fn local_fer_uniform(&self, load: &FrameUniformLoad, length: f64, t: &Mat6) -> Vec6 {
        let (wx, wy, _) = resolve_to_local(load.wx, load.wy, 0.0, load.direction, t);
        let axial = math::fer_axial_distributed(wx, wx, load.l1, load.l2, length);
        let transverse = math::fer_transverse_distributed(wy, wy, load.l1, load.l2, length);
        let fer = Vec6::from_row_slice(&[
            axial[0],
            transverse[0],
            transverse[1],
            axial[1],
            transverse[2],
            transverse[3],
        ]);
        condense_and_globalize(fer, &self.raw_local_stiffness(length), &self.releases(), t)
    }

    fn local_fer_trapezoidal(&self, load: &FrameTrapezoidalLoad, length: f64, t: &Mat6) -> Vec6 {
        let (wx1, wy1, _) = resolve_to_local(load.wx1, load.wy1, 0.0, load.direction, t);
        let (wx2, wy2, _) = resolve_to_local(load.wx2, load.wy2, 0.0, load.direction, t);
        let axial = math::fer_axial_distributed(wx1, wx2, load.l1, load.l2, length);
        let transverse = math::fer_transverse_distributed(wy1, wy2, load.l1, load.l2, length);
        let fer = Vec6::from_row_slice(&[
            axial[0],
            transverse[0],
            transverse[1],
            axial[1],
            transverse[2],
            transverse[3],
        ]);
        condense_and_globalize(fer, &self.raw_local_stiffness(length), &self.releases(), t)
    }

    fn shape_function_at(&self, x: f64, length: f64) -> ShapeMat {
        let (l1, l2) = math::axial_shape_functions(x, length);
        let (n1, n2, n3, n4) = math::hermite_shape_functions(x, length);
        let (d1, d2, d3, d4) = math::hermite_shape_derivatives(x, length);

        // Rows: Ux, Uy, Rz (rotation = dUy/dx, the beam slope).
        #[rustfmt::skip]
        let data = [
            l1,  0.0, 0.0, l2,  0.0, 0.0,
            0.0, n1,  n2,  0.0, n3,  n4,
            0.0, d1,  d2,  0.0, d3,  d4,
        ];
        ShapeMat::from_row_slice(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unreleased_stiffness_matches_raw() {
        let el = FrameElement::new(200e9, 0.01, 1e-4);
        let k = el.local_stiffness(5.0);
        let raw = el.raw_local_stiffness(5.0);
        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(k[(i, j)], raw[(i, j)], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn pinned_end_has_zero_moment_row() {
        let el = FrameElement::new(200e9, 0.01, 1e-4).with_releases(EndReleases::pin_i());
        let k = el.local_stiffness(5.0);
        for j in 0..6 {
            assert_relative_eq!(k[(2, j)], 0.0, epsilon = 1e-9);
            assert_relative_eq!(k[(j, 2)], 0.0, epsilon = 1e-9);
        }
    }
}
