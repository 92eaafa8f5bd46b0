//! A two-node pin-ended axial (truss) bar element

use super::contract::{resolve_to_local, ElementContract};
use crate::loads::{FramePointLoad, FrameTrapezoidalLoad, FrameUniformLoad};
use crate::math::{self, Mat6, ShapeMat, Vec6};
use serde::{Deserialize, Serialize};

/// A pin-ended bar carrying only axial force: EA/L stiffness, no bending or
/// shear stiffness, and a permanent moment release at both ends (there is
/// no Hermite override to provide - internal moment is identically zero
/// everywhere along the bar).
///
/// Member loads with a transverse (local y) component are a physical
/// mismatch for a two-force member - a truss bar cannot develop the shear
/// and moment needed to react one - so only the axial component of any
/// point/uniform/trapezoidal load on a truss element contributes to its
/// fixed-end forces; the transverse component is dropped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrussElement {
    pub e: f64,
    pub a: f64,
}

impl TrussElement {
    pub fn new(e: f64, a: f64) -> Self {
        Self { e, a }
    }
}

impl ElementContract for TrussElement {
    fn local_stiffness(&self, length: f64) -> Mat6 {
        math::truss_local_stiffness(self.e, self.a, length)
    }

    fn releases(&self) -> [bool; 6] {
        [false, false, true, false, false, true]
    }

    fn local_fer_point(&self, load: &FramePointLoad, length: f64, t: &Mat6) -> Vec6 {
        let (fx, _fy, _mz) = resolve_to_local(load.fx, load.fy, load.mz, load.direction, t);
        let axial = math::fer_point_axial(fx, load.position, length);
        let fer = Vec6::from_row_slice(&[axial[0], 0.0, 0.0, axial[1], 0.0, 0.0]);
        t.transpose() * fer
    }

    fn local_fer_uniform(&self, load: &FrameUniformLoad, length: f64, t: &Mat6) -> Vec6 {
        let (wx, _wy, _) = resolve_to_local(load.wx, load.wy, 0.0, load.direction, t);
        let axial = math::fer_axial_distributed(wx, wx, load.l1, load.l2, length);
        let fer = Vec6::from_row_slice(&[axial[0], 0.0, 0.0, axial[1], 0.0, 0.0]);
        t.transpose() * fer
    }

    fn local_fer_trapezoidal(&self, load: &FrameTrapezoidalLoad, length: f64, t: &Mat6) -> Vec6 {
        let (wx1, _wy1, _) = resolve_to_local(load.wx1, load.wy1, 0.0, load.direction, t);
        let (wx2, _wy2, _) = resolve_to_local(load.wx2, load.wy2, 0.0, load.direction, t);
        let axial = math::fer_axial_distributed(wx1, wx2, load.l1, load.l2, length);
        let fer = Vec6::from_row_slice(&[axial[0], 0.0, 0.0, axial[1], 0.0, 0.0]);
        t.transpose() * fer
    }

    fn shape_function_at(&self, x: f64, length: f64) -> ShapeMat {
        let (l1, l2) = math::axial_shape_functions(x, length);
        #[rustfmt::skip]
        let data = [
            l1,  0.0, 0.0, l2,  0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        ];
        ShapeMat::from_row_slice(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn stiffness_has_no_bending_terms() {
        let el = TrussElement::new(200e9, 0.001);
        let k = el.local_stiffness(4.0);
        assert_relative_eq!(k[(1, 1)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(k[(2, 2)], 0.0, epsilon = 1e-12);
        assert!(k[(0, 0)] > 0.0);
    }
}
