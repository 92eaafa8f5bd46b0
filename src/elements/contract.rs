//! The polymorphic interface every concrete element kind satisfies

use crate::loads::{Direction, FramePointLoad, FrameTrapezoidalLoad, FrameUniformLoad};
use crate::math::{self, Mat6, ShapeMat, Vec6};
use serde::{Deserialize, Serialize};

/// Which end(s) of a two-node element have a moment release (a hinge that
/// breaks rotational continuity between the element and the node).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndReleases {
    pub i_release: bool,
    pub j_release: bool,
}

impl EndReleases {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn pin_i() -> Self {
        Self {
            i_release: true,
            j_release: false,
        }
    }

    pub fn pin_j() -> Self {
        Self {
            i_release: false,
            j_release: true,
        }
    }

    pub fn pin_both() -> Self {
        Self {
            i_release: true,
            j_release: true,
        }
    }

    /// The released local DOFs, in element-local DOF order
    /// (Ux_i, Uy_i, Rz_i, Ux_j, Uy_j, Rz_j) - only the rotational DOFs can
    /// carry a moment release in this 2D engine.
    pub fn as_dof_mask(&self) -> [bool; 6] {
        [false, false, self.i_release, false, false, self.j_release]
    }
}

/// Capability object every element kind (frame, truss, ...) implements so
/// the assembler and post-processor can treat them uniformly.
pub trait ElementContract {
    /// Local stiffness matrix, already condensed for any end releases.
    fn local_stiffness(&self, length: f64) -> Mat6;

    /// Released local DOFs (see [`EndReleases::as_dof_mask`]).
    fn releases(&self) -> [bool; 6];

    /// Global fixed-end-force contribution of a point load, local coords.
    fn local_fer_point(&self, load: &FramePointLoad, length: f64, t: &Mat6) -> Vec6;

    /// Global fixed-end-force contribution of a uniform load, local coords.
    fn local_fer_uniform(&self, load: &FrameUniformLoad, length: f64, t: &Mat6) -> Vec6;

    /// Global fixed-end-force contribution of a trapezoidal load, local coords.
    fn local_fer_trapezoidal(&self, load: &FrameTrapezoidalLoad, length: f64, t: &Mat6) -> Vec6;

    /// The 3x6 shape-function matrix (Ux, Uy, Rz rows) evaluated at
    /// distance `x` from the i-end, used by the post-processor at released
    /// ends in place of the generic segment polynomials.
    fn shape_function_at(&self, x: f64, length: f64) -> ShapeMat;
}

/// Rotate a (Fx, Fy) pair expressed in `direction`'s frame into the
/// element's local frame using the rotation block of `t`.
pub(crate) fn resolve_to_local(fx: f64, fy: f64, mz: f64, direction: Direction, t: &Mat6) -> (f64, f64, f64) {
    match direction {
        Direction::Local => (fx, fy, mz),
        Direction::Global => {
            let lx = t[(0, 0)] * fx + t[(0, 1)] * fy;
            let ly = t[(1, 0)] * fx + t[(1, 1)] * fy;
            (lx, ly, mz)
        }
    }
}

/// Condense a local stiffness-aware fixed-end-force vector for end releases
/// and rotate it into global coordinates via `T^T`.
pub(crate) fn condense_and_globalize(fer_local: Vec6, k_local: &Mat6, releases: &[bool; 6], t: &Mat6) -> Vec6 {
    let condensed = math::apply_fer_releases(&fer_local, k_local, releases);
    t.transpose() * condensed
}

/// The small catalog of concrete element kinds this crate ships, dispatched
/// through [`ElementContract`] rather than matched on by every caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Element {
    Frame(crate::elements::FrameElement),
    Truss(crate::elements::TrussElement),
}

impl ElementContract for Element {
    fn local_stiffness(&self, length: f64) -> Mat6 {
        match self {
            Element::Frame(f) => f.local_stiffness(length),
            Element::Truss(t) => t.local_stiffness(length),
        }
    }

    fn releases(&self) -> [bool; 6] {
        match self {
            Element::Frame(f) => f.releases(),
            Element::Truss(t) => t.releases(),
        }
    }

    fn local_fer_point(&self, load: &FramePointLoad, length: f64, t: &Mat6) -> Vec6 {
        match self {
            Element::Frame(f) => f.local_fer_point(load, length, t),
            Element::Truss(tr) => tr.local_fer_point(load, length, t),
        }
    }

    fn local_fer_uniform(&self, load: &FrameUniformLoad, length: f64, t: &Mat6) -> Vec6 {
        match self {
            Element::Frame(f) => f.local_fer_uniform(load, length, t),
            Element::Truss(tr) => tr.local_fer_uniform(load, length, t),
        }
    }

    fn local_fer_trapezoidal(&self, load: &FrameTrapezoidalLoad, length: f64, t: &Mat6) -> Vec6 {
        match self {
            Element::Frame(f) => f.local_fer_trapezoidal(load, length, t),
            Element::Truss(tr) => tr.local_fer_trapezoidal(load, length, t),
        }
    }

    fn shape_function_at(&self, x: f64, length: f64) -> ShapeMat {
        match self {
            Element::Frame(f) => f.shape_function_at(x, length),
            Element::Truss(t) => t.shape_function_at(x, length),
        }
    }
}

impl Element {
    pub fn is_truss(&self) -> bool {
        matches!(self, Element::Truss(_))
    }
}
