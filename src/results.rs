//! Output types returned by the post-processor

use serde::{Deserialize, Serialize};

/// Nodal displacement, 3 DOF per node (Ux, Uy, Rz).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    pub ux: f64,
    pub uy: f64,
    pub rz: f64,
}

impl Displacement {
    pub fn new(ux: f64, uy: f64, rz: f64) -> Self {
        Self { ux, uy, rz }
    }

    pub fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    pub fn translation_magnitude(&self) -> f64 {
        (self.ux.powi(2) + self.uy.powi(2)).sqrt()
    }
}

/// Support reaction at a restrained node (Fx, Fy, Mz), global coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    pub fx: f64,
    pub fy: f64,
    pub mz: f64,
}

impl Reactions {
    pub fn new(fx: f64, fy: f64, mz: f64) -> Self {
        Self { fx, fy, mz }
    }

    pub fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.fx * factor, self.fy * factor, self.mz * factor)
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(self.fx + other.fx, self.fy + other.fy, self.mz + other.mz)
    }
}

/// The six end forces of a two-node element in its own local frame:
/// `[Fx_i, Fy_i, Mz_i, Fx_j, Fy_j, Mz_j]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalEndForces {
    pub fx_i: f64,
    pub fy_i: f64,
    pub mz_i: f64,
    pub fx_j: f64,
    pub fy_j: f64,
    pub mz_j: f64,
}

impl LocalEndForces {
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            fx_i: arr[0],
            fy_i: arr[1],
            mz_i: arr[2],
            fx_j: arr[3],
            fy_j: arr[4],
            mz_j: arr[5],
        }
    }

    /// The local end forces acting at station `x = 0`, in the sign
    /// convention internal-force diagrams use (`Fx, Fy, Mz`).
    pub fn at_start(&self) -> InternalForces {
        InternalForces::new(self.fx_i, self.fy_i, self.mz_i)
    }
}

/// Internal force resultants (axial, shear, moment) at a station along an
/// element's length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InternalForces {
    pub fx: f64,
    pub fy: f64,
    pub mz: f64,
}

impl InternalForces {
    pub fn new(fx: f64, fy: f64, mz: f64) -> Self {
        Self { fx, fy, mz }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.fx * factor, self.fy * factor, self.mz * factor)
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(self.fx + other.fx, self.fy + other.fy, self.mz + other.mz)
    }
}
