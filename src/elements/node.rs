//! Node element - represents a point in the plane

use crate::elements::Support;
use crate::loads::{NodalLoad, SupportDisplacementLoad};
use crate::math::Mat3;
use serde::{Deserialize, Serialize};

/// A node in the 2D finite element model: a position, an optional support
/// condition, an optional elastic spring, and the loads applied directly
/// at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,

    /// Restraint condition, or `None` for a free node.
    pub support: Option<Support>,

    /// Elastic spring stiffness in global coordinates, at a node that is
    /// neither fully free nor rigidly supported.
    #[serde(skip)]
    pub spring: Option<Mat3>,

    /// Nodal loads applied directly at this node, one or more per load case.
    #[serde(default)]
    pub nodal_loads: Vec<NodalLoad>,

    /// Prescribed support settlement, one or more per load case.
    #[serde(default)]
    pub support_displacements: Vec<SupportDisplacementLoad>,

    /// Global DOF indices (Ux, Uy, Rz), assigned by the DOF numberer.
    #[serde(skip)]
    pub(crate) dof: Option<[usize; 3]>,
}

impl Node {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            support: None,
            spring: None,
            nodal_loads: Vec::new(),
            support_displacements: Vec::new(),
            dof: None,
        }
    }

    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Restraint for a given local DOF (0 = Ux, 1 = Uy, 2 = Rz); a node
    /// with no support is free in all three.
    pub fn is_restrained(&self, local_dof: usize) -> bool {
        match &self.support {
            Some(s) => s.restrained()[local_dof],
            None => false,
        }
    }

    pub fn dof(&self) -> Option<[usize; 3]> {
        self.dof
    }

    /// Sum of prescribed support-displacement loads for a load case,
    /// used both to build the "prescribed displacement" RHS extension
    /// and to answer `node_displacement` queries at restrained DOFs.
    pub fn prescribed_displacement(&self, load_case: &str) -> [f64; 3] {
        let mut total = [0.0; 3];
        for load in &self.support_displacements {
            if load.load_case == load_case {
                total[0] += load.ux;
                total[1] += load.uy;
                total[2] += load.rz;
            }
        }
        total
    }
}
