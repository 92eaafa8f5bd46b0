//! Concentrated loads on frame members

use super::Direction;
use serde::{Deserialize, Serialize};

/// A concentrated force/moment applied at a fixed offset along a frame
/// element, measured from the i-node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramePointLoad {
    pub fx: f64,
    pub fy: f64,
    pub mz: f64,
    pub direction: Direction,
    /// Distance from the i-node, `0 <= position <= element length`.
    pub position: f64,
    pub load_case: String,
}

impl FramePointLoad {
    pub fn new(fx: f64, fy: f64, mz: f64, direction: Direction, position: f64, load_case: &str) -> Self {
        Self {
            fx,
            fy,
            mz,
            direction,
            position,
            load_case: load_case.to_string(),
        }
    }

    /// A transverse point force in the element's local y direction.
    pub fn transverse(fy: f64, position: f64, load_case: &str) -> Self {
        Self::new(0.0, fy, 0.0, Direction::Local, position, load_case)
    }

    /// An axial point force along the element's local x direction.
    pub fn axial(fx: f64, position: f64, load_case: &str) -> Self {
        Self::new(fx, 0.0, 0.0, Direction::Local, position, load_case)
    }
}
