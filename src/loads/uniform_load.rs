//! Uniformly distributed loads on frame members

use super::Direction;
use serde::{Deserialize, Serialize};

/// A uniform line load over a sub-span of a frame element,
/// `[l1, length - l2]` measured from the i-node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameUniformLoad {
    pub wx: f64,
    pub wy: f64,
    pub direction: Direction,
    /// Offset from the i-node where the loaded span starts.
    pub l1: f64,
    /// Offset from the j-node where the loaded span ends.
    pub l2: f64,
    pub load_case: String,
}

impl FrameUniformLoad {
    pub fn new(wx: f64, wy: f64, direction: Direction, l1: f64, l2: f64, load_case: &str) -> Self {
        Self {
            wx,
            wy,
            direction,
            l1,
            l2,
            load_case: load_case.to_string(),
        }
    }

    /// A transverse uniform load over the full element length.
    pub fn full_span_transverse(wy: f64, load_case: &str) -> Self {
        Self::new(0.0, wy, Direction::Local, 0.0, 0.0, load_case)
    }
}
