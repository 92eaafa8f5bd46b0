//! Linearly-varying (trapezoidal) distributed loads on frame members

use super::Direction;
use serde::{Deserialize, Serialize};

/// A line load varying linearly from `(wx1, wy1)` at offset `l1` to
/// `(wx2, wy2)` at offset `length - l2`, both measured from the i-node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameTrapezoidalLoad {
    pub wx1: f64,
    pub wy1: f64,
    pub wx2: f64,
    pub wy2: f64,
    pub direction: Direction,
    pub l1: f64,
    pub l2: f64,
    pub load_case: String,
}

impl FrameTrapezoidalLoad {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        wx1: f64,
        wy1: f64,
        wx2: f64,
        wy2: f64,
        direction: Direction,
        l1: f64,
        l2: f64,
        load_case: &str,
    ) -> Self {
        Self {
            wx1,
            wy1,
            wx2,
            wy2,
            direction,
            l1,
            l2,
            load_case: load_case.to_string(),
        }
    }

    /// A transverse triangular load: zero at the i-end, `wy_max` at the j-end.
    pub fn triangular_transverse(wy_max: f64, load_case: &str) -> Self {
        Self::new(0.0, 0.0, 0.0, wy_max, Direction::Local, 0.0, 0.0, load_case)
    }
}
