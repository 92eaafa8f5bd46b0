//! Prescribed support settlement

use serde::{Deserialize, Serialize};

/// A prescribed (Ux, Uy, Rz) settlement at a restrained node, under a given
/// load case. Only the restrained components of a node's support actually
/// take effect; a settlement value at a free DoF is meaningless and ignored
/// by the post-processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportDisplacementLoad {
    pub ux: f64,
    pub uy: f64,
    pub rz: f64,
    pub load_case: String,
}

impl SupportDisplacementLoad {
    pub fn new(ux: f64, uy: f64, rz: f64, load_case: &str) -> Self {
        Self {
            ux,
            uy,
            rz,
            load_case: load_case.to_string(),
        }
    }

    pub fn settlement_y(value: f64, load_case: &str) -> Self {
        Self::new(0.0, value, 0.0, load_case)
    }
}
