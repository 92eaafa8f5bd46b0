//! Load cases

use serde::{Deserialize, Serialize};

/// Category of a load case, used for documentation and load-combination
/// factor tables rather than by the solver itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadCaseKind {
    Dead,
    Live,
    Wind,
    Seismic,
    Snow,
    Other,
}

/// An identity-comparable tag that groups related loads under a common name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadCase {
    pub name: String,
    pub kind: LoadCaseKind,
}

impl LoadCase {
    pub fn new(name: &str, kind: LoadCaseKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }

    pub fn dead(name: &str) -> Self {
        Self::new(name, LoadCaseKind::Dead)
    }

    pub fn live(name: &str) -> Self {
        Self::new(name, LoadCaseKind::Live)
    }

    pub fn wind(name: &str) -> Self {
        Self::new(name, LoadCaseKind::Wind)
    }
}

impl Default for LoadCase {
    fn default() -> Self {
        Self::new("Case 1", LoadCaseKind::Other)
    }
}
