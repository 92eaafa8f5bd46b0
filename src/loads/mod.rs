//! Load types and load combinations

mod load_case;
mod load_combo;
mod nodal_load;
mod point_load;
mod support_displacement;
mod trapezoidal_load;
mod uniform_load;

pub use load_case::{LoadCase, LoadCaseKind};
pub use load_combo::LoadCombination;
pub use nodal_load::NodalLoad;
pub use point_load::FramePointLoad;
pub use support_displacement::SupportDisplacementLoad;
pub use trapezoidal_load::FrameTrapezoidalLoad;
pub use uniform_load::FrameUniformLoad;

use serde::{Deserialize, Serialize};

/// Frame of reference a member or nodal load's (Fx, Fy) components are
/// expressed in: the structure's global axes, or the element/node's own
/// local axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Global,
    Local,
}
