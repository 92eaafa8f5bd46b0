//! Structural elements: nodes, supports, and the frame/truss element catalog

pub(crate) mod contract;
mod frame;
mod node;
mod support;
mod truss;

pub use contract::{Element, ElementContract, EndReleases};
pub use frame::FrameElement;
pub use node::Node;
pub use support::Support;
pub use truss::TrussElement;
