//! Plane Frame FEA - a native Rust 2D linear finite-element library
//!
//! This library implements the assemble-solve-recover pipeline for planar
//! frame/truss structures:
//! - Degree-of-freedom numbering that places free DOFs before restrained ones
//! - Sparse stiffness assembly with equivalent nodal loads per load case
//! - A symmetric sparse Cholesky solve with a dense QR fallback
//! - Post-processing into nodal displacements, reactions, and per-element
//!   internal force/displacement diagrams
//!
//! ## Example
//! ```rust
//! use plane_frame_fea::prelude::*;
//!
//! let mut structure = Structure::new();
//!
//! structure.add_node("N1", Node::new(0.0, 0.0)).unwrap();
//! structure.add_node("N2", Node::new(5.0, 0.0)).unwrap();
//!
//! structure
//!     .add_element("M1", "N1", "N2", Element::Frame(FrameElement::new(200e9, 1e-2, 2e-4)))
//!     .unwrap();
//!
//! structure.set_support("N1", Support::fixed()).unwrap();
//! structure.add_nodal_load("N2", NodalLoad::fy(-10_000.0, "Case 1")).unwrap();
//! structure.select_load_case("Case 1");
//!
//! structure.solve(SolveOptions::default()).unwrap();
//!
//! let post = PostProcessor::new(&structure).unwrap();
//! let disp = post.node_displacement("N2", "Case 1").unwrap();
//! assert!(disp.uy < 0.0);
//! ```

pub mod analysis;
pub mod assembler;
pub mod dof_numberer;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod post_processor;
pub mod results;
pub mod solver;

/// Re-export of the common types needed to build and solve a model.
pub mod prelude {
    pub use crate::analysis::{AnalysisStatus, SolveOptions};
    pub use crate::elements::{
        Element, ElementContract, EndReleases, FrameElement, Node, Support, TrussElement,
    };
    pub use crate::error::{StructureError, StructureResult};
    pub use crate::loads::{
        Direction, FramePointLoad, FrameTrapezoidalLoad, FrameUniformLoad, LoadCase,
        LoadCaseKind, LoadCombination, NodalLoad, SupportDisplacementLoad,
    };
    pub use crate::model::Structure;
    pub use crate::post_processor::PostProcessor;
    pub use crate::results::{Displacement, InternalForces, LocalEndForces, Reactions};
}
