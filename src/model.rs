//! The structural model container and its assemble-solve-recover pipeline

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisStatus, SolveOptions};
use crate::assembler;
use crate::elements::{Element, Node, Support};
use crate::error::{StructureError, StructureResult};
use crate::loads::{FramePointLoad, FrameTrapezoidalLoad, FrameUniformLoad, NodalLoad};
use crate::math::{self, Mat6};
use nalgebra::DVector;

/// A two-node element together with the node names it connects and the
/// member loads attached to it. The connectivity lives here rather than on
/// [`Element`] itself, mirroring the way a node's own loads live on [`Node`]
/// rather than in a side table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub i_node: String,
    pub j_node: String,
    pub element: Element,
    #[serde(default)]
    pub point_loads: Vec<FramePointLoad>,
    #[serde(default)]
    pub uniform_loads: Vec<FrameUniformLoad>,
    #[serde(default)]
    pub trapezoidal_loads: Vec<FrameTrapezoidalLoad>,
}

impl Member {
    fn new(i_node: &str, j_node: &str, element: Element) -> Self {
        Self {
            i_node: i_node.to_string(),
            j_node: j_node.to_string(),
            element,
            point_loads: Vec::new(),
            uniform_loads: Vec::new(),
            trapezoidal_loads: Vec::new(),
        }
    }
}

/// A planar frame/truss structure and the one-shot linear-static solve
/// pipeline over it.
///
/// Node and element connectivity is resolved through string names rather
/// than shared pointers: a [`Member`] refers to its nodes by name, and the
/// post-processor looks elements and nodes back up by name rather than
/// walking an owned reference graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    node_order: Vec<String>,
    nodes: HashMap<String, Node>,
    member_order: Vec<String>,
    members: HashMap<String, Member>,
    selected_load_cases: Vec<String>,

    #[serde(skip)]
    status: AnalysisStatus,
    #[serde(skip)]
    ndof: usize,
    #[serde(skip)]
    total_dof: usize,
    #[serde(skip)]
    pub(crate) displacements: HashMap<String, DVector<f64>>,
    #[serde(skip)]
    pub(crate) element_fer: HashMap<String, HashMap<String, [f64; 6]>>,
}

impl Default for Structure {
    fn default() -> Self {
        Self::new()
    }
}

impl Structure {
    pub fn new() -> Self {
        Self {
            node_order: Vec::new(),
            nodes: HashMap::new(),
            member_order: Vec::new(),
            members: HashMap::new(),
            selected_load_cases: Vec::new(),
            status: AnalysisStatus::NotRun,
            ndof: 0,
            total_dof: 0,
            displacements: HashMap::new(),
            element_fer: HashMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // Model building
    // ------------------------------------------------------------------

    pub fn add_node(&mut self, name: &str, node: Node) -> StructureResult<()> {
        if self.nodes.contains_key(name) {
            return Err(StructureError::DuplicateName(name.to_string()));
        }
        self.node_order.push(name.to_string());
        self.nodes.insert(name.to_string(), node);
        self.status = AnalysisStatus::NotRun;
        Ok(())
    }

    pub fn add_element(&mut self, name: &str, i_node: &str, j_node: &str, element: Element) -> StructureResult<()> {
        if !self.nodes.contains_key(i_node) {
            return Err(StructureError::NodeNotFound(i_node.to_string()));
        }
        if !self.nodes.contains_key(j_node) {
            return Err(StructureError::NodeNotFound(j_node.to_string()));
        }
        if self.members.contains_key(name) {
            return Err(StructureError::DuplicateName(name.to_string()));
        }
        self.member_order.push(name.to_string());
        self.members.insert(name.to_string(), Member::new(i_node, j_node, element));
        self.status = AnalysisStatus::NotRun;
        Ok(())
    }

    pub fn set_support(&mut self, node_name: &str, support: Support) -> StructureResult<()> {
        let node = self.nodes.get_mut(node_name).ok_or_else(|| StructureError::NodeNotFound(node_name.to_string()))?;
        node.support = Some(support);
        self.status = AnalysisStatus::NotRun;
        Ok(())
    }

    pub fn set_spring(&mut self, node_name: &str, spring: crate::math::Mat3) -> StructureResult<()> {
        let node = self.nodes.get_mut(node_name).ok_or_else(|| StructureError::NodeNotFound(node_name.to_string()))?;
        node.spring = Some(spring);
        self.status = AnalysisStatus::NotRun;
        Ok(())
    }

    pub fn add_nodal_load(&mut self, node_name: &str, load: NodalLoad) -> StructureResult<()> {
        if load.direction == crate::loads::Direction::Local {
            return Err(StructureError::InvalidInput(
                "nodal loads have no local frame to resolve against - use Direction::Global".to_string(),
            ));
        }
        let node = self.nodes.get_mut(node_name).ok_or_else(|| StructureError::NodeNotFound(node_name.to_string()))?;
        node.nodal_loads.push(load);
        self.status = AnalysisStatus::NotRun;
        Ok(())
    }

    pub fn add_support_displacement(&mut self, node_name: &str, load: crate::loads::SupportDisplacementLoad) -> StructureResult<()> {
        let node = self.nodes.get_mut(node_name).ok_or_else(|| StructureError::NodeNotFound(node_name.to_string()))?;
        node.support_displacements.push(load);
        self.status = AnalysisStatus::NotRun;
        Ok(())
    }

    pub fn add_point_load(&mut self, element_name: &str, load: FramePointLoad) -> StructureResult<()> {
        let member = self
            .members
            .get_mut(element_name)
            .ok_or_else(|| StructureError::ElementNotFound(element_name.to_string()))?;
        member.point_loads.push(load);
        self.status = AnalysisStatus::NotRun;
        Ok(())
    }

    pub fn add_uniform_load(&mut self, element_name: &str, load: FrameUniformLoad) -> StructureResult<()> {
        let member = self
            .members
            .get_mut(element_name)
            .ok_or_else(|| StructureError::ElementNotFound(element_name.to_string()))?;
        member.uniform_loads.push(load);
        self.status = AnalysisStatus::NotRun;
        Ok(())
    }

    pub fn add_trapezoidal_load(&mut self, element_name: &str, load: FrameTrapezoidalLoad) -> StructureResult<()> {
        let member = self
            .members
            .get_mut(element_name)
            .ok_or_else(|| StructureError::ElementNotFound(element_name.to_string()))?;
        member.trapezoidal_loads.push(load);
        self.status = AnalysisStatus::NotRun;
        Ok(())
    }

    /// Select a load case to be solved by the next [`solve`](Self::solve)
    /// call that doesn't explicitly override its case list. Selecting the
    /// same case twice is a no-op.
    pub fn select_load_case(&mut self, name: &str) {
        if !self.selected_load_cases.iter().any(|c| c == name) {
            self.selected_load_cases.push(name.to_string());
        }
        self.status = AnalysisStatus::NotRun;
    }

    // ------------------------------------------------------------------
    // Accessors used by the assembler and post-processor
    // ------------------------------------------------------------------

    pub fn node(&self, name: &str) -> StructureResult<&Node> {
        self.nodes.get(name).ok_or_else(|| StructureError::NodeNotFound(name.to_string()))
    }

    pub fn element(&self, name: &str) -> StructureResult<&Member> {
        self.members.get(name).ok_or_else(|| StructureError::ElementNotFound(name.to_string()))
    }

    pub fn nodes_iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.node_order.iter().map(move |name| (name, &self.nodes[name]))
    }

    pub fn members_iter(&self) -> impl Iterator<Item = (&String, &Member)> {
        self.member_order.iter().map(move |name| (name, &self.members[name]))
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn ndof(&self) -> usize {
        self.ndof
    }

    pub fn total_dof(&self) -> usize {
        self.total_dof
    }

    /// Elements incident on `node_name`, in element-insertion order.
    pub fn incident_elements<'a, 'b>(
        &'a self,
        node_name: &'b str,
    ) -> impl Iterator<Item = (&'a String, &'a Member)> + 'b
    where
        'a: 'b,
    {
        self.members_iter().filter(move |(_, m)| m.i_node == node_name || m.j_node == node_name)
    }

    // ------------------------------------------------------------------
    // Solve
    // ------------------------------------------------------------------

    pub fn solve(&mut self, options: SolveOptions) -> StructureResult<()> {
        let cases = match &options.load_cases {
            Some(cases) => cases.clone(),
            None => self.selected_load_cases.clone(),
        };
        if cases.is_empty() {
            self.status = AnalysisStatus::Failure;
            return Err(StructureError::NoLoadCases);
        }

        let started = Instant::now();
        if options.log {
            log::info!("solve start: {} load case(s) selected", cases.len());
        }

        let numbering = crate::dof_numberer::number_dofs(&self.node_order, &self.nodes);
        self.ndof = numbering.ndof;
        self.total_dof = numbering.total;
        for (name, dof) in &numbering.dof {
            self.nodes.get_mut(name).unwrap().dof = Some(*dof);
        }

        if options.log {
            log::info!("solve start: {} equation(s)", self.ndof);
        }

        let result = self.run_solve(&cases, &options);

        match &result {
            Ok(()) => {
                self.status = AnalysisStatus::Successful;
                if options.log {
                    log::info!(
                        "solve end: status=Successful, elapsed={:?}",
                        started.elapsed()
                    );
                }
            }
            Err(_) => {
                self.status = AnalysisStatus::Failure;
                if options.log {
                    log::info!("solve end: status=Failure, elapsed={:?}", started.elapsed());
                }
            }
        }

        result
    }

    fn run_solve(&mut self, cases: &[String], options: &SolveOptions) -> StructureResult<()> {
        let assembly = assembler::assemble(&*self, cases)?;
        self.displacements = crate::solver::solve_cases(&*self, &assembly, cases, options)?;
        self.element_fer = assembly.element_fer;
        Ok(())
    }

    /// Raw per-case global displacement at a node's three DOFs. Local end
    /// forces and reactions are computed by the post-processor, not here;
    /// this is exposed so it can reach the solved displacement vector.
    pub(crate) fn node_global_displacement(&self, node_name: &str, case: &str) -> StructureResult<[f64; 3]> {
        let node = self.node(node_name)?;
        let dof = node.dof().ok_or(StructureError::NotAnalyzed)?;
        let d = self
            .displacements
            .get(case)
            .ok_or_else(|| StructureError::LoadCaseNotFound(case.to_string()))?;
        Ok([d[dof[0]], d[dof[1]], d[dof[2]]])
    }

    pub(crate) fn element_transform(&self, member: &Member) -> StructureResult<(Mat6, f64)> {
        let i_node = self.node(&member.i_node)?;
        let j_node = self.node(&member.j_node)?;
        let length = i_node.distance_to(j_node);
        Ok((math::frame_transformation_matrix(i_node.coords(), j_node.coords()), length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::FrameElement;
    use approx::assert_relative_eq;

    fn cantilever() -> Structure {
        let mut s = Structure::new();
        s.add_node("N1", Node::new(0.0, 0.0)).unwrap();
        s.add_node("N2", Node::new(5.0, 0.0)).unwrap();
        s.add_element("M1", "N1", "N2", Element::Frame(FrameElement::new(200e9, 0.01, 1e-4)))
            .unwrap();
        s.set_support("N1", Support::fixed()).unwrap();
        s
    }

    #[test]
    fn duplicate_node_name_errors() {
        let mut s = cantilever();
        let err = s.add_node("N1", Node::new(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, StructureError::DuplicateName(_)));
    }

    #[test]
    fn local_direction_nodal_load_is_rejected() {
        let mut s = cantilever();
        let err = s
            .add_nodal_load("N2", NodalLoad::new(1.0, 0.0, 0.0, crate::loads::Direction::Local, "Case 1"))
            .unwrap_err();
        assert!(matches!(err, StructureError::InvalidInput(_)));
    }

    #[test]
    fn solve_with_no_load_cases_fails() {
        let mut s = cantilever();
        let err = s.solve(SolveOptions::default()).unwrap_err();
        assert!(matches!(err, StructureError::NoLoadCases));
        assert_eq!(s.status(), AnalysisStatus::Failure);
    }

    #[test]
    fn cantilever_tip_load_matches_closed_form() {
        let mut s = cantilever();
        s.add_nodal_load("N2", NodalLoad::fy(-10_000.0, "Case 1")).unwrap();
        s.select_load_case("Case 1");
        s.solve(SolveOptions::default().with_logging(false)).unwrap();

        let disp = s.node_global_displacement("N2", "Case 1").unwrap();
        let e = 200e9;
        let iz = 1e-4;
        let length: f64 = 5.0;
        let expected = -10_000.0 * length.powi(3) / (3.0 * e * iz);
        assert_relative_eq!(disp[1], expected, epsilon = 1e-9);
    }
}
