//! Global stiffness assembly and per-load-case right-hand sides
//!
//! Builds one triplet-accumulated stiffness matrix for the whole structure,
//! then for each selected load case a right-hand side of
//! `nodal loads - fixed-end forces`, adjusted for any prescribed support
//! displacement. DOF numbering places free DOFs before restrained ones (see
//! [`crate::dof_numberer`]), so the free-free block the solver factorizes is
//! exactly the leading `ndof x ndof` principal submatrix.

use std::collections::HashMap;

use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::elements::ElementContract;
use crate::error::{StructureError, StructureResult};
use crate::math::{self, Mat6};
use crate::model::Structure;

/// The assembled system for a structure: a full `total x total` stiffness
/// matrix plus, for every selected load case, a full-length RHS vector and
/// the per-element global fixed-end-force contribution (needed later by the
/// post-processor to compute reactions and local end forces).
pub struct Assembly {
    pub ndof: usize,
    pub total: usize,
    pub csr: CsrMatrix<f64>,
    pub rhs: HashMap<String, DVector<f64>>,
    /// element name -> load case -> accumulated global FER (6-vector,
    /// i-end then j-end).
    pub element_fer: HashMap<String, HashMap<String, [f64; 6]>>,
}

impl Assembly {
    /// Global stiffness entries with both endpoints in the free block,
    /// contracted to its own `ndof x ndof` CSR matrix.
    pub fn free_block(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.ndof, self.ndof);
        for (row, col, &val) in self.csr.triplet_iter() {
            if row < self.ndof && col < self.ndof && val.abs() > 1e-15 {
                coo.push(row, col, val);
            }
        }
        CsrMatrix::from(&coo)
    }

    /// `K * d` restricted to the free rows, used to move the
    /// free-restrained block's contribution to a prescribed displacement
    /// over to the right-hand side: `p1 = rhs[..ndof] - K10 * d_restrained`.
    pub fn free_rows_matvec(&self, d: &DVector<f64>) -> DVector<f64> {
        let mut result = DVector::zeros(self.ndof);
        for (row, col, &val) in self.csr.triplet_iter() {
            if row < self.ndof {
                result[row] += val * d[col];
            }
        }
        result
    }
}

/// Assemble the global stiffness matrix and, for each of `cases`, its RHS.
pub fn assemble(structure: &Structure, cases: &[String]) -> StructureResult<Assembly> {
    let ndof = structure.ndof();
    let total = structure.total_dof();
    let mut builder = math::SparseMatrixBuilder::new(total);

    for (_, member) in structure.members_iter() {
        let i_node = structure.node(&member.i_node)?;
        let j_node = structure.node(&member.j_node)?;
        let length = i_node.distance_to(j_node);
        if length <= 0.0 {
            return Err(StructureError::InvalidInput(format!(
                "element has zero length between '{}' and '{}'",
                member.i_node, member.j_node
            )));
        }

        let t = math::frame_transformation_matrix(i_node.coords(), j_node.coords());
        let k_local = member.element.local_stiffness(length);
        let k_global = t.transpose() * k_local * t;

        let i_dof = i_node.dof().expect("node DOF not assigned before assembly");
        let j_dof = j_node.dof().expect("node DOF not assigned before assembly");
        let dofs = [i_dof[0], i_dof[1], i_dof[2], j_dof[0], j_dof[1], j_dof[2]];
        scatter(&mut builder, &dofs, &k_global);
    }

    for (name, node) in structure.nodes_iter() {
        if let Some(spring) = node.spring {
            let dof = node.dof().expect("node DOF not assigned before assembly");
            for a in 0..3 {
                for b in 0..3 {
                    builder.add(dof[a], dof[b], spring[(a, b)]);
                }
            }
            let _ = name;
        }
    }

    let csr = builder.to_csr();

    let mut rhs = HashMap::new();
    let mut element_fer: HashMap<String, HashMap<String, [f64; 6]>> = HashMap::new();

    for case in cases {
        let mut p = DVector::zeros(total);

        for (_, node) in structure.nodes_iter() {
            let dof = node.dof().expect("node DOF not assigned before assembly");
            for load in &node.nodal_loads {
                if &load.load_case != case {
                    continue;
                }
                p[dof[0]] += load.fx;
                p[dof[1]] += load.fy;
                p[dof[2]] += load.mz;
            }
        }

        for (member_name, member) in structure.members_iter() {
            let i_node = structure.node(&member.i_node)?;
            let j_node = structure.node(&member.j_node)?;
            let length = i_node.distance_to(j_node);
            let t = math::frame_transformation_matrix(i_node.coords(), j_node.coords());

            let i_dof = i_node.dof().expect("node DOF not assigned before assembly");
            let j_dof = j_node.dof().expect("node DOF not assigned before assembly");

            let mut total_fer = [0.0f64; 6];
            let mut any = false;

            for load in &member.point_loads {
                if &load.load_case != case {
                    continue;
                }
                let fer = member.element.local_fer_point(load, length, &t);
                accumulate(&mut total_fer, &fer);
                any = true;
            }
            for load in &member.uniform_loads {
                if &load.load_case != case {
                    continue;
                }
                let fer = member.element.local_fer_uniform(load, length, &t);
                accumulate(&mut total_fer, &fer);
                any = true;
            }
            for load in &member.trapezoidal_loads {
                if &load.load_case != case {
                    continue;
                }
                let fer = member.element.local_fer_trapezoidal(load, length, &t);
                accumulate(&mut total_fer, &fer);
                any = true;
            }

            if any {
                for k in 0..3 {
                    p[i_dof[k]] -= total_fer[k];
                    p[j_dof[k]] -= total_fer[3 + k];
                }
                element_fer
                    .entry(member_name.clone())
                    .or_default()
                    .insert(case.clone(), total_fer);
            }
        }

        rhs.insert(case.clone(), p);
    }

    Ok(Assembly {
        ndof,
        total,
        csr,
        rhs,
        element_fer,
    })
}

fn scatter(builder: &mut math::SparseMatrixBuilder, dofs: &[usize; 6], k: &Mat6) {
    for (i, &di) in dofs.iter().enumerate() {
        for (j, &dj) in dofs.iter().enumerate() {
            builder.add(di, dj, k[(i, j)]);
        }
    }
}

fn accumulate(total: &mut [f64; 6], fer: &nalgebra::SVector<f64, 6>) {
    for i in 0..6 {
        total[i] += fer[i];
    }
}

/// Full-length (`total` DOF) vector holding the prescribed support
/// displacement for `case` at every restrained DOF and zero elsewhere.
pub fn prescribed_displacement_vector(structure: &Structure, case: &str) -> DVector<f64> {
    let total = structure.total_dof();
    let mut d = DVector::zeros(total);
    for (_, node) in structure.nodes_iter() {
        let dof = match node.dof() {
            Some(d) => d,
            None => continue,
        };
        let prescribed = node.prescribed_displacement(case);
        let restrained = match &node.support {
            Some(s) => s.restrained(),
            None => [false, false, false],
        };
        for k in 0..3 {
            if restrained[k] {
                d[dof[k]] = prescribed[k];
            }
        }
    }
    d
}
