//! Symmetric sparse Cholesky solve with a dense QR fallback
//!
//! Factorizes the free-free stiffness block once and reuses it across every
//! selected load case. A Cholesky failure (the matrix is not positive
//! definite - a mechanism, an under-restrained structure, or a released
//! element whose condensed stiffness went singular) falls back to a dense
//! QR solve on the same free-free block rather than failing outright.

use std::collections::HashMap;

use nalgebra::DVector;

use crate::analysis::SolveOptions;
use crate::assembler::{self, Assembly};
use crate::error::{StructureError, StructureResult};
use crate::math::{self, Mat};
use crate::model::Structure;

/// Solve every case in `cases` against `assembly`, returning a full-length
/// (`total` DOF) displacement vector per case.
pub fn solve_cases(
    structure: &Structure,
    assembly: &Assembly,
    cases: &[String],
    options: &SolveOptions,
) -> StructureResult<HashMap<String, DVector<f64>>> {
    let free_block = assembly.free_block();
    let mut cholesky = math::SparseCholeskySolver::new(&free_block).with_pivot_tolerance(options.pivot_tolerance);

    let use_qr = match cholesky.factorize() {
        Ok(()) => false,
        Err(err) => {
            log::debug!("Cholesky factorization failed ({err}), falling back to dense QR");
            true
        }
    };

    let dense_free = if use_qr { Some(free_block_to_dense(assembly)) } else { None };

    let mut displacements = HashMap::with_capacity(cases.len());
    for case in cases {
        let d_prescribed = assembler::prescribed_displacement_vector(structure, case);
        let rhs = assembly
            .rhs
            .get(case)
            .cloned()
            .unwrap_or_else(|| DVector::zeros(assembly.total));

        let correction = assembly.free_rows_matvec(&d_prescribed);
        let p1 = (rhs.rows(0, assembly.ndof) - correction.rows(0, assembly.ndof)).clone_owned();

        let d1 = if use_qr {
            solve_dense(dense_free.as_ref().unwrap(), &p1)?
        } else {
            cholesky.solve(&p1)
        };

        let mut d_full = DVector::zeros(assembly.total);
        d_full.rows_mut(0, assembly.ndof).copy_from(&d1);
        for i in assembly.ndof..assembly.total {
            d_full[i] = d_prescribed[i];
        }

        displacements.insert(case.clone(), d_full);
    }

    Ok(displacements)
}

fn solve_dense(a: &Mat, b: &math::Vec) -> StructureResult<DVector<f64>> {
    let x = math::solve_qr(a, b).ok_or(StructureError::Singular)?;
    if x.iter().all(|v| v.is_finite()) {
        Ok(x)
    } else {
        Err(StructureError::Singular)
    }
}

fn free_block_to_dense(assembly: &Assembly) -> Mat {
    let mut dense = Mat::zeros(assembly.ndof, assembly.ndof);
    for (row, col, &val) in assembly.csr.triplet_iter() {
        if row < assembly.ndof && col < assembly.ndof {
            dense[(row, col)] += val;
        }
    }
    dense
}
