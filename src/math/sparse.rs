//! Sparse matrix utilities for efficient FEA solves
//!
//! Stiffness matrices assembled from frame/truss elements are typically
//! 90%+ sparse with a narrow bandwidth once nodes are renumbered, so a
//! skyline (profile) Cholesky factorization is a good fit: it needs no
//! fill-in analysis beyond the column heights and degrades gracefully to
//! dense storage only for genuinely banded-out structures.

use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use thiserror::Error;

/// Sparse matrix builder using COO format, accumulating duplicate entries.
pub struct SparseMatrixBuilder {
    size: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixBuilder {
    /// Create a new sparse matrix builder for an `size` x `size` matrix.
    pub fn new(size: usize) -> Self {
        let estimated_nnz = size * 12;
        Self {
            size,
            entries: Vec::with_capacity(estimated_nnz),
        }
    }

    /// Add a value to the matrix (accumulates if already present at (row, col)).
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value.abs() > 1e-15 {
            self.entries.push((row, col, value));
        }
    }

    /// Scatter a fixed-size element matrix into the global matrix using the
    /// element's global DOF indices.
    pub fn add_element_matrix<const N: usize>(&mut self, dofs: &[usize; N], k_elem: &[[f64; N]; N]) {
        for (i, &di) in dofs.iter().enumerate() {
            for (j, &dj) in dofs.iter().enumerate() {
                self.add(di, dj, k_elem[i][j]);
            }
        }
    }

    /// Convert to CSR format for efficient solves.
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);
        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }
        CsrMatrix::from(&coo)
    }

    /// Convert to a dense matrix, for the QR fallback path and for tests.
    pub fn to_dense(&self) -> nalgebra::DMatrix<f64> {
        let mut mat = nalgebra::DMatrix::zeros(self.size, self.size);
        for &(row, col, val) in &self.entries {
            mat[(row, col)] += val;
        }
        mat
    }

    /// Number of accumulated (not necessarily deduplicated) entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// Failure modes of the sparse Cholesky factorization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FactorizationError {
    /// A diagonal pivot was exactly (or near-exactly) zero.
    #[error("zero pivot at row {0} during Cholesky factorization")]
    ZeroPivot(usize),

    /// A diagonal term went non-positive, meaning the matrix is not SPD -
    /// the structure is a mechanism, under-restrained, or has a released
    /// element reduced to a singular condensed stiffness.
    #[error("matrix is not positive definite at row {0}")]
    NotPositiveDefinite(usize),
}

/// Sparse Cholesky solver for symmetric positive definite matrices, stored
/// in skyline (profile) form: for each row, a dense strip from the first
/// nonzero column up to and including the diagonal.
pub struct SparseCholeskySolver {
    size: usize,
    skyline: Vec<Vec<f64>>,
    heights: Vec<usize>,
    factored: bool,
    pivot_tolerance: f64,
}

impl SparseCholeskySolver {
    /// Build the skyline profile from a CSR matrix's lower-triangular part.
    pub fn new(csr: &CsrMatrix<f64>) -> Self {
        let size = csr.nrows();

        let mut heights = vec![0usize; size];
        for (row, col, _val) in csr.triplet_iter() {
            if col < row {
                let height = row - col;
                if height > heights[row] {
                    heights[row] = height;
                }
            }
        }

        let mut skyline: Vec<Vec<f64>> = Vec::with_capacity(size);
        for &h in &heights {
            skyline.push(vec![0.0; h + 1]);
        }

        for (row, col, &val) in csr.triplet_iter() {
            if col <= row && col >= row - heights[row] {
                let idx = col - (row - heights[row]);
                skyline[row][idx] += val;
            }
        }

        Self {
            size,
            skyline,
            heights,
            factored: false,
            pivot_tolerance: 1e-14,
        }
    }

    /// Override the absolute magnitude below which a diagonal pivot is
    /// treated as zero rather than accepted.
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Factorize in place via the modified (skyline) Cholesky algorithm.
    pub fn factorize(&mut self) -> Result<(), FactorizationError> {
        for i in 0..self.size {
            let hi = self.heights[i];
            let start_i = i - hi;

            for j in start_i..i {
                let hj = self.heights[j];
                let start_j = j - hj;
                let start = start_i.max(start_j);

                let mut sum = 0.0;
                for k in start..j {
                    sum += self.get(i, k) * self.get(j, k);
                }

                let diag_j = self.skyline[j][hj];
                if diag_j.abs() < self.pivot_tolerance {
                    return Err(FactorizationError::ZeroPivot(j));
                }

                let idx = j - start_i;
                self.skyline[i][idx] = (self.skyline[i][idx] - sum) / diag_j;
            }

            let mut sum = 0.0;
            for j in start_i..i {
                let val = self.get(i, j);
                sum += val * val;
            }

            let diag = self.skyline[i][hi] - sum;
            if diag <= 0.0 {
                return Err(FactorizationError::NotPositiveDefinite(i));
            }
            self.skyline[i][hi] = diag.sqrt();
        }

        self.factored = true;
        Ok(())
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        if col > row {
            return self.get(col, row);
        }
        let h = self.heights[row];
        let start = row - h;
        if col < start {
            return 0.0;
        }
        self.skyline[row][col - start]
    }

    /// Solve `L L^T x = b` against the factorized matrix.
    ///
    /// Panics if called before a successful [`factorize`](Self::factorize) -
    /// this is a programmer error in this crate, never triggered by caller
    /// input, so it is asserted rather than threaded through `Result`.
    pub fn solve(&self, b: &DVector<f64>) -> DVector<f64> {
        assert!(self.factored, "solve called before a successful factorize");
        let mut x = b.clone();

        for i in 0..self.size {
            let hi = self.heights[i];
            let start = i - hi;
            let mut sum = 0.0;
            for j in start..i {
                sum += self.get(i, j) * x[j];
            }
            x[i] = (x[i] - sum) / self.get(i, i);
        }

        for i in (0..self.size).rev() {
            x[i] /= self.get(i, i);
            let hi = self.heights[i];
            let start = i - hi;
            for j in start..i {
                x[j] -= self.get(i, j) * x[i];
            }
        }

        x
    }
}

/// Bandwidth reduction via Reverse Cuthill-McKee. Returns a permutation
/// `perm` such that `perm[new_index] = old_index`.
pub fn reverse_cuthill_mckee(csr: &CsrMatrix<f64>) -> Vec<usize> {
    let n = csr.nrows();
    if n == 0 {
        return vec![];
    }

    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (row, col, &val) in csr.triplet_iter() {
        if val.abs() > 1e-15 && row != col {
            adj[row].push(col);
        }
    }

    let degrees: Vec<usize> = adj.iter().map(|v| v.len()).collect();
    for neighbors in &mut adj {
        neighbors.sort_by_key(|&i| degrees[i]);
    }

    let mut visited = vec![false; n];
    let mut result = Vec::with_capacity(n);

    loop {
        let next_start = (0..n)
            .filter(|&i| !visited[i])
            .min_by_key(|&i| degrees[i]);
        let Some(start) = next_start else { break };

        let mut queue = std::collections::VecDeque::new();
        queue.push_back(start);
        visited[start] = true;

        while let Some(node) = queue.pop_front() {
            result.push(node);
            for &neighbor in &adj[node] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    result.reverse();
    result
}

/// Apply a permutation to reorder a slice: `result[i] = vec[perm[i]]`.
pub fn apply_permutation<T: Clone>(vec: &[T], perm: &[usize]) -> Vec<T> {
    perm.iter().map(|&i| vec[i].clone()).collect()
}

/// Invert a permutation: `inv[old_idx] = new_idx`.
pub fn inverse_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (new_idx, &old_idx) in perm.iter().enumerate() {
        inv[old_idx] = new_idx;
    }
    inv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_duplicates() {
        let mut builder = SparseMatrixBuilder::new(2);
        builder.add(0, 0, 4.0);
        builder.add(0, 0, 1.0);
        let dense = builder.to_dense();
        assert!((dense[(0, 0)] - 5.0).abs() < 1e-10);
    }

    #[test]
    fn cholesky_solves_simple_spd_system() {
        let mut builder = SparseMatrixBuilder::new(3);
        builder.add(0, 0, 4.0);
        builder.add(0, 1, -1.0);
        builder.add(1, 0, -1.0);
        builder.add(1, 1, 4.0);
        builder.add(1, 2, -1.0);
        builder.add(2, 1, -1.0);
        builder.add(2, 2, 4.0);

        let csr = builder.to_csr();
        let mut solver = SparseCholeskySolver::new(&csr);
        solver.factorize().unwrap();

        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let x = solver.solve(&b);

        let dense = builder.to_dense();
        let residual = &dense * &x - &b;
        assert!(residual.norm() < 1e-8);
    }

    #[test]
    fn cholesky_rejects_non_spd_matrix() {
        let mut builder = SparseMatrixBuilder::new(2);
        builder.add(0, 0, 1.0);
        builder.add(0, 1, 2.0);
        builder.add(1, 0, 2.0);
        builder.add(1, 1, 1.0);

        let csr = builder.to_csr();
        let mut solver = SparseCholeskySolver::new(&csr);
        assert!(solver.factorize().is_err());
    }

    #[test]
    fn rcm_is_a_valid_permutation() {
        let mut builder = SparseMatrixBuilder::new(5);
        for i in 0..4 {
            builder.add(i, i + 1, 1.0);
            builder.add(i + 1, i, 1.0);
        }
        for i in 0..5 {
            builder.add(i, i, 2.0);
        }
        let csr = builder.to_csr();
        let perm = reverse_cuthill_mckee(&csr);
        let mut sorted = perm.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..5).collect::<Vec<_>>());
    }
}
