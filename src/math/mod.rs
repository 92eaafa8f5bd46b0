//! Mathematical primitives for 2D frame/truss analysis

pub mod sparse;

use nalgebra::{DMatrix, DVector, Matrix3, Matrix6, SMatrix, SVector};

pub use sparse::{
    reverse_cuthill_mckee, FactorizationError, SparseCholeskySolver, SparseMatrixBuilder,
};

/// Dense general matrix, used for the free-free block handed to the QR fallback
pub type Mat = DMatrix<f64>;
/// Dense general vector
pub type Vec = DVector<f64>;
/// 3x3 matrix - a single node's DOF block or an elastic spring stiffness
pub type Mat3 = Matrix3<f64>;
/// 6x6 matrix - local stiffness / transformation for a 2-node, 3-DOF-per-node element
pub type Mat6 = Matrix6<f64>;
/// 6-element vector - local end forces/displacements for a 2-node element
pub type Vec6 = SVector<f64, 6>;
/// 3-element vector - a single node's DOF values
pub type Vec3 = SVector<f64, 3>;
/// 3x6 matrix - a Hermite shape function evaluated at a station along an element
pub type ShapeMat = SMatrix<f64, 3, 6>;

/// Compute the 6x6 global-to-local transformation matrix for a 2-node planar element.
///
/// The in-plane rotation only mixes the translational DOFs (Ux, Uy); the
/// rotational DOF (Rz) is unchanged by a rotation about the out-of-plane axis.
pub fn frame_transformation_matrix(i_node: [f64; 2], j_node: [f64; 2]) -> Mat6 {
    let dx = j_node[0] - i_node[0];
    let dy = j_node[1] - i_node[1];
    let length = (dx * dx + dy * dy).sqrt();
    if length < 1e-10 {
        panic!("element has zero length");
    }
    let cx = dx / length;
    let cy = dy / length;

    let mut t = Mat6::zeros();
    for block in 0..2 {
        let o = block * 3;
        t[(o, o)] = cx;
        t[(o, o + 1)] = cy;
        t[(o + 1, o)] = -cy;
        t[(o + 1, o + 1)] = cx;
        t[(o + 2, o + 2)] = 1.0;
    }
    t
}

/// Local stiffness matrix for a 2D frame (beam-column) element, DOF order
/// (Ux_i, Uy_i, Rz_i, Ux_j, Uy_j, Rz_j).
pub fn frame_local_stiffness(e: f64, a: f64, iz: f64, length: f64) -> Mat6 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let ei_l3 = 12.0 * e * iz / l3;
    let ei_l2 = 6.0 * e * iz / l2;
    let ei_l_4 = 4.0 * e * iz / l;
    let ei_l_2 = 2.0 * e * iz / l;

    #[rustfmt::skip]
    let data = [
        ea_l,   0.0,     0.0,     -ea_l,   0.0,     0.0,
        0.0,    ei_l3,   ei_l2,    0.0,   -ei_l3,   ei_l2,
        0.0,    ei_l2,   ei_l_4,   0.0,   -ei_l2,   ei_l_2,
        -ea_l,  0.0,     0.0,      ea_l,   0.0,     0.0,
        0.0,   -ei_l3,  -ei_l2,    0.0,    ei_l3,  -ei_l2,
        0.0,    ei_l2,   ei_l_2,   0.0,   -ei_l2,   ei_l_4,
    ];
    Mat6::from_row_slice(&data)
}

/// Local stiffness matrix for a pin-ended axial (truss) element: only the
/// axial DOFs (Ux_i, Ux_j) carry stiffness.
pub fn truss_local_stiffness(e: f64, a: f64, length: f64) -> Mat6 {
    let ea_l = e * a / length;
    let mut k = Mat6::zeros();
    k[(0, 0)] = ea_l;
    k[(0, 3)] = -ea_l;
    k[(3, 0)] = -ea_l;
    k[(3, 3)] = ea_l;
    k
}

/// Three-point Gauss-Legendre quadrature on [a, b], exact for polynomials up
/// to degree 5 (the fixed-end-force integrands below never exceed degree 4).
pub fn gauss_legendre_3<F: Fn(f64) -> f64>(a: f64, b: f64, f: F) -> f64 {
    const NODES: [f64; 3] = [-0.774596669241483, 0.0, 0.774596669241483];
    const WEIGHTS: [f64; 3] = [5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0];

    let mid = 0.5 * (a + b);
    let half = 0.5 * (b - a);
    let mut sum = 0.0;
    for i in 0..3 {
        let x = mid + half * NODES[i];
        sum += WEIGHTS[i] * f(x);
    }
    half * sum
}

/// Hermite cubic shape functions for transverse bending, evaluated at
/// distance `x` from the i-end of a beam of length `length`.
/// Returns (N1, N2, N3, N4) for (Uy_i, Rz_i, Uy_j, Rz_j).
pub fn hermite_shape_functions(x: f64, length: f64) -> (f64, f64, f64, f64) {
    let l = length;
    let xi = x / l;
    let xi2 = xi * xi;
    let xi3 = xi2 * xi;

    let n1 = 1.0 - 3.0 * xi2 + 2.0 * xi3;
    let n2 = l * (xi - 2.0 * xi2 + xi3);
    let n3 = 3.0 * xi2 - 2.0 * xi3;
    let n4 = l * (-xi2 + xi3);
    (n1, n2, n3, n4)
}

/// Linear axial shape functions, evaluated at distance `x` from the i-end.
/// Returns (L1, L2) for (Ux_i, Ux_j).
pub fn axial_shape_functions(x: f64, length: f64) -> (f64, f64) {
    let xi = x / length;
    (1.0 - xi, xi)
}

/// First derivatives (w.r.t. x) of the Hermite shape functions, used for the
/// consistent load of a concentrated end-of-span moment.
pub fn hermite_shape_derivatives(x: f64, length: f64) -> (f64, f64, f64, f64) {
    let l = length;
    let xi = x / l;
    let xi2 = xi * xi;

    let d1 = (-6.0 * xi + 6.0 * xi2) / l;
    let d2 = 1.0 - 4.0 * xi + 3.0 * xi2;
    let d3 = (6.0 * xi - 6.0 * xi2) / l;
    let d4 = -2.0 * xi + 3.0 * xi2;
    (d1, d2, d3, d4)
}

/// Consistent (virtual-work) fixed-end force for a transverse distributed
/// load varying linearly from `w1` at `l1` to `w2` at `length - l2`, computed
/// as `-integral(w(x) * N(x) dx)` against the Hermite shape functions - the
/// negative of the work-equivalent nodal load, matching the sign convention
/// of a clamped-beam reaction. Returns [Fy_i, Mz_i, Fy_j, Mz_j].
pub fn fer_transverse_distributed(w1: f64, w2: f64, l1: f64, l2: f64, length: f64) -> [f64; 4] {
    let a = l1;
    let b = length - l2;
    if b <= a {
        return [0.0; 4];
    }
    let w_at = |x: f64| {
        if (b - a).abs() < 1e-12 {
            w1
        } else {
            w1 + (w2 - w1) * (x - a) / (b - a)
        }
    };

    let mut fer = [0.0; 4];
    fer[0] = gauss_legendre_3(a, b, |x| w_at(x) * hermite_shape_functions(x, length).0);
    fer[1] = gauss_legendre_3(a, b, |x| w_at(x) * hermite_shape_functions(x, length).1);
    fer[2] = gauss_legendre_3(a, b, |x| w_at(x) * hermite_shape_functions(x, length).2);
    fer[3] = gauss_legendre_3(a, b, |x| w_at(x) * hermite_shape_functions(x, length).3);
    for v in &mut fer {
        *v = -*v;
    }
    fer
}

/// Consistent fixed-end force for an axial distributed load varying linearly
/// from `w1` at `l1` to `w2` at `length - l2`. Returns [Ux_i, Ux_j].
pub fn fer_axial_distributed(w1: f64, w2: f64, l1: f64, l2: f64, length: f64) -> [f64; 2] {
    let a = l1;
    let b = length - l2;
    if b <= a {
        return [0.0; 2];
    }
    let w_at = |x: f64| {
        if (b - a).abs() < 1e-12 {
            w1
        } else {
            w1 + (w2 - w1) * (x - a) / (b - a)
        }
    };

    let mut fer = [0.0; 2];
    fer[0] = gauss_legendre_3(a, b, |x| w_at(x) * axial_shape_functions(x, length).0);
    fer[1] = gauss_legendre_3(a, b, |x| w_at(x) * axial_shape_functions(x, length).1);
    for v in &mut fer {
        *v = -*v;
    }
    fer
}

/// Consistent fixed-end force for a transverse point force `p` and
/// concentrated moment `m0` applied at distance `a` from the i-end. Returns
/// [Fy_i, Mz_i, Fy_j, Mz_j].
pub fn fer_point_transverse(p: f64, m0: f64, a: f64, length: f64) -> [f64; 4] {
    let (n1, n2, n3, n4) = hermite_shape_functions(a, length);
    let (d1, d2, d3, d4) = hermite_shape_derivatives(a, length);
    [
        -(p * n1 + m0 * d1),
        -(p * n2 + m0 * d2),
        -(p * n3 + m0 * d3),
        -(p * n4 + m0 * d4),
    ]
}

/// Consistent fixed-end force for an axial point force `fx` applied at
/// distance `a` from the i-end. Returns [Ux_i, Ux_j].
pub fn fer_point_axial(fx: f64, a: f64, length: f64) -> [f64; 2] {
    let (l1, l2) = axial_shape_functions(a, length);
    [-(fx * l1), -(fx * l2)]
}

/// Apply static condensation to remove released DOFs from a local stiffness
/// matrix, zeroing their row/column in the result.
pub fn apply_releases(k: &Mat6, released: &[bool; 6]) -> Mat6 {
    let unreleased: std::vec::Vec<usize> = (0..6).filter(|&i| !released[i]).collect();
    let rel: std::vec::Vec<usize> = (0..6).filter(|&i| released[i]).collect();

    if rel.is_empty() {
        return *k;
    }

    let n1 = unreleased.len();
    let n2 = rel.len();

    let mut k11 = DMatrix::zeros(n1, n1);
    let mut k12 = DMatrix::zeros(n1, n2);
    let mut k21 = DMatrix::zeros(n2, n1);
    let mut k22 = DMatrix::zeros(n2, n2);

    for (i, &ui) in unreleased.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            k11[(i, j)] = k[(ui, uj)];
        }
        for (j, &rj) in rel.iter().enumerate() {
            k12[(i, j)] = k[(ui, rj)];
        }
    }
    for (i, &ri) in rel.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            k21[(i, j)] = k[(ri, uj)];
        }
        for (j, &rj) in rel.iter().enumerate() {
            k22[(i, j)] = k[(ri, rj)];
        }
    }

    let k22_inv = match k22.clone().try_inverse() {
        Some(inv) => inv,
        None => return *k,
    };
    let condensed = &k11 - &k12 * &k22_inv * &k21;

    let mut result = Mat6::zeros();
    for (i, &ui) in unreleased.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            result[(ui, uj)] = condensed[(i, j)];
        }
    }
    result
}

/// Apply the same static condensation to a fixed-end-force vector, following
/// `fer_condensed = fer1 - k12 * inv(k22) * fer2`.
pub fn apply_fer_releases(fer: &Vec6, k: &Mat6, released: &[bool; 6]) -> Vec6 {
    let unreleased: std::vec::Vec<usize> = (0..6).filter(|&i| !released[i]).collect();
    let rel: std::vec::Vec<usize> = (0..6).filter(|&i| released[i]).collect();

    if rel.is_empty() {
        return *fer;
    }

    let n1 = unreleased.len();
    let n2 = rel.len();

    let mut k12 = DMatrix::zeros(n1, n2);
    let mut k22 = DMatrix::zeros(n2, n2);
    for (i, &ui) in unreleased.iter().enumerate() {
        for (j, &rj) in rel.iter().enumerate() {
            k12[(i, j)] = k[(ui, rj)];
        }
    }
    for (i, &ri) in rel.iter().enumerate() {
        for (j, &rj) in rel.iter().enumerate() {
            k22[(i, j)] = k[(ri, rj)];
        }
    }

    let mut fer1 = DVector::zeros(n1);
    let mut fer2 = DVector::zeros(n2);
    for (i, &ui) in unreleased.iter().enumerate() {
        fer1[i] = fer[ui];
    }
    for (i, &ri) in rel.iter().enumerate() {
        fer2[i] = fer[ri];
    }

    let k22_inv = match k22.clone().try_inverse() {
        Some(inv) => inv,
        None => return *fer,
    };
    let condensed = &fer1 - &k12 * &k22_inv * &fer2;

    let mut result = Vec6::zeros();
    for (i, &ui) in unreleased.iter().enumerate() {
        result[ui] = condensed[i];
    }
    result
}

/// Solve a dense linear system by QR decomposition (natural ordering); used
/// as the fallback when the sparse Cholesky factorization reports the matrix
/// is not positive definite.
pub fn solve_qr(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().qr().solve(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn transformation_matrix_horizontal() {
        let t = frame_transformation_matrix([0.0, 0.0], [10.0, 0.0]);
        assert_relative_eq!(t[(0, 0)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(1, 1)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn transformation_matrix_vertical() {
        let t = frame_transformation_matrix([0.0, 0.0], [0.0, 10.0]);
        // local x = global Y, local y = -global X
        assert_relative_eq!(t[(0, 1)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(1, 0)], -1.0, epsilon = 1e-10);
    }

    #[test]
    fn transformation_matrix_is_orthogonal() {
        let t = frame_transformation_matrix([0.0, 0.0], [3.0, 4.0]);
        let product = t * t.transpose();
        for i in 0..6 {
            for j in 0..6 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(product[(i, j)], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn local_stiffness_is_symmetric() {
        let k = frame_local_stiffness(200e9, 0.01, 1e-4, 5.0);
        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn hermite_shape_functions_partition_of_unity_for_translation() {
        // N1 + N3 isn't generally 1 (they interpolate translation AND rotation
        // jointly), but at the ends they must reduce to the nodal values.
        let (n1, n2, n3, n4) = hermite_shape_functions(0.0, 5.0);
        assert_relative_eq!(n1, 1.0, epsilon = 1e-12);
        assert_relative_eq!(n2, 0.0, epsilon = 1e-12);
        assert_relative_eq!(n3, 0.0, epsilon = 1e-12);
        assert_relative_eq!(n4, 0.0, epsilon = 1e-12);

        let (n1, n2, n3, n4) = hermite_shape_functions(5.0, 5.0);
        assert_relative_eq!(n1, 0.0, epsilon = 1e-12);
        assert_relative_eq!(n2, 0.0, epsilon = 1e-12);
        assert_relative_eq!(n3, 1.0, epsilon = 1e-12);
        assert_relative_eq!(n4, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn gauss_legendre_integrates_constant_exactly() {
        let area = gauss_legendre_3(2.0, 5.0, |_x| 4.0);
        assert_relative_eq!(area, 12.0, epsilon = 1e-10);
    }

    #[test]
    fn full_length_uniform_load_matches_known_closed_form() {
        let w = -5.0;
        let length = 6.0;
        let fer = fer_transverse_distributed(w, w, 0.0, 0.0, length);
        assert_relative_eq!(fer[0], -w * length / 2.0, epsilon = 1e-8);
        assert_relative_eq!(fer[1], -w * length * length / 12.0, epsilon = 1e-8);
        assert_relative_eq!(fer[2], -w * length / 2.0, epsilon = 1e-8);
        assert_relative_eq!(fer[3], w * length * length / 12.0, epsilon = 1e-8);
    }

    #[test]
    fn full_length_axial_uniform_load_matches_known_closed_form() {
        let w = 3.0;
        let length = 4.0;
        let fer = fer_axial_distributed(w, w, 0.0, 0.0, length);
        assert_relative_eq!(fer[0], -w * length / 2.0, epsilon = 1e-8);
        assert_relative_eq!(fer[1], -w * length / 2.0, epsilon = 1e-8);
    }

    #[test]
    fn point_load_fer_matches_known_closed_form() {
        let p = 10.0;
        let a = 3.0;
        let length = 8.0;
        let b = length - a;
        let fer = fer_point_transverse(p, 0.0, a, length);
        let expected_fy_i = -p * b * b * (3.0 * a + b) / length.powi(3);
        let expected_mz_i = -p * a * b * b / (length * length);
        assert_relative_eq!(fer[0], expected_fy_i, epsilon = 1e-8);
        assert_relative_eq!(fer[1], expected_mz_i, epsilon = 1e-8);
    }
}
