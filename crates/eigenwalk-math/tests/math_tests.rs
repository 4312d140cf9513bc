//! Integration tests for eigenwalk-math.

use approx::assert_relative_eq;

use eigenwalk_math::decomposition::Eigendecomposition;
use eigenwalk_math::eigen::eigen;
use eigenwalk_math::inverse::{condition_number, determinant, inverse};
use eigenwalk_math::rank::{eigen_rank, has_dependent_columns, is_full_rank, rank, singular_values};
use eigenwalk_math::transform::{magnitude_change, AffineMap, LinearMap};
use eigenwalk_math::{Matrix, Vector};
use eigenwalk_types::LinalgError;

const TOL: f64 = 1e-9;

fn m(rows: &[&[f64]]) -> Matrix {
    Matrix::from_rows(rows).unwrap()
}

fn v(data: &[f64]) -> Vector {
    Vector::from_slice(data)
}

// ─── Vector Tests ─────────────────────────────────────────────

#[test]
fn vector_norm_and_dot() {
    let a = v(&[3.0, 4.0]);
    assert!((a.norm() - 5.0).abs() < 1e-12);
    assert_eq!(a.dot(&v(&[1.0, 2.0])).unwrap(), 11.0);
}

#[test]
fn vector_length_mismatch() {
    let err = v(&[1.0, 2.0]).dot(&v(&[1.0])).unwrap_err();
    assert!(matches!(err, LinalgError::DimensionMismatch { .. }));
}

#[test]
fn zero_vector_has_no_direction() {
    assert!(Vector::zeros(3).normalized().is_none());
}

#[test]
fn vector_parse_and_display() {
    let parsed: Vector = "1, 2.5 -3".parse().unwrap();
    assert_eq!(parsed, v(&[1.0, 2.5, -3.0]));
    assert_eq!(format!("{:.1}", parsed), "(1.0, 2.5, -3.0)");
}

#[test]
fn vector_angle_between_axes() {
    let angle = v(&[1.0, 0.0]).angle_to(&v(&[0.0, 2.0])).unwrap().unwrap();
    assert_relative_eq!(angle, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
}

// ─── Matrix Tests ─────────────────────────────────────────────

#[test]
fn ragged_rows_rejected() {
    let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
    let err = Matrix::from_rows(&rows).unwrap_err();
    assert!(matches!(err, LinalgError::RaggedRows { row: 1, expected: 2, found: 1 }));
}

#[test]
fn empty_matrix_rejected() {
    let rows: Vec<Vec<f64>> = Vec::new();
    assert!(matches!(Matrix::from_rows(&rows), Err(LinalgError::EmptyMatrix)));
}

#[test]
fn matrix_parse() {
    let a: Matrix = "2, 1; 1, 2".parse().unwrap();
    assert_eq!(a, m(&[&[2.0, 1.0], &[1.0, 2.0]]));
    assert!("1, 2; 3".parse::<Matrix>().is_err());
    assert!("1, x".parse::<Matrix>().is_err());
}

#[test]
fn matrix_display_grid() {
    let a = m(&[&[1.0, -2.0], &[10.0, 0.0]]);
    assert_eq!(format!("{:.1}", a), "[  1.0 -2.0 ]\n[ 10.0  0.0 ]");
}

#[test]
fn matrix_vector_product() {
    let a = m(&[&[-1.0, 3.0], &[2.0, -2.0]]);
    let image = a.mul_vec(&v(&[2.0, 1.0])).unwrap();
    assert!(image.approx_eq(&v(&[1.0, 2.0]), 1e-12));
}

#[test]
fn matrix_vector_dimension_mismatch() {
    let a = Matrix::identity(2);
    let err = a.mul_vec(&v(&[1.0, 2.0, 3.0])).unwrap_err();
    assert!(matches!(err, LinalgError::DimensionMismatch { op: "mul_vec", .. }));
}

#[test]
fn matrix_matrix_product() {
    let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
    let b = m(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0]]);
    let ab = a.mul_mat(&b).unwrap();
    assert_eq!(ab.shape().to_string(), "2×2");
    assert!(ab.approx_eq(&m(&[&[4.0, 5.0], &[10.0, 11.0]]), 1e-12));
    assert!(b.mul_mat(&b).is_err());
}

#[test]
fn transpose_and_symmetry() {
    let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
    assert_eq!(a.transpose(), m(&[&[1.0, 3.0], &[2.0, 4.0]]));
    assert!(!a.is_symmetric(1e-12));
    assert!(a.mul_mat(&a.transpose()).unwrap().is_symmetric(1e-12));
}

#[test]
fn array_literal_and_columns() {
    let a = Matrix::from_array([[1.0, 2.0], [3.0, 4.0]]);
    assert_eq!(a, m(&[&[1.0, 2.0], &[3.0, 4.0]]));
    assert_eq!(a.trace(), 5.0);
    let rebuilt = Matrix::from_columns(&a.columns()).unwrap();
    assert_eq!(rebuilt, a);
    assert!(Matrix::from_columns(&[v(&[1.0, 2.0]), v(&[3.0])]).is_err());
}

#[test]
fn matrix_serializes_as_rows() {
    let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
    let json = serde_json::to_string(&a).unwrap();
    assert_eq!(json, "[[1.0,2.0],[3.0,4.0]]");
    let back: Matrix = serde_json::from_str(&json).unwrap();
    assert_eq!(a, back);
    assert!(serde_json::from_str::<Matrix>("[[1.0],[2.0,3.0]]").is_err());
}

// ─── Transformation Tests ─────────────────────────────────────

#[test]
fn linear_map_composition_matches_product() {
    let rotate = LinearMap::new(AffineMap::rotation(std::f64::consts::FRAC_PI_2).linear().clone());
    let stretch = LinearMap::new(Matrix::diagonal(&[2.0, 1.0]));
    let both = stretch.compose(&rotate).unwrap();
    let x = v(&[1.0, 0.0]);
    let step = stretch.apply(&rotate.apply(&x).unwrap()).unwrap();
    assert!(both.apply(&x).unwrap().approx_eq(&step, 1e-12));
    assert!(step.approx_eq(&v(&[0.0, 1.0]), 1e-12));
}

#[test]
fn magnitude_change_of_uniform_scaling() {
    let change = magnitude_change(&Matrix::diagonal(&[3.0, 3.0]), &v(&[1.0, 1.0])).unwrap();
    assert_relative_eq!(change.ratio.unwrap(), 3.0, epsilon = 1e-12);
    assert_relative_eq!(change.output_norm, 3.0 * 2f64.sqrt(), epsilon = 1e-12);
}

#[test]
fn magnitude_change_zero_vector() {
    let change = magnitude_change(&Matrix::identity(2), &Vector::zeros(2)).unwrap();
    assert!(change.ratio.is_none());
}

#[test]
fn rotation_preserves_length() {
    let r = AffineMap::rotation(0.7);
    let change = magnitude_change(r.linear(), &v(&[2.0, -5.0])).unwrap();
    assert_relative_eq!(change.ratio.unwrap(), 1.0, epsilon = 1e-12);
}

#[test]
fn affine_apply_matches_homogeneous() {
    let map = AffineMap::new(m(&[&[2.0, 0.0], &[1.0, 1.0]]), v(&[1.0, -1.0])).unwrap();
    let x = v(&[3.0, 4.0]);
    let direct = map.apply(&x).unwrap();
    assert!(direct.approx_eq(&v(&[7.0, 6.0]), 1e-12));
    assert!(map.apply_homogeneous(&x).unwrap().approx_eq(&direct, 1e-12));
    let h = map.homogeneous();
    assert_eq!(h.row(2), &[0.0, 0.0, 1.0]);
}

#[test]
fn affine_translation_length_checked() {
    let err = AffineMap::new(Matrix::identity(2), v(&[1.0, 2.0, 3.0])).unwrap_err();
    assert!(matches!(err, LinalgError::DimensionMismatch { op: "affine", .. }));
}

#[test]
fn affine_then_composes_in_order() {
    let shift = AffineMap::translation(1.0, 0.0);
    let double = AffineMap::scaling(2.0, 2.0);
    // Shift first, then double: (x + 1) * 2
    let combined = shift.then(&double).unwrap();
    assert!(combined.apply(&v(&[1.0, 1.0])).unwrap().approx_eq(&v(&[4.0, 2.0]), 1e-12));
}

#[test]
fn glam_round_trip_keeps_shear() {
    let shear = AffineMap::shear(0.5, 0.0);
    assert!(shear.linear().approx_eq(&m(&[&[1.0, 0.5], &[0.0, 1.0]]), 1e-12));
    let back = AffineMap::from_glam(shear.to_glam().unwrap());
    assert_eq!(back, shear);
}

#[test]
fn reflections_flip_one_axis() {
    let p = v(&[2.0, 3.0]);
    assert!(AffineMap::reflection_x().apply(&p).unwrap().approx_eq(&v(&[2.0, -3.0]), 1e-12));
    assert!(AffineMap::reflection_y().apply(&p).unwrap().approx_eq(&v(&[-2.0, 3.0]), 1e-12));
}

// ─── Eigen Tests ──────────────────────────────────────────────

#[test]
fn diagonal_eigenvalues_are_the_diagonal() {
    let a = Matrix::diagonal(&[1.0, 5.0, 3.0]);
    let system = eigen(&a).unwrap();
    let values = system.real_values(TOL).unwrap();
    assert_eq!(values.len(), 3);
    let expected = [5.0, 3.0, 1.0];
    for (got, want) in values.iter().zip(expected) {
        assert_relative_eq!(*got, want, epsilon = 1e-12);
    }
}

#[test]
fn diagonal_eigenvectors_are_standard_basis() {
    let diag = [1.0, 5.0, 3.0];
    let a = Matrix::diagonal(&diag);
    let system = eigen(&a).unwrap();
    let values = system.real_values(TOL).unwrap();
    let vectors = system.real_vectors(TOL).unwrap();
    for (lambda, vec) in values.iter().zip(&vectors) {
        let index = diag.iter().position(|d| (d - lambda).abs() < 1e-12).unwrap();
        assert!(vec.approx_eq(&Vector::basis(3, index), 1e-12), "{vec} for λ = {lambda}");
    }
}

#[test]
fn eigen_pairs_satisfy_definition() {
    let cases = [
        m(&[&[-1.0, 3.0], &[2.0, -2.0]]),
        m(&[&[2.0, 1.0], &[1.0, 2.0]]),
        m(&[&[4.0, 1.0, 0.0], &[1.0, 3.0, 1.0], &[0.0, 1.0, 2.0]]),
        m(&[&[1.0, 2.0, 0.0], &[0.0, 3.0, 0.0], &[2.0, -4.0, 2.0]]),
        // Rotation by 90°: complex pair ±i
        m(&[&[0.0, -1.0], &[1.0, 0.0]]),
    ];
    for a in &cases {
        let system = eigen(a).unwrap();
        assert!(system.residual(a).unwrap() < 1e-9, "residual too large for\n{a}");
    }
}

#[test]
fn eigenvectors_are_unit_length() {
    let a = m(&[&[-1.0, 3.0], &[2.0, -2.0]]);
    let system = eigen(&a).unwrap();
    for (_, vec) in system.pairs() {
        let norm: f64 = vec.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
        assert_relative_eq!(norm, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn general_spectrum_sorted_by_modulus() {
    // λ = 1 and λ = -4
    let a = m(&[&[-1.0, 3.0], &[2.0, -2.0]]);
    let values = eigen(&a).unwrap().real_values(TOL).unwrap();
    assert_relative_eq!(values[0], -4.0, epsilon = 1e-10);
    assert_relative_eq!(values[1], 1.0, epsilon = 1e-10);
}

#[test]
fn symmetric_spectrum_sorted_decreasing() {
    let a = m(&[&[2.0, 1.0], &[1.0, 2.0]]);
    let system = eigen(&a).unwrap();
    assert!(system.is_symmetric());
    let values = system.real_values(TOL).unwrap();
    assert_relative_eq!(values[0], 3.0, epsilon = 1e-12);
    assert_relative_eq!(values[1], 1.0, epsilon = 1e-12);
}

#[test]
fn rotation_has_complex_spectrum() {
    let a = m(&[&[0.0, -1.0], &[1.0, 0.0]]);
    let system = eigen(&a).unwrap();
    assert!(!system.is_real(TOL));
    for z in system.values() {
        assert_relative_eq!(z.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(z.im.abs(), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn eigen_rejects_non_square() {
    let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
    assert!(matches!(eigen(&a), Err(LinalgError::NotSquare(_))));
}

// ─── Eigendecomposition Tests ─────────────────────────────────

#[test]
fn decomposition_reconstructs_matrix() {
    let cases = [
        m(&[&[1.0, 3.0], &[2.0, 2.0]]),
        m(&[&[2.0, 1.0], &[1.0, 2.0]]),
        m(&[&[4.0, 1.0, 0.0], &[1.0, 3.0, 1.0], &[0.0, 1.0, 2.0]]),
        m(&[&[1.0, 2.0, 0.0], &[0.0, 3.0, 0.0], &[2.0, -4.0, 2.0]]),
    ];
    for a in &cases {
        let decomp = Eigendecomposition::new(a).unwrap();
        let rebuilt = decomp.reconstruct().unwrap();
        assert!(rebuilt.approx_eq(a, 1e-9), "Q·Λ·Q⁻¹ =\n{rebuilt}\nexpected\n{a}");
    }
}

#[test]
fn decomposition_factors_are_consistent() {
    let a = m(&[&[1.0, 3.0], &[2.0, 2.0]]);
    let decomp = Eigendecomposition::new(&a).unwrap();
    let q_q_inv = decomp.q().mul_mat(decomp.q_inv()).unwrap();
    assert!(q_q_inv.approx_eq(&Matrix::identity(2), 1e-10));
    assert_eq!(decomp.lambda().diagonal_entries(), decomp.eigenvalues());
}

#[test]
fn decomposition_rejects_complex_spectrum() {
    let a = m(&[&[0.0, -1.0], &[1.0, 0.0]]);
    assert!(matches!(Eigendecomposition::new(&a), Err(LinalgError::ComplexSpectrum)));
}

#[test]
fn decomposition_rejects_defective_matrix() {
    // Jordan block: a single eigenvector for the repeated eigenvalue 1.
    let a = m(&[&[1.0, 1.0], &[0.0, 1.0]]);
    assert!(matches!(Eigendecomposition::new(&a), Err(LinalgError::NotDiagonalizable)));
}

#[test]
fn decomposition_inverse_matches_direct_inverse() {
    let a = m(&[&[2.0, 1.0], &[1.0, 2.0]]);
    let via_eigen = Eigendecomposition::new(&a).unwrap().inverse().unwrap();
    let direct = inverse(&a).unwrap();
    assert!(via_eigen.approx_eq(&direct, 1e-10));
    assert!(via_eigen.approx_eq(&m(&[&[2.0 / 3.0, -1.0 / 3.0], &[-1.0 / 3.0, 2.0 / 3.0]]), 1e-10));
}

#[test]
fn decomposition_inverse_of_singular_fails() {
    let a = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
    let decomp = Eigendecomposition::new(&a).unwrap();
    assert!(matches!(decomp.inverse(), Err(LinalgError::Singular)));
    assert!(matches!(decomp.power(-1), Err(LinalgError::Singular)));
}

#[test]
fn decomposition_power_matches_repeated_product() {
    let a = m(&[&[1.0, 3.0], &[2.0, 2.0]]);
    let cubed = Eigendecomposition::new(&a).unwrap().power(3).unwrap();
    let direct = a.mul_mat(&a).unwrap().mul_mat(&a).unwrap();
    assert!(cubed.approx_eq(&direct, 1e-8));
    let zeroth = Eigendecomposition::new(&a).unwrap().power(0).unwrap();
    assert!(zeroth.approx_eq(&Matrix::identity(2), 1e-10));
}

// ─── Inverse Tests ────────────────────────────────────────────

#[test]
fn inverse_is_two_sided() {
    let a = m(&[&[4.0, 7.0, 2.0], &[3.0, 6.0, 1.0], &[2.0, 5.0, 3.0]]);
    let a_inv = inverse(&a).unwrap();
    let id = Matrix::identity(3);
    assert!(a_inv.mul_mat(&a).unwrap().approx_eq(&id, 1e-10));
    assert!(a.mul_mat(&a_inv).unwrap().approx_eq(&id, 1e-10));
}

#[test]
fn inverse_of_singular_is_reported() {
    let a = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
    assert!(matches!(inverse(&a), Err(LinalgError::Singular)));
    assert!(matches!(inverse(&Matrix::zeros(2, 2)), Err(LinalgError::Singular)));
}

#[test]
fn inverse_of_non_square_is_reported() {
    let a = m(&[&[1.0, 2.0, 3.0]]);
    assert!(matches!(inverse(&a), Err(LinalgError::NotSquare(_))));
}

#[test]
fn determinant_matches_eigenvalue_product() {
    let a = m(&[&[1.0, 3.0], &[2.0, 2.0]]);
    assert_relative_eq!(determinant(&a).unwrap(), -4.0, epsilon = 1e-10);
    let product: f64 = Eigendecomposition::new(&a).unwrap().eigenvalues().iter().product();
    assert_relative_eq!(product, -4.0, epsilon = 1e-10);
}

#[test]
fn condition_number_of_identity() {
    assert_relative_eq!(condition_number(&Matrix::identity(3)).unwrap(), 1.0, epsilon = 1e-12);
}

// ─── Rank Tests ───────────────────────────────────────────────

#[test]
fn rank_of_dependent_columns() {
    let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
    assert_eq!(rank(&a, TOL).unwrap(), 2);
    assert!(has_dependent_columns(&a, TOL).unwrap());
    assert!(!is_full_rank(&a, TOL).unwrap());
}

#[test]
fn dependent_columns_give_zero_eigenvalue() {
    let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
    let system = eigen(&a).unwrap();
    assert_eq!(system.near_zero(TOL).len(), 1);
    assert_eq!(eigen_rank(&a, TOL).unwrap(), 2);
}

#[test]
fn rank_of_rectangular_matrix() {
    let a = m(&[&[1.0, 0.0, 1.0], &[0.0, 1.0, 1.0]]);
    assert_eq!(rank(&a, TOL).unwrap(), 2);
    assert!(has_dependent_columns(&a, TOL).unwrap());
}

#[test]
fn rank_of_zero_matrix() {
    assert_eq!(rank(&Matrix::zeros(3, 3), TOL).unwrap(), 0);
}

#[test]
fn eigen_rank_undercounts_nilpotent() {
    let a = m(&[&[0.0, 1.0], &[0.0, 0.0]]);
    assert_eq!(rank(&a, TOL).unwrap(), 1);
    assert_eq!(eigen_rank(&a, TOL).unwrap(), 0);
}

#[test]
fn singular_values_sorted_descending() {
    let sv = singular_values(&Matrix::diagonal(&[1.0, -4.0, 2.0])).unwrap();
    assert_relative_eq!(sv[0], 4.0, epsilon = 1e-12);
    assert_relative_eq!(sv[1], 2.0, epsilon = 1e-12);
    assert_relative_eq!(sv[2], 1.0, epsilon = 1e-12);
}
