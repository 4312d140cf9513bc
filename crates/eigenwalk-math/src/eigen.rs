//! Eigenvalues and eigenvectors.
//!
//! Symmetric input goes to faer's self-adjoint solver (real spectrum,
//! orthonormal eigenvectors); anything else goes to the general solver,
//! whose spectrum may be complex.
//!
//! Results are put in a canonical form so printed output is stable:
//! - symmetric: eigenvalues in decreasing order;
//! - general: eigenvalues in decreasing modulus;
//! - every eigenvector has unit length, and its largest-magnitude
//!   component is real and positive.

use std::cmp::Ordering;

use faer::{Mat, Side};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use eigenwalk_types::{constants, LinalgError, LinalgResult, Scalar};

use crate::matrix::Matrix;
use crate::vector::Vector;

/// Entries closer than this are treated as mirror images when testing symmetry.
const SYMMETRY_TOLERANCE: Scalar = 1.0e-12;

/// Eigenvalues and matching unit eigenvectors of a square matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenSystem {
    values: Vec<Complex64>,
    /// `vectors[k]` belongs to `values[k]`.
    vectors: Vec<Vec<Complex64>>,
    symmetric: bool,
}

impl EigenSystem {
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    pub fn vectors(&self) -> &[Vec<Complex64>] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the self-adjoint solver produced this system.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Iterates `(λ, v)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (Complex64, &[Complex64])> {
        self.values
            .iter()
            .copied()
            .zip(self.vectors.iter().map(Vec::as_slice))
    }

    /// Largest |λ|, or 0 for an empty system.
    pub fn spectral_radius(&self) -> Scalar {
        self.values.iter().map(|z| z.norm()).fold(0.0, Scalar::max)
    }

    /// True if every eigenvalue and eigenvector entry has a negligible
    /// imaginary part (relative to the spectral radius).
    pub fn is_real(&self, tol: Scalar) -> bool {
        let scale = self.spectral_radius().max(1.0);
        self.values.iter().all(|z| z.im.abs() <= tol * scale)
            && self
                .vectors
                .iter()
                .flatten()
                .all(|z| z.im.abs() <= tol.max(constants::CHECK_TOLERANCE))
    }

    /// Real parts of the eigenvalues, if the spectrum is real.
    pub fn real_values(&self, tol: Scalar) -> Option<Vec<Scalar>> {
        self.is_real(tol)
            .then(|| self.values.iter().map(|z| z.re).collect())
    }

    /// Real eigenvectors, if the spectrum is real.
    pub fn real_vectors(&self, tol: Scalar) -> Option<Vec<Vector>> {
        self.is_real(tol).then(|| {
            self.vectors
                .iter()
                .map(|v| Vector::new(v.iter().map(|z| z.re).collect()))
                .collect()
        })
    }

    /// Indices of eigenvalues indistinguishable from zero.
    pub fn near_zero(&self, tol: Scalar) -> Vec<usize> {
        let threshold = tol * self.spectral_radius().max(1.0);
        self.values
            .iter()
            .enumerate()
            .filter(|(_, z)| z.norm() <= threshold)
            .map(|(k, _)| k)
            .collect()
    }

    /// Largest ‖A·v − λ·v‖ over all pairs.
    pub fn residual(&self, a: &Matrix) -> LinalgResult<Scalar> {
        if a.rows() != self.len() || a.cols() != self.len() {
            return Err(LinalgError::DimensionMismatch {
                op: "eigen residual",
                left: a.shape(),
                right: eigenwalk_types::Shape::new(self.len(), self.len()),
            });
        }
        let n = self.len();
        let worst = self
            .pairs()
            .map(|(lambda, v)| {
                (0..n)
                    .map(|i| {
                        let av: Complex64 = (0..n).map(|j| v[j] * a[(i, j)]).sum();
                        (av - lambda * v[i]).norm_sqr()
                    })
                    .sum::<Scalar>()
                    .sqrt()
            })
            .fold(0.0, Scalar::max);
        Ok(worst)
    }
}

/// Computes all eigenpairs of a square matrix.
pub fn eigen(a: &Matrix) -> LinalgResult<EigenSystem> {
    a.require_square()?;
    let n = a.rows();
    let m = a.to_faer();

    let symmetric = a.is_symmetric(SYMMETRY_TOLERANCE);
    let mut pairs: Vec<(Complex64, Vec<Complex64>)> = if symmetric {
        debug!(shape = %a.shape(), "self-adjoint eigen solver");
        let evd = m
            .as_ref()
            .self_adjoint_eigen(Side::Lower)
            .map_err(|e| LinalgError::Decomposition(format!("self-adjoint EVD failed: {e:?}")))?;
        let u: Mat<Scalar> = evd.U().to_owned();
        let s = evd.S().column_vector();
        (0..n)
            .map(|k| {
                let value = Complex64::new(s[k], 0.0);
                let vector = (0..n).map(|i| Complex64::new(u[(i, k)], 0.0)).collect();
                (value, vector)
            })
            .collect()
    } else {
        debug!(shape = %a.shape(), "general eigen solver");
        let evd = m
            .as_ref()
            .eigen()
            .map_err(|e| LinalgError::Decomposition(format!("EVD failed: {e:?}")))?;
        let u = evd.U().to_owned();
        let s = evd.S().column_vector();
        (0..n)
            .map(|k| {
                let value = Complex64::new(s[k].re, s[k].im);
                let vector = (0..n)
                    .map(|i| {
                        let z = u[(i, k)];
                        Complex64::new(z.re, z.im)
                    })
                    .collect();
                (value, vector)
            })
            .collect()
    };

    for (_, v) in &mut pairs {
        canonicalize(v);
    }
    if symmetric {
        pairs.sort_by(|(a, _), (b, _)| b.re.total_cmp(&a.re));
    } else {
        pairs.sort_by(|(a, _), (b, _)| by_decreasing_modulus(a, b));
    }

    let (values, vectors) = pairs.into_iter().unzip();
    Ok(EigenSystem {
        values,
        vectors,
        symmetric,
    })
}

/// Eigenvalues only, in the same order [`eigen`] returns them.
pub fn eigenvalues(a: &Matrix) -> LinalgResult<Vec<Complex64>> {
    Ok(eigen(a)?.values)
}

fn by_decreasing_modulus(a: &Complex64, b: &Complex64) -> Ordering {
    b.norm()
        .total_cmp(&a.norm())
        .then_with(|| b.re.total_cmp(&a.re))
        .then_with(|| b.im.total_cmp(&a.im))
}

/// Scales `v` to unit length and rotates its phase so the
/// largest-magnitude entry is real and positive.
fn canonicalize(v: &mut [Complex64]) {
    let norm = v.iter().map(|z| z.norm_sqr()).sum::<Scalar>().sqrt();
    if norm <= Scalar::EPSILON {
        return;
    }
    // First entry within rounding of the max, so ties resolve to the lowest index.
    let largest = v.iter().map(|z| z.norm()).fold(0.0, Scalar::max);
    let pivot = v
        .iter()
        .copied()
        .find(|z| z.norm() >= largest * (1.0 - 1.0e-9))
        .unwrap_or(Complex64::new(1.0, 0.0));
    // Multiply by conj(pivot)/|pivot| to make the pivot real, then normalize.
    let phase = pivot.conj() / pivot.norm();
    for z in v.iter_mut() {
        *z = *z * phase / norm;
    }
}
