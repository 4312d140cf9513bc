//! Eigendecomposition `A = Q·Λ·Q⁻¹`.
//!
//! The columns of `Q` are eigenvectors and `Λ` is diagonal with the
//! matching eigenvalues. Once the factors exist, functions of `A` become
//! functions of the diagonal:
//! - `A⁻¹ = Q·Λ⁻¹·Q⁻¹` (needs every λ ≠ 0)
//! - `Aᵏ = Q·Λᵏ·Q⁻¹`
//!
//! Only real spectra are supported; complex eigenvalues are reported as
//! [`LinalgError::ComplexSpectrum`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use eigenwalk_types::{constants, LinalgError, LinalgResult, Scalar};

use crate::eigen::{eigen, EigenSystem};
use crate::inverse::inverse;
use crate::matrix::Matrix;

/// The three factors of a real eigendecomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eigendecomposition {
    /// Eigenvector matrix (eigenvectors as columns).
    q: Matrix,
    /// Diagonal of Λ, in the same order as the columns of `q`.
    eigenvalues: Vec<Scalar>,
    /// Inverse of the eigenvector matrix.
    q_inv: Matrix,
}

impl Eigendecomposition {
    /// Factors `a`. Fails for non-square, complex-spectrum, or
    /// defective (non-diagonalizable) input.
    pub fn new(a: &Matrix) -> LinalgResult<Self> {
        let system = eigen(a)?;
        Self::from_system(&system)
    }

    /// Builds the factors from an already computed eigen system.
    pub fn from_system(system: &EigenSystem) -> LinalgResult<Self> {
        let eigenvalues = system
            .real_values(constants::CHECK_TOLERANCE)
            .ok_or(LinalgError::ComplexSpectrum)?;
        let vectors = system
            .real_vectors(constants::CHECK_TOLERANCE)
            .ok_or(LinalgError::ComplexSpectrum)?;

        let q = Matrix::from_columns(&vectors)?;
        let q_inv = match inverse(&q) {
            Ok(inv) => inv,
            Err(LinalgError::Singular) => return Err(LinalgError::NotDiagonalizable),
            Err(e) => return Err(e),
        };
        debug!(n = eigenvalues.len(), "eigendecomposition ready");

        Ok(Self {
            q,
            eigenvalues,
            q_inv,
        })
    }

    pub fn q(&self) -> &Matrix {
        &self.q
    }

    pub fn q_inv(&self) -> &Matrix {
        &self.q_inv
    }

    pub fn eigenvalues(&self) -> &[Scalar] {
        &self.eigenvalues
    }

    /// Λ as a full diagonal matrix.
    pub fn lambda(&self) -> Matrix {
        Matrix::diagonal(&self.eigenvalues)
    }

    /// `Q·Λ·Q⁻¹`, which should reproduce the original matrix.
    pub fn reconstruct(&self) -> LinalgResult<Matrix> {
        self.sandwich(&self.eigenvalues)
    }

    /// `Q·Λ⁻¹·Q⁻¹`. Fails with [`LinalgError::Singular`] if any λ ≈ 0.
    pub fn inverse(&self) -> LinalgResult<Matrix> {
        if self.has_zero_eigenvalue() {
            return Err(LinalgError::Singular);
        }
        let reciprocals: Vec<Scalar> = self.eigenvalues.iter().map(|l| 1.0 / l).collect();
        self.sandwich(&reciprocals)
    }

    /// `Q·Λᵏ·Q⁻¹`. Negative powers need an invertible matrix.
    pub fn power(&self, k: i32) -> LinalgResult<Matrix> {
        if k < 0 && self.has_zero_eigenvalue() {
            return Err(LinalgError::Singular);
        }
        let powered: Vec<Scalar> = self.eigenvalues.iter().map(|l| l.powi(k)).collect();
        self.sandwich(&powered)
    }

    fn has_zero_eigenvalue(&self) -> bool {
        let largest = self.eigenvalues.iter().map(|l| l.abs()).fold(0.0, Scalar::max);
        largest == 0.0
            || self
                .eigenvalues
                .iter()
                .any(|l| l.abs() <= constants::DEFAULT_TOLERANCE * largest)
    }

    fn sandwich(&self, diagonal: &[Scalar]) -> LinalgResult<Matrix> {
        self.q
            .mul_mat(&Matrix::diagonal(diagonal))?
            .mul_mat(&self.q_inv)
    }
}
