//! # eigenwalk-math
//!
//! Linear algebra primitives for the eigenwalk notebook.
//!
//! Provides:
//! - Dense [`Vector`] and [`Matrix`] types with checked products
//! - Linear and affine maps, plus the magnitude change of a vector under a map
//! - Eigenvalues / eigenvectors, eigendecomposition `A = QΛQ⁻¹`
//! - Numerical rank and matrix inversion
//!
//! Every factorization is delegated to `faer`; this crate only shapes
//! inputs and outputs and enforces the error contract.

pub mod decomposition;
pub mod eigen;
pub mod inverse;
pub mod matrix;
pub mod rank;
pub mod transform;
pub mod vector;

pub use decomposition::Eigendecomposition;
pub use eigen::{eigen, eigenvalues, EigenSystem};
pub use inverse::{determinant, inverse};
pub use matrix::Matrix;
pub use rank::{eigen_rank, rank, singular_values};
pub use transform::{magnitude_change, AffineMap, LinearMap, MagnitudeChange};
pub use vector::Vector;

// Re-export the 2D and complex types that appear in public signatures.
pub use glam::{DAffine2, DMat2, DVec2};
pub use num_complex::Complex64;
