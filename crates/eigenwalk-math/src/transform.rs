//! Linear and affine transformations.
//!
//! A linear map is just a matrix acting on vectors; an affine map adds a
//! translation, `x ↦ A·x + b`, and is equivalent to a linear map on
//! homogeneous coordinates `(x, 1)`. The 2D constructors go through
//! `glam::DAffine2` so rotations, shears and reflections use the same
//! conventions as the rest of the Rust graphics ecosystem.

use glam::{DAffine2, DMat2, DVec2};
use serde::{Deserialize, Serialize};

use eigenwalk_types::{LinalgError, LinalgResult, Scalar};

use crate::matrix::Matrix;
use crate::vector::Vector;

/// A linear map Rⁿ → Rᵐ represented by an `m×n` matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearMap {
    matrix: Matrix,
}

impl LinearMap {
    pub fn new(matrix: Matrix) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Dimension of the domain (column count).
    pub fn input_dim(&self) -> usize {
        self.matrix.cols()
    }

    /// Dimension of the codomain (row count).
    pub fn output_dim(&self) -> usize {
        self.matrix.rows()
    }

    pub fn apply(&self, v: &Vector) -> LinalgResult<Vector> {
        self.matrix.mul_vec(v)
    }

    /// `self ∘ inner`: apply `inner` first, then `self`.
    pub fn compose(&self, inner: &LinearMap) -> LinalgResult<LinearMap> {
        Ok(LinearMap::new(self.matrix.mul_mat(&inner.matrix)?))
    }
}

/// How much a map stretched (or shrank) one particular vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeChange {
    /// ‖v‖
    pub input_norm: Scalar,
    /// ‖A·v‖
    pub output_norm: Scalar,
    /// ‖A·v‖ / ‖v‖, `None` when `v` is the zero vector.
    pub ratio: Option<Scalar>,
}

/// Compares the length of `v` before and after applying `a`.
pub fn magnitude_change(a: &Matrix, v: &Vector) -> LinalgResult<MagnitudeChange> {
    let image = a.mul_vec(v)?;
    let input_norm = v.norm();
    let output_norm = image.norm();
    let ratio = if input_norm > Scalar::EPSILON {
        Some(output_norm / input_norm)
    } else {
        None
    };
    Ok(MagnitudeChange {
        input_norm,
        output_norm,
        ratio,
    })
}

/// An affine map `x ↦ A·x + b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffineMap {
    linear: Matrix,
    translation: Vector,
}

impl AffineMap {
    /// The translation length must match the matrix row count.
    pub fn new(linear: Matrix, translation: Vector) -> LinalgResult<Self> {
        if linear.rows() != translation.len() {
            return Err(LinalgError::DimensionMismatch {
                op: "affine",
                left: linear.shape(),
                right: translation.shape(),
            });
        }
        Ok(Self {
            linear,
            translation,
        })
    }

    /// Purely linear map (zero translation).
    pub fn from_linear(linear: Matrix) -> Self {
        let translation = Vector::zeros(linear.rows());
        Self {
            linear,
            translation,
        }
    }

    pub fn linear(&self) -> &Matrix {
        &self.linear
    }

    pub fn translation_vector(&self) -> &Vector {
        &self.translation
    }

    // ─── 2D constructors ─────────────────────────────────────

    /// Counter-clockwise rotation by `theta` radians.
    pub fn rotation(theta: Scalar) -> Self {
        Self::from_glam(DAffine2::from_angle(theta))
    }

    pub fn scaling(sx: Scalar, sy: Scalar) -> Self {
        Self::from_glam(DAffine2::from_scale(DVec2::new(sx, sy)))
    }

    /// Shear `(x, y) ↦ (x + kx·y, y + ky·x)`.
    pub fn shear(kx: Scalar, ky: Scalar) -> Self {
        Self::from_glam(DAffine2::from_mat2(DMat2::from_cols(
            DVec2::new(1.0, ky),
            DVec2::new(kx, 1.0),
        )))
    }

    /// Mirror across the x axis.
    pub fn reflection_x() -> Self {
        Self::scaling(1.0, -1.0)
    }

    /// Mirror across the y axis.
    pub fn reflection_y() -> Self {
        Self::scaling(-1.0, 1.0)
    }

    pub fn translation(tx: Scalar, ty: Scalar) -> Self {
        Self::from_glam(DAffine2::from_translation(DVec2::new(tx, ty)))
    }

    /// Converts a glam affine (column-major) into row-major form.
    pub fn from_glam(affine: DAffine2) -> Self {
        let m = affine.matrix2;
        let linear = Matrix::from_fn(2, 2, |i, j| m.col(j)[i]);
        Self {
            linear,
            translation: Vector::from(affine.translation),
        }
    }

    /// The glam equivalent, if this is a 2D map.
    pub fn to_glam(&self) -> Option<DAffine2> {
        if self.linear.shape() != eigenwalk_types::Shape::new(2, 2) {
            return None;
        }
        let l = &self.linear;
        let matrix2 = DMat2::from_cols(
            DVec2::new(l[(0, 0)], l[(1, 0)]),
            DVec2::new(l[(0, 1)], l[(1, 1)]),
        );
        Some(DAffine2::from_mat2_translation(matrix2, self.translation.to_dvec2()?))
    }

    // ─── Application ─────────────────────────────────────────

    pub fn apply(&self, v: &Vector) -> LinalgResult<Vector> {
        self.linear.mul_vec(v)?.add(&self.translation)
    }

    /// `other ∘ self`: `x ↦ B(Ax + a) + b = (BA)x + (Ba + b)`.
    pub fn then(&self, other: &AffineMap) -> LinalgResult<AffineMap> {
        let linear = other.linear.mul_mat(&self.linear)?;
        let translation = other.linear.mul_vec(&self.translation)?.add(&other.translation)?;
        AffineMap::new(linear, translation)
    }

    /// The `(m+1)×(n+1)` homogeneous matrix `[[A, b], [0, 1]]`.
    pub fn homogeneous(&self) -> Matrix {
        let (m, n) = (self.linear.rows(), self.linear.cols());
        Matrix::from_fn(m + 1, n + 1, |i, j| match (i < m, j < n) {
            (true, true) => self.linear[(i, j)],
            (true, false) => self.translation[i],
            (false, true) => 0.0,
            (false, false) => 1.0,
        })
    }

    /// Applies the map through the homogeneous matrix and drops the trailing 1.
    pub fn apply_homogeneous(&self, v: &Vector) -> LinalgResult<Vector> {
        let mut lifted = v.as_slice().to_vec();
        lifted.push(1.0);
        let image = self.homogeneous().mul_vec(&Vector::new(lifted))?;
        let mut data = image.into_inner();
        data.pop();
        Ok(Vector::new(data))
    }
}
