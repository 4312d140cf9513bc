//! Lessons — the literal matrices and vectors behind each chapter.
//!
//! Seven chapters, each with a default example:
//! 1. **Linear transformation** — `A·v`, and where the basis vectors land
//! 2. **Magnitude change** — how much `A` stretches different vectors
//! 3. **Affine transformation** — `A·v + b`, and the homogeneous form
//! 4. **Eigenvectors** — directions `A` only scales
//! 5. **Eigendecomposition** — `A = Q·Λ·Q⁻¹`
//! 6. **Rank** — dependent columns and zero eigenvalues
//! 7. **Inversion** — `A⁻¹ = Q·Λ⁻¹·Q⁻¹` next to a direct inverse

use serde::{Deserialize, Serialize};

use eigenwalk_math::{Matrix, Vector};
use eigenwalk_types::{constants, LinalgResult, Scalar};

use crate::config::LessonConfig;

/// Which chapter of the notebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    LinearTransformation,
    MagnitudeChange,
    AffineTransformation,
    Eigenvectors,
    Eigendecomposition,
    Rank,
    Inversion,
}

impl LessonKind {
    /// Returns all lessons in reading order.
    pub fn all() -> &'static [LessonKind] {
        &[
            LessonKind::LinearTransformation,
            LessonKind::MagnitudeChange,
            LessonKind::AffineTransformation,
            LessonKind::Eigenvectors,
            LessonKind::Eigendecomposition,
            LessonKind::Rank,
            LessonKind::Inversion,
        ]
    }

    /// Returns the machine name used on the command line and in configs.
    pub fn name(&self) -> &'static str {
        match self {
            LessonKind::LinearTransformation => "linear_transformation",
            LessonKind::MagnitudeChange => "magnitude_change",
            LessonKind::AffineTransformation => "affine_transformation",
            LessonKind::Eigenvectors => "eigenvectors",
            LessonKind::Eigendecomposition => "eigendecomposition",
            LessonKind::Rank => "rank",
            LessonKind::Inversion => "inversion",
        }
    }

    /// Returns the heading printed above the lesson.
    pub fn title(&self) -> &'static str {
        match self {
            LessonKind::LinearTransformation => "Linear transformations",
            LessonKind::MagnitudeChange => "Magnitude (amplitude) change",
            LessonKind::AffineTransformation => "Affine transformations",
            LessonKind::Eigenvectors => "Eigenvalues and eigenvectors",
            LessonKind::Eigendecomposition => "Eigendecomposition",
            LessonKind::Rank => "Matrix rank",
            LessonKind::Inversion => "Inversion via eigendecomposition",
        }
    }

    pub fn from_name(name: &str) -> Option<LessonKind> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }

    /// Lessons whose matrix must be square.
    pub fn needs_square_matrix(&self) -> bool {
        matches!(
            self,
            LessonKind::Eigenvectors
                | LessonKind::Eigendecomposition
                | LessonKind::Rank
                | LessonKind::Inversion
        )
    }
}

/// A fully specified lesson.
#[derive(Debug, Clone)]
pub struct Lesson {
    /// Lesson type.
    pub kind: LessonKind,
    /// The matrix under study.
    pub matrix: Matrix,
    /// Vectors pushed through the matrix (may be empty).
    pub vectors: Vec<Vector>,
    /// Translation part, affine lesson only.
    pub translation: Option<Vector>,
    /// Relative threshold below which eigen/singular values count as zero.
    pub tolerance: Scalar,
    /// Absolute slack for identity checks.
    pub check_tolerance: Scalar,
    /// Digits after the decimal point in printed steps.
    pub precision: usize,
}

fn vecs(entries: &[&[Scalar]]) -> Vec<Vector> {
    entries.iter().map(|v| Vector::from_slice(v)).collect()
}

impl Lesson {
    fn base(kind: LessonKind, matrix: Matrix, vectors: Vec<Vector>) -> Self {
        Self {
            kind,
            matrix,
            vectors,
            translation: None,
            tolerance: constants::DEFAULT_TOLERANCE,
            check_tolerance: constants::CHECK_TOLERANCE,
            precision: constants::DISPLAY_PRECISION,
        }
    }

    /// `A = [[-1, 3], [2, -2]]` applied to `v = (2, 1)`.
    pub fn linear_transformation() -> Self {
        Self::base(
            LessonKind::LinearTransformation,
            Matrix::from_array([[-1.0, 3.0], [2.0, -2.0]]),
            vecs(&[&[2.0, 1.0]]),
        )
    }

    /// `A = [[2, 1], [1, 2]]` stretching three vectors by different amounts.
    pub fn magnitude_change() -> Self {
        Self::base(
            LessonKind::MagnitudeChange,
            Matrix::from_array([[2.0, 1.0], [1.0, 2.0]]),
            vecs(&[&[1.0, 0.0], &[1.0, 1.0], &[1.0, -1.0]]),
        )
    }

    /// A shear `[[1, 0.5], [0, 1]]` followed by a shift `b = (2, 1)`.
    pub fn affine_transformation() -> Self {
        Self {
            translation: Some(Vector::from_slice(&[2.0, 1.0])),
            ..Self::base(
                LessonKind::AffineTransformation,
                Matrix::from_array([[1.0, 0.5], [0.0, 1.0]]),
                vecs(&[&[1.0, 2.0]]),
            )
        }
    }

    /// `A = [[-1, 3], [2, -2]]`, eigenvalues `-4` and `1`.
    /// The extra vector `(1, 0)` is not an eigenvector, for contrast.
    pub fn eigenvectors() -> Self {
        Self::base(
            LessonKind::Eigenvectors,
            Matrix::from_array([[-1.0, 3.0], [2.0, -2.0]]),
            vecs(&[&[1.0, 0.0]]),
        )
    }

    /// `A = [[1, 3], [2, 2]]`, eigenvalues `4` and `-1`.
    pub fn eigendecomposition() -> Self {
        Self::base(
            LessonKind::Eigendecomposition,
            Matrix::from_array([[1.0, 3.0], [2.0, 2.0]]),
            Vec::new(),
        )
    }

    /// `A = [[1, 2], [2, 4]]` — the second column is twice the first,
    /// so every image lands on one line.
    pub fn rank() -> Self {
        Self::base(
            LessonKind::Rank,
            Matrix::from_array([[1.0, 2.0], [2.0, 4.0]]),
            vecs(&[&[1.0, 0.0], &[0.0, 1.0], &[-1.0, 1.0]]),
        )
    }

    /// `A = [[2, 1], [1, 2]]`, inverted two ways, with `v = (1, 2)` sent
    /// through `A` and back.
    pub fn inversion() -> Self {
        Self::base(
            LessonKind::Inversion,
            Matrix::from_array([[2.0, 1.0], [1.0, 2.0]]),
            vecs(&[&[1.0, 2.0]]),
        )
    }

    /// Create a lesson by kind with its default example.
    pub fn from_kind(kind: LessonKind) -> Self {
        match kind {
            LessonKind::LinearTransformation => Self::linear_transformation(),
            LessonKind::MagnitudeChange => Self::magnitude_change(),
            LessonKind::AffineTransformation => Self::affine_transformation(),
            LessonKind::Eigenvectors => Self::eigenvectors(),
            LessonKind::Eigendecomposition => Self::eigendecomposition(),
            LessonKind::Rank => Self::rank(),
            LessonKind::Inversion => Self::inversion(),
        }
    }

    /// Create a lesson by kind, then apply tolerances and any override
    /// from `config`. The config is validated first.
    pub fn configured(kind: LessonKind, config: &LessonConfig) -> LinalgResult<Self> {
        config.validate()?;
        let mut lesson = Self::from_kind(kind);
        lesson.tolerance = config.tolerance;
        lesson.check_tolerance = config.check_tolerance;
        lesson.precision = config.precision;
        if let Some(over) = config.overrides.get(kind.name()) {
            if let Some(matrix) = &over.matrix {
                lesson.matrix = matrix.clone();
                // Default vectors may not fit a replacement matrix.
                if lesson.vectors.iter().any(|v| v.len() != matrix.cols()) {
                    lesson.vectors.clear();
                }
                if let Some(b) = &lesson.translation {
                    if b.len() != matrix.rows() {
                        lesson.translation = Some(Vector::zeros(matrix.rows()));
                    }
                }
            }
            if let Some(vectors) = &over.vectors {
                lesson.vectors = vectors.clone();
            }
            if let Some(translation) = &over.translation {
                lesson.translation = Some(translation.clone());
            }
        }
        Ok(lesson)
    }
}
