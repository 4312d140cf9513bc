//! Error types for eigenwalk.
//!
//! All crates return `LinalgResult<T>` from fallible operations.

use thiserror::Error;

use crate::Shape;

/// Unified error type for eigenwalk.
#[derive(Debug, Error)]
pub enum LinalgError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("Dimension mismatch in {op}: {left} vs {right}")]
    DimensionMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },

    /// Operation requires a square matrix.
    #[error("Matrix must be square, got {0}")]
    NotSquare(Shape),

    /// Matrix has no inverse (at least one zero eigenvalue / singular value).
    #[error("Matrix is singular")]
    Singular,

    /// Matrix or vector has no entries.
    #[error("Matrix has no entries")]
    EmptyMatrix,

    /// Rows passed to a constructor have different lengths.
    #[error("Ragged rows: row {row} has {found} entries, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A real-only operation hit complex eigenvalues.
    #[error("Matrix has complex eigenvalues; a real eigendecomposition does not exist")]
    ComplexSpectrum,

    /// Eigenvector matrix is singular, so `Q⁻¹` does not exist.
    #[error("Matrix is not diagonalizable")]
    NotDiagonalizable,

    /// The backing linear-algebra library reported a failure.
    #[error("Decomposition failed: {0}")]
    Decomposition(String),

    /// Input text could not be parsed as a matrix or vector.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Plot backend failure.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, LinalgError>`.
pub type LinalgResult<T> = Result<T, LinalgError>;
