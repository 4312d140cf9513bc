//! Numerical tolerances and presentation defaults.

use crate::Scalar;

/// Relative threshold below which an eigenvalue or singular value counts as zero.
///
/// Scaled by the largest magnitude in the spectrum before comparison.
pub const DEFAULT_TOLERANCE: Scalar = 1.0e-9;

/// Absolute slack used when checking identities such as `A·v = λ·v`.
pub const CHECK_TOLERANCE: Scalar = 1.0e-8;

/// Digits after the decimal point when printing matrices and vectors.
pub const DISPLAY_PRECISION: usize = 4;

/// Default arrow-diagram canvas size in pixels.
pub const DEFAULT_PLOT_SIZE: (u32, u32) = (640, 640);

/// Fraction of the diagram extent added as padding around the arrows.
pub const PLOT_PADDING: Scalar = 0.15;
