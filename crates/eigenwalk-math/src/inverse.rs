//! Direct matrix inversion and determinants.
//!
//! Inversion solves `A·X = I` with faer's partially pivoted LU. A pivoted LU
//! happily returns garbage for a singular matrix, so singularity is
//! decided up front from the singular values and reported, never retried.

use faer::linalg::solvers::Solve;
use faer::Mat;
use tracing::warn;

use eigenwalk_types::{constants, LinalgError, LinalgResult, Scalar};

use crate::matrix::Matrix;
use crate::rank::singular_values;

/// `A⁻¹` for a square, full-rank `A`.
pub fn inverse(a: &Matrix) -> LinalgResult<Matrix> {
    a.require_square()?;
    let n = a.rows();

    let sv = singular_values(a)?;
    let largest = sv.first().copied().unwrap_or(0.0);
    let smallest = sv.last().copied().unwrap_or(0.0);
    if largest == 0.0 || smallest <= constants::DEFAULT_TOLERANCE * largest {
        warn!(
            shape = %a.shape(),
            sigma_min = smallest,
            sigma_max = largest,
            "refusing to invert singular matrix"
        );
        return Err(LinalgError::Singular);
    }

    let lu = a.to_faer().partial_piv_lu();
    let identity: Mat<Scalar> = Mat::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 });
    let inv = lu.solve(&identity);
    Ok(Matrix::from_faer(&inv))
}

/// `det(A)` for a square `A`.
pub fn determinant(a: &Matrix) -> LinalgResult<Scalar> {
    a.require_square()?;
    Ok(a.to_faer().determinant())
}

/// `σ_max / σ_min`, infinite for singular input.
pub fn condition_number(a: &Matrix) -> LinalgResult<Scalar> {
    let sv = singular_values(a)?;
    let largest = sv.first().copied().unwrap_or(0.0);
    let smallest = sv.last().copied().unwrap_or(0.0);
    if smallest == 0.0 {
        return Ok(Scalar::INFINITY);
    }
    Ok(largest / smallest)
}
