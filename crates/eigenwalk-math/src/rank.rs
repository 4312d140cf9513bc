//! Matrix rank.
//!
//! Two notions are offered. [`rank`] is the numerical rank from singular
//! values and works for any shape. [`eigen_rank`] counts non-zero
//! eigenvalues of a square matrix; it agrees with [`rank`] for
//! diagonalizable matrices but undercounts nilpotent ones (e.g. `[[0, 1], [0, 0]]`
//! has rank 1 and no non-zero eigenvalue).

use tracing::debug;

use eigenwalk_types::{LinalgError, LinalgResult, Scalar};

use crate::eigen::eigen;
use crate::matrix::Matrix;

/// Singular values of `a`, largest first.
pub fn singular_values(a: &Matrix) -> LinalgResult<Vec<Scalar>> {
    if a.rows() == 0 || a.cols() == 0 {
        return Err(LinalgError::EmptyMatrix);
    }
    let mut sv = a
        .to_faer()
        .as_ref()
        .singular_values()
        .map_err(|e| LinalgError::Decomposition(format!("SVD failed: {e:?}")))?;
    sv.sort_by(|x, y| y.total_cmp(x));
    Ok(sv)
}

/// Number of singular values above `tol · σ_max`.
pub fn rank(a: &Matrix, tol: Scalar) -> LinalgResult<usize> {
    let sv = singular_values(a)?;
    let r = count_above(&sv, tol);
    debug!(shape = %a.shape(), rank = r, "numerical rank");
    Ok(r)
}

/// Number of eigenvalues with `|λ| > tol · max|λ|`.
pub fn eigen_rank(a: &Matrix, tol: Scalar) -> LinalgResult<usize> {
    let system = eigen(a)?;
    let magnitudes: Vec<Scalar> = system.values().iter().map(|z| z.norm()).collect();
    Ok(count_above(&magnitudes, tol))
}

/// True if some column is a linear combination of the others.
pub fn has_dependent_columns(a: &Matrix, tol: Scalar) -> LinalgResult<bool> {
    Ok(rank(a, tol)? < a.cols())
}

/// True if the matrix is square and of full rank.
pub fn is_full_rank(a: &Matrix, tol: Scalar) -> LinalgResult<bool> {
    a.require_square()?;
    Ok(rank(a, tol)? == a.rows())
}

fn count_above(magnitudes: &[Scalar], tol: Scalar) -> usize {
    let largest = magnitudes.iter().copied().fold(0.0, Scalar::max);
    if largest == 0.0 {
        return 0;
    }
    let threshold = tol * largest;
    magnitudes.iter().filter(|&&m| m > threshold).count()
}
