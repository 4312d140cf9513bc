//! Dense row-major matrices.
//!
//! `Matrix` is the notebook's own value type: serializable, printable,
//! and checked on every product. Arithmetic that matters numerically
//! (products, factorizations) is handed to `faer` through
//! [`Matrix::to_faer`] / [`Matrix::from_faer`].

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use faer::Mat;
use serde::{Deserialize, Serialize};

use eigenwalk_types::{constants, LinalgError, LinalgResult, Scalar, Shape};

use crate::vector::{parse_entries, Vector};

/// A rectangular array of reals, stored row-major.
///
/// Serializes as a list of rows, so TOML configs can write
/// `matrix = [[2.0, 1.0], [1.0, 2.0]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Scalar>>", into = "Vec<Vec<Scalar>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Scalar>,
}

impl Matrix {
    /// Builds a matrix from rows. Rejects empty input and ragged rows.
    pub fn from_rows<R: AsRef<[Scalar]>>(rows: &[R]) -> LinalgResult<Self> {
        let first = rows.first().ok_or(LinalgError::EmptyMatrix)?;
        let cols = first.as_ref().len();
        if cols == 0 {
            return Err(LinalgError::EmptyMatrix);
        }
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(LinalgError::RaggedRows {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Builds a matrix from a fixed-size array literal, row by row.
    pub fn from_array<const R: usize, const C: usize>(rows: [[Scalar; C]; R]) -> Self {
        Self::from_fn(R, C, |i, j| rows[i][j])
    }

    /// Builds a matrix whose columns are the given vectors.
    pub fn from_columns(columns: &[Vector]) -> LinalgResult<Self> {
        let first = columns.first().ok_or(LinalgError::EmptyMatrix)?;
        let rows = first.len();
        if rows == 0 {
            return Err(LinalgError::EmptyMatrix);
        }
        for (j, col) in columns.iter().enumerate() {
            if col.len() != rows {
                return Err(LinalgError::RaggedRows {
                    row: j,
                    expected: rows,
                    found: col.len(),
                });
            }
        }
        let cols = columns.len();
        Ok(Self::from_fn(rows, cols, |i, j| columns[j][i]))
    }

    /// Builds a `rows×cols` matrix from a generator.
    pub fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> Scalar) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_fn(rows, cols, |_, _| 0.0)
    }

    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Square matrix with `entries` on the diagonal.
    pub fn diagonal(entries: &[Scalar]) -> Self {
        let n = entries.len();
        Self::from_fn(n, n, |i, j| if i == j { entries[i] } else { 0.0 })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols)
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Errors unless the matrix is square and non-empty.
    pub fn require_square(&self) -> LinalgResult<()> {
        if self.data.is_empty() {
            return Err(LinalgError::EmptyMatrix);
        }
        if !self.is_square() {
            return Err(LinalgError::NotSquare(self.shape()));
        }
        Ok(())
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Scalar> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, i: usize) -> &[Scalar] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn column(&self, j: usize) -> Vector {
        Vector::new((0..self.rows).map(|i| self[(i, j)]).collect())
    }

    pub fn columns(&self) -> Vec<Vector> {
        (0..self.cols).map(|j| self.column(j)).collect()
    }

    pub fn to_rows(&self) -> Vec<Vec<Scalar>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn diagonal_entries(&self) -> Vec<Scalar> {
        (0..self.rows.min(self.cols)).map(|i| self[(i, i)]).collect()
    }

    pub fn transpose(&self) -> Matrix {
        Self::from_fn(self.cols, self.rows, |i, j| self[(j, i)])
    }

    pub fn scale(&self, factor: Scalar) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|x| x * factor).collect(),
        }
    }

    pub fn trace(&self) -> Scalar {
        self.diagonal_entries().iter().sum()
    }

    /// True if square and `|a_ij - a_ji| <= tol` for all entries.
    pub fn is_symmetric(&self, tol: Scalar) -> bool {
        self.is_square()
            && (0..self.rows)
                .all(|i| (0..i).all(|j| (self[(i, j)] - self[(j, i)]).abs() <= tol))
    }

    /// Largest absolute entry-wise difference. Shapes must match.
    pub fn max_abs_diff(&self, other: &Matrix) -> LinalgResult<Scalar> {
        if self.shape() != other.shape() {
            return Err(LinalgError::DimensionMismatch {
                op: "max_abs_diff",
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, Scalar::max))
    }

    /// True if shapes match and every entry is within `tol`.
    pub fn approx_eq(&self, other: &Matrix, tol: Scalar) -> bool {
        self.max_abs_diff(other).is_ok_and(|d| d <= tol)
    }

    /// Matrix-vector product `A·v`.
    pub fn mul_vec(&self, v: &Vector) -> LinalgResult<Vector> {
        if self.cols != v.len() {
            return Err(LinalgError::DimensionMismatch {
                op: "mul_vec",
                left: self.shape(),
                right: v.shape(),
            });
        }
        let rhs = Mat::from_fn(v.len(), 1, |i, _| v[i]);
        let product: Mat<Scalar> = &self.to_faer() * &rhs;
        Ok(Vector::new((0..self.rows).map(|i| product[(i, 0)]).collect()))
    }

    /// Matrix-matrix product `A·B`.
    pub fn mul_mat(&self, other: &Matrix) -> LinalgResult<Matrix> {
        if self.cols != other.rows {
            return Err(LinalgError::DimensionMismatch {
                op: "mul_mat",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let product: Mat<Scalar> = &self.to_faer() * &other.to_faer();
        Ok(Matrix::from_faer(&product))
    }

    /// Copies into a `faer` dense matrix.
    pub fn to_faer(&self) -> Mat<Scalar> {
        Mat::from_fn(self.rows, self.cols, |i, j| self.data[i * self.cols + j])
    }

    /// Copies out of a `faer` dense matrix.
    pub fn from_faer(m: &Mat<Scalar>) -> Matrix {
        Self::from_fn(m.nrows(), m.ncols(), |i, j| m[(i, j)])
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Scalar;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Scalar {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}",
            self.shape()
        );
        &self.data[row * self.cols + col]
    }
}

impl TryFrom<Vec<Vec<Scalar>>> for Matrix {
    type Error = LinalgError;

    fn try_from(rows: Vec<Vec<Scalar>>) -> Result<Self, Self::Error> {
        Matrix::from_rows(&rows)
    }
}

impl From<Matrix> for Vec<Vec<Scalar>> {
    fn from(m: Matrix) -> Self {
        m.to_rows()
    }
}

impl FromStr for Matrix {
    type Err = LinalgError;

    /// Parses row syntax: `"2, 1; 1, 2"` (rows split on `;`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .split(';')
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .map(parse_entries)
            .collect::<LinalgResult<Vec<_>>>()?;
        Matrix::from_rows(&rows)
    }
}

impl fmt::Display for Matrix {
    /// Fixed-width grid, one bracketed row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(constants::DISPLAY_PRECISION);
        // Normalize -0.0 so columns stay aligned.
        let cells: Vec<String> = self
            .data
            .iter()
            .map(|&x| {
                let x = if x == 0.0 { 0.0 } else { x };
                format!("{x:.precision$}")
            })
            .collect();
        let width = cells.iter().map(String::len).max().unwrap_or(0);
        for i in 0..self.rows {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for j in 0..self.cols {
                write!(f, " {:>width$}", cells[i * self.cols + j])?;
            }
            write!(f, " ]")?;
        }
        Ok(())
    }
}
