//! Dense real vectors.
//!
//! A `Vector` is a point or direction in Rⁿ. Products with matrices live
//! on [`Matrix`](crate::Matrix); this module only carries the element-wise
//! operations the notebook prints (norms, dot products, differences).

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use eigenwalk_types::{constants, LinalgError, LinalgResult, Scalar, Shape};

/// An ordered, fixed-length sequence of reals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector(Vec<Scalar>);

impl Vector {
    /// Creates a vector from its entries.
    pub fn new(data: Vec<Scalar>) -> Self {
        Self(data)
    }

    /// Creates a vector by copying a slice.
    pub fn from_slice(data: &[Scalar]) -> Self {
        Self(data.to_vec())
    }

    /// The zero vector of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self(vec![0.0; n])
    }

    /// Standard basis vector `e_index` in Rⁿ.
    ///
    /// # Panics
    /// If `index >= n`.
    pub fn basis(n: usize, index: usize) -> Self {
        assert!(index < n, "basis index {index} out of range for R^{n}");
        let mut data = vec![0.0; n];
        data[index] = 1.0;
        Self(data)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shape of the vector viewed as a column (`n×1`).
    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::new(self.0.len(), 1)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Scalar] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Scalar> {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scalar> {
        self.0.iter()
    }

    fn check_same_len(&self, other: &Vector, op: &'static str) -> LinalgResult<()> {
        if self.len() != other.len() {
            return Err(LinalgError::DimensionMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }

    /// Inner product `self · other`.
    pub fn dot(&self, other: &Vector) -> LinalgResult<Scalar> {
        self.check_same_len(other, "dot")?;
        Ok(self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum())
    }

    /// Euclidean length ‖v‖.
    pub fn norm(&self) -> Scalar {
        self.0.iter().map(|x| x * x).sum::<Scalar>().sqrt()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalized(&self) -> Option<Vector> {
        let norm = self.norm();
        if norm <= Scalar::EPSILON {
            return None;
        }
        Some(self.scale(1.0 / norm))
    }

    pub fn scale(&self, factor: Scalar) -> Vector {
        Vector(self.0.iter().map(|x| x * factor).collect())
    }

    pub fn add(&self, other: &Vector) -> LinalgResult<Vector> {
        self.check_same_len(other, "add")?;
        Ok(Vector(self.0.iter().zip(&other.0).map(|(a, b)| a + b).collect()))
    }

    pub fn sub(&self, other: &Vector) -> LinalgResult<Vector> {
        self.check_same_len(other, "sub")?;
        Ok(Vector(self.0.iter().zip(&other.0).map(|(a, b)| a - b).collect()))
    }

    /// Largest absolute component-wise difference. Lengths must match.
    pub fn max_abs_diff(&self, other: &Vector) -> LinalgResult<Scalar> {
        self.check_same_len(other, "max_abs_diff")?;
        Ok(self
            .0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, Scalar::max))
    }

    /// True if lengths match and every component is within `tol`.
    pub fn approx_eq(&self, other: &Vector, tol: Scalar) -> bool {
        self.max_abs_diff(other).is_ok_and(|d| d <= tol)
    }

    /// Angle between two non-zero vectors, in radians.
    pub fn angle_to(&self, other: &Vector) -> LinalgResult<Option<Scalar>> {
        let dot = self.dot(other)?;
        let denom = self.norm() * other.norm();
        if denom <= Scalar::EPSILON {
            return Ok(None);
        }
        Ok(Some((dot / denom).clamp(-1.0, 1.0).acos()))
    }

    /// Views a 2-vector as a plot point. `None` for any other length.
    pub fn to_dvec2(&self) -> Option<DVec2> {
        match self.0.as_slice() {
            [x, y] => Some(DVec2::new(*x, *y)),
            _ => None,
        }
    }
}

impl From<DVec2> for Vector {
    fn from(v: DVec2) -> Self {
        Vector(vec![v.x, v.y])
    }
}

impl From<Vec<Scalar>> for Vector {
    fn from(data: Vec<Scalar>) -> Self {
        Vector(data)
    }
}

impl Index<usize> for Vector {
    type Output = Scalar;

    #[inline]
    fn index(&self, index: usize) -> &Scalar {
        &self.0[index]
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(constants::DISPLAY_PRECISION);
        write!(f, "(")?;
        for (i, x) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let x = if *x == 0.0 { 0.0 } else { *x };
            write!(f, "{x:.precision$}")?;
        }
        write!(f, ")")
    }
}

impl FromStr for Vector {
    type Err = LinalgError;

    /// Parses `"1, 2, 3"` (commas and/or whitespace).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = parse_entries(s)?;
        if data.is_empty() {
            return Err(LinalgError::EmptyMatrix);
        }
        Ok(Vector(data))
    }
}

/// Splits a row of numbers on commas and whitespace.
pub(crate) fn parse_entries(s: &str) -> LinalgResult<Vec<Scalar>> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<Scalar>()
                .map_err(|e| LinalgError::Parse(format!("'{tok}': {e}")))
        })
        .collect()
}
