//! Scalar type alias for the notebook.
//!
//! The dense solvers behind `eigenwalk-math` run in double precision,
//! so every matrix and vector entry is an `f64`.

/// The floating-point type used throughout eigenwalk.
pub type Scalar = f64;
