//! # eigenwalk-types
//!
//! Shared types, error types, and numerical constants
//! for the eigenwalk linear-algebra notebook.
//!
//! This crate has zero numerical logic — it defines the vocabulary
//! that all other eigenwalk crates share.

pub mod constants;
pub mod error;
pub mod scalar;
pub mod shape;

pub use error::{LinalgError, LinalgResult};
pub use scalar::Scalar;
pub use shape::Shape;
