//! # eigenwalk-lessons
//!
//! The notebook itself. Each lesson defines literal matrices and vectors,
//! calls into `eigenwalk-math`, records what it would print, and hands
//! arrow diagrams to a renderer.
//!
//! Seven lessons, in reading order:
//! linear transformation, magnitude change, affine transformation,
//! eigenvectors, eigendecomposition, rank, inversion.

pub mod config;
pub mod lesson;
pub mod report;
pub mod runner;

pub use config::{LessonConfig, LessonOverride};
pub use lesson::{Lesson, LessonKind};
pub use report::{Check, LessonReport, Step};
pub use runner::LessonRunner;
