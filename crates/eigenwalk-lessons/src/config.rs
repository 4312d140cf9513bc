//! Lesson configuration.
//!
//! Numerical tolerances, print precision, plot size, and optional
//! per-lesson overrides of the literal matrices and vectors. Loadable
//! from TOML:
//!
//! ```toml
//! tolerance = 1e-10
//! precision = 3
//!
//! [overrides.inversion]
//! matrix = [[4.0, 1.0], [2.0, 3.0]]
//! vectors = [[1.0, 1.0]]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use eigenwalk_math::{Matrix, Vector};
use eigenwalk_types::{constants, LinalgError, LinalgResult, Scalar};

use crate::lesson::{Lesson, LessonKind};

/// Largest print precision accepted.
const MAX_PRECISION: usize = 12;

/// Configuration for a notebook run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LessonConfig {
    /// Relative threshold below which eigen/singular values count as zero.
    pub tolerance: Scalar,

    /// Absolute slack for identity checks (`A·v = λ·v`, `A⁻¹·A = I`, ...).
    pub check_tolerance: Scalar,

    /// Digits after the decimal point in printed steps.
    pub precision: usize,

    /// Diagram canvas size `[width, height]` in pixels.
    pub plot_size: [u32; 2],

    /// Per-lesson replacements, keyed by lesson name.
    pub overrides: BTreeMap<String, LessonOverride>,
}

/// Replacement inputs for one lesson. Absent fields keep the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LessonOverride {
    pub matrix: Option<Matrix>,
    pub vectors: Option<Vec<Vector>>,
    pub translation: Option<Vector>,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            tolerance: constants::DEFAULT_TOLERANCE,
            check_tolerance: constants::CHECK_TOLERANCE,
            precision: constants::DISPLAY_PRECISION,
            plot_size: [constants::DEFAULT_PLOT_SIZE.0, constants::DEFAULT_PLOT_SIZE.1],
            overrides: BTreeMap::new(),
        }
    }
}

impl LessonConfig {
    /// Tighter checks and more printed digits.
    pub fn strict() -> Self {
        Self {
            tolerance: 1e-12,
            check_tolerance: 1e-10,
            precision: 8,
            ..Default::default()
        }
    }

    /// Short numbers and larger diagrams, for slides.
    pub fn presentation() -> Self {
        Self {
            precision: 2,
            plot_size: [960, 960],
            ..Default::default()
        }
    }

    /// Adds or replaces the override for `kind`.
    pub fn with_override(mut self, kind: LessonKind, over: LessonOverride) -> Self {
        self.overrides.insert(kind.name().to_string(), over);
        self
    }

    /// `plot_size` as the tuple renderers take.
    pub fn plot_size(&self) -> (u32, u32) {
        (self.plot_size[0], self.plot_size[1])
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> LinalgResult<Self> {
        let config: LessonConfig =
            toml::from_str(text).map_err(|e| LinalgError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> LinalgResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading lesson config");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> LinalgResult<String> {
        toml::to_string_pretty(self).map_err(|e| LinalgError::Serialization(e.to_string()))
    }

    /// Checks ranges and that every override fits its lesson.
    pub fn validate(&self) -> LinalgResult<()> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(LinalgError::InvalidConfig(format!(
                "tolerance must be in (0, 1), got {}",
                self.tolerance
            )));
        }
        if !(self.check_tolerance > 0.0 && self.check_tolerance < 1.0) {
            return Err(LinalgError::InvalidConfig(format!(
                "check_tolerance must be in (0, 1), got {}",
                self.check_tolerance
            )));
        }
        if self.precision > MAX_PRECISION {
            return Err(LinalgError::InvalidConfig(format!(
                "precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            )));
        }
        if self.plot_size.contains(&0) {
            return Err(LinalgError::InvalidConfig(
                "plot_size must be non-zero".to_string(),
            ));
        }
        for (name, over) in &self.overrides {
            let kind = LessonKind::from_name(name)
                .ok_or_else(|| LinalgError::InvalidConfig(format!("unknown lesson '{name}'")))?;
            over.validate_for(kind)?;
        }
        Ok(())
    }
}

impl LessonOverride {
    pub fn matrix(matrix: Matrix) -> Self {
        Self {
            matrix: Some(matrix),
            ..Default::default()
        }
    }

    fn validate_for(&self, kind: LessonKind) -> LinalgResult<()> {
        let default = Lesson::from_kind(kind);
        let matrix = self.matrix.as_ref().unwrap_or(&default.matrix);
        let name = kind.name();

        if kind.needs_square_matrix() && !matrix.is_square() {
            return Err(LinalgError::InvalidConfig(format!(
                "{name}: matrix must be square, got {}",
                matrix.shape()
            )));
        }
        if let Some(vectors) = &self.vectors {
            let mismatched = vectors.iter().enumerate().find(|(_, v)| v.len() != matrix.cols());
            if let Some((i, v)) = mismatched {
                return Err(LinalgError::InvalidConfig(format!(
                    "{name}: vector {i} has length {}, matrix has {} columns",
                    v.len(),
                    matrix.cols()
                )));
            }
        }
        if let Some(b) = &self.translation {
            if kind != LessonKind::AffineTransformation {
                return Err(LinalgError::InvalidConfig(format!(
                    "{name}: only affine_transformation takes a translation"
                )));
            }
            if b.len() != matrix.rows() {
                return Err(LinalgError::InvalidConfig(format!(
                    "{name}: translation has length {}, matrix has {} rows",
                    b.len(),
                    matrix.rows()
                )));
            }
        }
        Ok(())
    }
}
