//! Arrow diagram model.
//!
//! A diagram is a titled set of 2D arrows. Lessons build diagrams from
//! vectors before and after a transformation; renderers decide how to
//! draw them.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use eigenwalk_math::Vector;
use eigenwalk_types::{constants, LinalgError, LinalgResult, Scalar};

/// What an arrow represents, which drives its colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowStyle {
    /// Input vector, before any transformation.
    Original,
    /// Image of a vector under the lesson's map.
    Transformed,
    /// Eigenvector direction (or its image, λ·v).
    Eigen,
    /// Translation part of an affine map.
    Translation,
    /// Standard basis vector.
    Basis,
}

/// A single arrow from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub from: DVec2,
    pub to: DVec2,
    pub label: Option<String>,
    pub style: ArrowStyle,
}

impl Arrow {
    pub fn between(from: DVec2, to: DVec2, style: ArrowStyle) -> Self {
        Self {
            from,
            to,
            label: None,
            style,
        }
    }

    pub fn from_origin(to: DVec2, style: ArrowStyle) -> Self {
        Self::between(DVec2::ZERO, to, style)
    }

    /// Arrow from the origin to a 2-vector.
    pub fn from_vector(v: &Vector, style: ArrowStyle) -> LinalgResult<Self> {
        let to = v.to_dvec2().ok_or_else(|| {
            LinalgError::Render(format!("only 2D vectors can be drawn, got length {}", v.len()))
        })?;
        Ok(Self::from_origin(to, style))
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn length(&self) -> Scalar {
        (self.to - self.from).length()
    }

    /// Triangle for the arrow head, tip at `to`. `None` for zero-length arrows.
    pub fn head(&self, size: Scalar) -> Option<[DVec2; 3]> {
        let dir = (self.to - self.from).try_normalize()?;
        let back = self.to - dir * size;
        let side = dir.perp() * (size * 0.5);
        Some([self.to, back + side, back - side])
    }
}

/// A titled collection of arrows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowDiagram {
    pub title: String,
    pub arrows: Vec<Arrow>,
}

impl ArrowDiagram {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            arrows: Vec::new(),
        }
    }

    pub fn push(&mut self, arrow: Arrow) {
        self.arrows.push(arrow);
    }

    pub fn with_arrow(mut self, arrow: Arrow) -> Self {
        self.arrows.push(arrow);
        self
    }

    pub fn len(&self) -> usize {
        self.arrows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrows.is_empty()
    }

    /// Symmetric square extent `(-e, e)` covering the origin and every
    /// arrow endpoint, padded by [`constants::PLOT_PADDING`]. Never smaller
    /// than `(-1, 1)`.
    pub fn bounds(&self) -> (Scalar, Scalar) {
        let extent = self
            .arrows
            .iter()
            .flat_map(|a| [a.from, a.to])
            .map(|p| p.x.abs().max(p.y.abs()))
            .fold(1.0, Scalar::max);
        let padded = extent * (1.0 + constants::PLOT_PADDING);
        (-padded, padded)
    }

    /// Lowercase, underscore-separated title for file names.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.title.len());
        for c in self.title.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('_') {
                slug.push('_');
            }
        }
        let trimmed = slug.trim_matches('_');
        if trimmed.is_empty() {
            "diagram".to_string()
        } else {
            trimmed.to_string()
        }
    }
}
