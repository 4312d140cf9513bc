//! Renderer trait and HeadlessRenderer stub.
//!
//! A lesson hands each finished diagram to the renderer, then calls
//! `finalize()` once at the end. The headless renderer discards all
//! diagrams, serving as a no-op for tests and `--format none`.

use eigenwalk_types::LinalgResult;

use crate::diagram::ArrowDiagram;

/// Trait for presenting arrow diagrams.
///
/// # Implementations
/// - [`HeadlessRenderer`] — Discards diagrams (tests, text-only runs)
/// - [`SvgRenderer`](crate::SvgRenderer) — One SVG file per diagram
/// - [`JsonDiagramExporter`](crate::JsonDiagramExporter) — All diagrams in one JSON file
pub trait Renderer: Send {
    /// Draw (or record) one diagram.
    fn render(&mut self, diagram: &ArrowDiagram) -> LinalgResult<()>;

    /// Flush buffers, write files, etc.
    fn finalize(&mut self) -> LinalgResult<()>;

    /// Returns the renderer name.
    fn name(&self) -> &str;

    /// Returns the number of diagrams rendered so far.
    fn diagram_count(&self) -> u32;
}

/// Headless renderer — discards all diagrams.
pub struct HeadlessRenderer {
    diagrams: u32,
}

impl HeadlessRenderer {
    /// Creates a new headless renderer.
    pub fn new() -> Self {
        Self { diagrams: 0 }
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, _diagram: &ArrowDiagram) -> LinalgResult<()> {
        self.diagrams += 1;
        Ok(())
    }

    fn finalize(&mut self) -> LinalgResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "headless"
    }

    fn diagram_count(&self) -> u32 {
        self.diagrams
    }
}
