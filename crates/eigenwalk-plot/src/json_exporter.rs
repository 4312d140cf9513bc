//! JSON diagram exporter — writes every diagram of a run to one file.
//!
//! Implements the `Renderer` trait. Diagrams are buffered as they arrive
//! and serialized on `finalize()`, so the output can be re-plotted by
//! any external tool.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use eigenwalk_types::{LinalgError, LinalgResult};

use crate::diagram::ArrowDiagram;
use crate::renderer::Renderer;

/// Top-level JSON document.
#[derive(Serialize)]
struct DiagramBundle<'a> {
    diagram_count: usize,
    diagrams: &'a [ArrowDiagram],
}

/// Collects diagrams and writes them to a JSON file.
///
/// Usage:
/// ```text
/// let mut exporter = JsonDiagramExporter::new("diagrams.json");
/// // ... run lessons, which call render() per diagram ...
/// exporter.finalize()?; // Writes the JSON file
/// ```
pub struct JsonDiagramExporter {
    output_path: PathBuf,
    diagrams: Vec<ArrowDiagram>,
}

impl JsonDiagramExporter {
    /// Creates a new exporter that will write to the given path.
    pub fn new(output_path: impl AsRef<Path>) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
            diagrams: Vec::new(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Diagrams buffered so far.
    pub fn diagrams(&self) -> &[ArrowDiagram] {
        &self.diagrams
    }
}

impl Renderer for JsonDiagramExporter {
    fn render(&mut self, diagram: &ArrowDiagram) -> LinalgResult<()> {
        self.diagrams.push(diagram.clone());
        Ok(())
    }

    fn finalize(&mut self) -> LinalgResult<()> {
        let bundle = DiagramBundle {
            diagram_count: self.diagrams.len(),
            diagrams: &self.diagrams,
        };
        let json = serde_json::to_string_pretty(&bundle).map_err(|e| {
            LinalgError::Serialization(format!("JSON serialization failed: {e}"))
        })?;
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.output_path, json)?;
        info!(
            path = %self.output_path.display(),
            diagrams = self.diagrams.len(),
            "wrote diagram JSON"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "json_exporter"
    }

    fn diagram_count(&self) -> u32 {
        self.diagrams.len() as u32
    }
}
