//! # eigenwalk-plot
//!
//! Arrow diagrams for the eigenwalk notebook.
//!
//! Provides an [`ArrowDiagram`] model, a `Renderer` trait with a
//! `HeadlessRenderer` stub, an `SvgRenderer` backed by `plotters`, and a
//! `JsonDiagramExporter` for machine-readable output.

pub mod diagram;
pub mod json_exporter;
pub mod renderer;
pub mod svg;

pub use diagram::{Arrow, ArrowDiagram, ArrowStyle};
pub use json_exporter::JsonDiagramExporter;
pub use renderer::{HeadlessRenderer, Renderer};
pub use svg::SvgRenderer;
