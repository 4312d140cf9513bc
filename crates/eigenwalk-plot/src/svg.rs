//! SVG arrow renderer backed by `plotters`.
//!
//! Each diagram becomes its own file, `NN_<slug>.svg`, in the output
//! directory. The plot is a square Cartesian chart centred on the origin
//! with faint axes; arrows are a stroked shaft plus a filled head.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{debug, info};

use eigenwalk_types::{constants, LinalgError, LinalgResult};

use crate::diagram::{ArrowDiagram, ArrowStyle};
use crate::renderer::Renderer;

/// Arrow head length as a fraction of the plotted extent.
const HEAD_FRACTION: f64 = 0.04;

/// Writes one SVG file per diagram.
pub struct SvgRenderer {
    out_dir: PathBuf,
    size: (u32, u32),
    written: Vec<PathBuf>,
}

impl SvgRenderer {
    /// Creates a renderer writing into `out_dir` (created on first render).
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            size: constants::DEFAULT_PLOT_SIZE,
            written: Vec::new(),
        }
    }

    /// Overrides the canvas size in pixels.
    pub fn with_size(mut self, size: (u32, u32)) -> Self {
        self.size = size;
        self
    }

    /// Files written so far, in render order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn draw(&self, path: &Path, diagram: &ArrowDiagram) -> LinalgResult<()> {
        let root = SVGBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| LinalgError::Render(format!("backend error: {e}")))?;

        let (lo, hi) = diagram.bounds();
        let head_size = (hi - lo) * HEAD_FRACTION;

        {
            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .caption(diagram.title.as_str(), ("sans-serif", 20.0))
                .x_label_area_size(30)
                .y_label_area_size(40)
                .build_cartesian_2d(lo..hi, lo..hi)
                .map_err(|e| LinalgError::Render(format!("chart build error: {e}")))?;

            chart
                .configure_mesh()
                .x_desc("x")
                .y_desc("y")
                .draw()
                .map_err(|e| LinalgError::Render(format!("mesh error: {e}")))?;

            let axis_style = BLACK.mix(0.4);
            chart
                .draw_series([
                    PathElement::new(vec![(lo, 0.0), (hi, 0.0)], axis_style),
                    PathElement::new(vec![(0.0, lo), (0.0, hi)], axis_style),
                ])
                .map_err(|e| LinalgError::Render(format!("axis error: {e}")))?;

            for arrow in &diagram.arrows {
                let color = style_color(arrow.style);
                let shaft = vec![(arrow.from.x, arrow.from.y), (arrow.to.x, arrow.to.y)];
                chart
                    .draw_series(std::iter::once(PathElement::new(shaft, color.stroke_width(2))))
                    .map_err(|e| LinalgError::Render(format!("draw error: {e}")))?;

                if let Some(head) = arrow.head(head_size) {
                    let points = head.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>();
                    chart
                        .draw_series(std::iter::once(Polygon::new(points, color.filled())))
                        .map_err(|e| LinalgError::Render(format!("draw error: {e}")))?;
                }

                if let Some(label) = &arrow.label {
                    let anchor = (arrow.to.x + head_size * 0.5, arrow.to.y + head_size * 0.5);
                    let font = ("sans-serif", 14.0).into_font().color(&color);
                    chart
                        .draw_series(std::iter::once(Text::new(label.clone(), anchor, font)))
                        .map_err(|e| LinalgError::Render(format!("label error: {e}")))?;
                }
            }
        }

        root.present()
            .map_err(|e| LinalgError::Render(format!("render error: {e}")))?;
        Ok(())
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, diagram: &ArrowDiagram) -> LinalgResult<()> {
        std::fs::create_dir_all(&self.out_dir)?;
        let filename = format!("{:02}_{}.svg", self.written.len() + 1, diagram.slug());
        let path = self.out_dir.join(filename);
        debug!(path = %path.display(), arrows = diagram.len(), "rendering diagram");
        self.draw(&path, diagram)?;
        self.written.push(path);
        Ok(())
    }

    fn finalize(&mut self) -> LinalgResult<()> {
        info!(dir = %self.out_dir.display(), files = self.written.len(), "SVG diagrams written");
        Ok(())
    }

    fn name(&self) -> &str {
        "svg"
    }

    fn diagram_count(&self) -> u32 {
        self.written.len() as u32
    }
}

fn style_color(style: ArrowStyle) -> RGBColor {
    match style {
        ArrowStyle::Original => RGBColor(31, 119, 180),
        ArrowStyle::Transformed => RGBColor(214, 39, 40),
        ArrowStyle::Eigen => RGBColor(44, 160, 44),
        ArrowStyle::Translation => RGBColor(148, 103, 189),
        ArrowStyle::Basis => RGBColor(127, 127, 127),
    }
}
