//! CLI command implementations.

use std::path::Path;

use tracing::info;

use eigenwalk_lessons::{Lesson, LessonConfig, LessonKind, LessonReport, LessonRunner};
use eigenwalk_math::inverse::condition_number;
use eigenwalk_math::rank::has_dependent_columns;
use eigenwalk_math::{
    determinant, eigen as eigen_system, eigen_rank, inverse, singular_values, Eigendecomposition,
    Matrix,
};
use eigenwalk_plot::{HeadlessRenderer, JsonDiagramExporter, Renderer, SvgRenderer};
use eigenwalk_types::LinalgError;

use crate::DiagramFormat;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn parse_matrix(text: &str) -> Result<Matrix, Box<dyn std::error::Error>> {
    text.parse::<Matrix>()
        .map_err(|e| format!("could not parse matrix '{text}': {e}").into())
}

/// Run one lesson or all of them.
pub fn run(
    lesson_name: &str,
    format: DiagramFormat,
    out_dir: &Path,
    config_path: Option<&Path>,
    json: bool,
) -> CommandResult {
    let config = match config_path {
        Some(path) => LessonConfig::load(path)?,
        None => LessonConfig::default(),
    };

    let kinds: Vec<LessonKind> = if lesson_name == "all" {
        LessonKind::all().to_vec()
    } else {
        match LessonKind::from_name(lesson_name) {
            Some(kind) => vec![kind],
            None => {
                let available: Vec<&str> = LessonKind::all().iter().map(|k| k.name()).collect();
                return Err(format!(
                    "Unknown lesson: '{lesson_name}'. Available: {}, all",
                    available.join(", ")
                )
                .into());
            }
        }
    };

    info!(lessons = kinds.len(), format = ?format, out = %out_dir.display(), "starting run");
    let mut renderer: Box<dyn Renderer> = match format {
        DiagramFormat::Svg => Box::new(SvgRenderer::new(out_dir).with_size(config.plot_size())),
        DiagramFormat::Json => Box::new(JsonDiagramExporter::new(out_dir.join("diagrams.json"))),
        DiagramFormat::Headless => Box::new(HeadlessRenderer::new()),
    };

    let mut reports = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let lesson = Lesson::configured(kind, &config)?;
        let report = LessonRunner::run(&lesson, renderer.as_mut())?;
        if !json {
            println!("{report}");
        }
        reports.push(report);
    }
    renderer.finalize()?;

    if json {
        println!("{}", LessonReport::to_json(&reports)?);
    } else if format != DiagramFormat::Headless {
        println!(
            "{} diagram(s) written by the {} renderer to {}",
            renderer.diagram_count(),
            renderer.name(),
            out_dir.display()
        );
    }

    let failed: usize = reports.iter().map(|r| r.failed_checks().count()).sum();
    if failed > 0 {
        return Err(format!("{failed} check(s) failed").into());
    }
    Ok(())
}

/// List lessons in reading order.
pub fn list() -> CommandResult {
    println!("eigenwalk lessons");
    println!("─────────────────");
    for (i, kind) in LessonKind::all().iter().enumerate() {
        println!("{:>2}. {:<24} {}", i + 1, kind.name(), kind.title());
    }
    Ok(())
}

/// Print the eigenpairs of a matrix.
pub fn eigen(matrix: &str, precision: usize) -> CommandResult {
    let a = parse_matrix(matrix)?;
    println!("A =\n{a:.precision$}");
    println!();

    let system = eigen_system(&a)?;
    let solver = if system.is_symmetric() { "self-adjoint" } else { "general" };
    println!("Solver: {solver}");
    for (k, (lambda, v)) in system.pairs().enumerate() {
        let entries: Vec<String> = v
            .iter()
            .map(|z| {
                if z.im == 0.0 {
                    format!("{:.precision$}", z.re)
                } else {
                    format!("{z:.precision$}")
                }
            })
            .collect();
        if lambda.im == 0.0 {
            println!(
                "λ{} = {:.precision$}   v{} = ({})",
                k + 1,
                lambda.re,
                k + 1,
                entries.join(", ")
            );
        } else {
            println!(
                "λ{} = {lambda:.precision$}   v{} = ({})",
                k + 1,
                k + 1,
                entries.join(", ")
            );
        }
    }
    println!("max ‖A·v − λ·v‖ = {:.2e}", system.residual(&a)?);
    Ok(())
}

/// Invert a matrix directly and, if possible, through its eigendecomposition.
pub fn invert(matrix: &str, precision: usize) -> CommandResult {
    let a = parse_matrix(matrix)?;
    println!("A =\n{a:.precision$}");
    println!("det(A) = {:.precision$}", determinant(&a)?);
    println!();

    let direct = inverse(&a)?;
    println!("A⁻¹ =\n{direct:.precision$}");
    println!("cond(A) = {:.3e}", condition_number(&a)?);
    println!();

    match Eigendecomposition::new(&a).and_then(|d| d.inverse()) {
        Ok(via_eigen) => {
            let diff = via_eigen.max_abs_diff(&direct)?;
            println!("Q·Λ⁻¹·Q⁻¹ =\n{via_eigen:.precision$}");
            println!("max |Δ| vs direct inverse = {diff:.2e}");
        }
        Err(e @ (LinalgError::ComplexSpectrum | LinalgError::NotDiagonalizable)) => {
            println!("Q·Λ⁻¹·Q⁻¹ unavailable: {e}");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Print singular values and rank.
pub fn rank(matrix: &str, tolerance: f64) -> CommandResult {
    let a = parse_matrix(matrix)?;
    println!("A =\n{a}");
    println!();

    let sv = singular_values(&a)?;
    let r = eigenwalk_math::rank(&a, tolerance)?;
    let rendered: Vec<String> = sv.iter().map(|s| format!("{s:.4e}")).collect();
    println!("Singular values: [{}]", rendered.join(", "));
    println!("Rank:            {r} of {}", a.rows().min(a.cols()));
    if has_dependent_columns(&a, tolerance)? {
        println!("Columns:         linearly dependent");
    } else {
        println!("Columns:         linearly independent");
    }
    if a.is_square() {
        println!("Non-zero eigenvalues: {}", eigen_rank(&a, tolerance)?);
    }
    Ok(())
}

/// Validate a lesson config.
pub fn validate(path: &Path) -> CommandResult {
    println!("eigenwalk config validator");
    println!("──────────────────────────");
    println!();
    println!("Validating config: {}", path.display());

    let config = LessonConfig::load(path)?;
    println!(
        "✅ Config is valid (tolerance {:e}, precision {}, {} override(s)).",
        config.tolerance,
        config.precision,
        config.overrides.len()
    );
    for name in config.overrides.keys() {
        println!("   override: {name}");
    }
    Ok(())
}
