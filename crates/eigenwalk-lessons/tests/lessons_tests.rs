//! Integration tests for eigenwalk-lessons.

use eigenwalk_lessons::config::{LessonConfig, LessonOverride};
use eigenwalk_lessons::lesson::{Lesson, LessonKind};
use eigenwalk_lessons::report::LessonReport;
use eigenwalk_lessons::runner::LessonRunner;
use eigenwalk_math::{Matrix, Vector};
use eigenwalk_plot::{HeadlessRenderer, JsonDiagramExporter, Renderer};
use eigenwalk_types::LinalgError;

fn run(lesson: &Lesson) -> LessonReport {
    let mut renderer = HeadlessRenderer::new();
    LessonRunner::run(lesson, &mut renderer).unwrap()
}

fn step<'a>(report: &'a LessonReport, label: &str) -> &'a str {
    &report
        .find_step(label)
        .unwrap_or_else(|| panic!("missing step '{label}' in {}", report.lesson))
        .value
}

// ─── Lesson Tests ─────────────────────────────────────────────

#[test]
fn all_lessons() {
    assert_eq!(LessonKind::all().len(), 7);
    for &kind in LessonKind::all() {
        assert_eq!(LessonKind::from_name(kind.name()), Some(kind));
        assert_eq!(Lesson::from_kind(kind).kind, kind);
    }
    assert_eq!(LessonKind::from_name("nope"), None);
}

#[test]
fn default_examples_fit_their_lessons() {
    for &kind in LessonKind::all() {
        let lesson = Lesson::from_kind(kind);
        if kind.needs_square_matrix() {
            assert!(lesson.matrix.is_square(), "{}", kind.name());
        }
        for v in &lesson.vectors {
            assert_eq!(v.len(), lesson.matrix.cols(), "{}", kind.name());
        }
    }
    let affine = Lesson::affine_transformation();
    assert_eq!(affine.translation, Some(Vector::from_slice(&[2.0, 1.0])));
}

#[test]
fn configured_applies_override() {
    let config = LessonConfig::default().with_override(
        LessonKind::Inversion,
        LessonOverride::matrix(Matrix::from_array([
            [4.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, 0.0, 1.0],
        ])),
    );
    let lesson = Lesson::configured(LessonKind::Inversion, &config).unwrap();
    assert_eq!(lesson.matrix.rows(), 3);
    // The 2D default vector no longer fits and is dropped.
    assert!(lesson.vectors.is_empty());

    let untouched = Lesson::configured(LessonKind::Rank, &config).unwrap();
    assert_eq!(untouched.matrix, Lesson::rank().matrix);
}

// ─── Runner Tests ─────────────────────────────────────────────

#[test]
fn linear_transformation_values() {
    let report = run(&Lesson::linear_transformation());
    assert_eq!(report.lesson, "linear_transformation");
    assert_eq!(step(&report, "v"), "(2.0000, 1.0000)");
    assert_eq!(step(&report, "A·v"), "(1.0000, 2.0000)");
    assert_eq!(step(&report, "A·e1"), "(-1.0000, 2.0000)");
    assert!(report.all_passed());
    assert_eq!(report.diagrams, 2);
}

#[test]
fn magnitude_change_ratios() {
    let report = run(&Lesson::magnitude_change());
    assert_eq!(step(&report, "singular values"), "[3.0000, 1.0000]");
    assert_eq!(step(&report, "‖A·v2‖ / ‖v2‖"), "3.0000");
    assert_eq!(step(&report, "‖A·v3‖ / ‖v3‖"), "1.0000");
    assert_eq!(report.checks.len(), 3);
    assert!(report.all_passed());
}

#[test]
fn magnitude_change_zero_vector_is_noted() {
    let mut lesson = Lesson::magnitude_change();
    lesson.vectors = vec![Vector::zeros(2)];
    let report = run(&lesson);
    assert_eq!(step(&report, "‖A·v‖ / ‖v‖"), "undefined for the zero vector");
    assert!(report.checks.is_empty());
}

#[test]
fn affine_transformation_values() {
    let report = run(&Lesson::affine_transformation());
    assert_eq!(step(&report, "A·v"), "(2.0000, 2.0000)");
    assert_eq!(step(&report, "A·v + b"), "(4.0000, 3.0000)");
    assert_eq!(step(&report, "f(0)"), "(2.0000, 1.0000)");
    assert!(report.all_passed());
    assert_eq!(report.diagrams, 1);
}

#[test]
fn eigenvectors_lesson() {
    let report = run(&Lesson::eigenvectors());
    // Decreasing modulus: -4 before 1.
    assert_eq!(step(&report, "λ1"), "-4.0000");
    assert_eq!(step(&report, "λ2"), "1.0000");
    assert_eq!(step(&report, "v1"), "(0.7071, -0.7071)");
    assert_eq!(step(&report, "v2"), "(0.8321, 0.5547)");
    assert!(report.checks.iter().any(|c| c.name == "A·v1 = λ1·v1"));
    assert!(report.all_passed());
    assert_eq!(report.diagrams, 1);
}

#[test]
fn eigenvectors_of_diagonal_matrix() {
    let mut lesson = Lesson::eigenvectors();
    lesson.matrix = Matrix::diagonal(&[2.0, 5.0]);
    let report = run(&lesson);
    assert!(report
        .checks
        .iter()
        .any(|c| c.name.starts_with("eigenvalues of a diagonal matrix") && c.passed));
    assert_eq!(step(&report, "λ1"), "5.0000");
    assert_eq!(step(&report, "v1"), "(0.0000, 1.0000)");
}

#[test]
fn eigenvectors_of_rotation_are_complex() {
    let mut lesson = Lesson::eigenvectors();
    lesson.matrix = Matrix::from_array([[0.0, -1.0], [1.0, 0.0]]);
    let report = run(&lesson);
    assert!(report.find_step("spectrum").is_some());
    assert!(report.all_passed());
    // No real eigenvector to draw.
    assert_eq!(report.diagrams, 0);
}

#[test]
fn eigendecomposition_reconstructs() {
    let report = run(&Lesson::eigendecomposition());
    assert_eq!(step(&report, "Λ"), "[  4.0000  0.0000 ]\n[  0.0000 -1.0000 ]");
    let names: Vec<&str> = report.checks.iter().map(|c| c.name.as_str()).collect();
    assert!(names.contains(&"A = Q·Λ·Q⁻¹"));
    assert!(names.contains(&"Q·Λ³·Q⁻¹ = A·A·A"));
    assert!(report.all_passed());
}

#[test]
fn eigendecomposition_of_rotation_is_noted() {
    let mut lesson = Lesson::eigendecomposition();
    lesson.matrix = Matrix::from_array([[0.0, -1.0], [1.0, 0.0]]);
    let report = run(&lesson);
    assert!(step(&report, "A = Q·Λ·Q⁻¹").contains("complex"));
    assert!(step(&report, "λ1").ends_with('i'));
    assert!(report.checks.is_empty());
}

#[test]
fn eigendecomposition_of_defective_matrix_is_noted() {
    let config = LessonConfig::default().with_override(
        LessonKind::Eigendecomposition,
        LessonOverride::matrix(Matrix::from_array([[1.0, 1.0], [0.0, 1.0]])),
    );
    let lesson = Lesson::configured(LessonKind::Eigendecomposition, &config).unwrap();
    let report = run(&lesson);
    assert!(step(&report, "A = Q·Λ·Q⁻¹").contains("do not span"));
    assert_eq!(step(&report, "λ1"), "1.0000");
    assert!(report.checks.is_empty());
    assert_eq!(report.diagrams, 0);
}

#[test]
fn rank_lesson_finds_dependent_columns() {
    let report = run(&Lesson::rank());
    assert_eq!(step(&report, "rank"), "1");
    assert!(step(&report, "columns").starts_with("linearly dependent"));
    assert_eq!(step(&report, "λ1"), "5.0000");
    assert!(report.all_passed());
}

#[test]
fn inversion_lesson() {
    let report = run(&Lesson::inversion());
    assert_eq!(step(&report, "det(A)"), "3.0000");
    assert_eq!(
        step(&report, "A⁻¹ (direct)"),
        "[  0.6667 -0.3333 ]\n[ -0.3333  0.6667 ]"
    );
    assert!(report.find_step("A⁻¹ = Q·Λ⁻¹·Q⁻¹").is_some());
    assert!(report.all_passed());
    assert!(report.checks.len() >= 4);
}

#[test]
fn inversion_of_singular_matrix_is_noted() {
    let mut lesson = Lesson::inversion();
    lesson.matrix = Matrix::from_array([[1.0, 2.0], [2.0, 4.0]]);
    let report = run(&lesson);
    assert_eq!(step(&report, "A⁻¹"), "A is singular and has no inverse");
    assert_eq!(report.diagrams, 0);
}

#[test]
fn non_square_matrix_rejected_by_eigen_lessons() {
    let mut lesson = Lesson::eigenvectors();
    lesson.matrix = Matrix::from_array([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    lesson.vectors.clear();
    let mut renderer = HeadlessRenderer::new();
    let err = LessonRunner::run(&lesson, &mut renderer).unwrap_err();
    assert!(matches!(err, LinalgError::NotSquare(_)));
}

#[test]
fn run_all_lessons() {
    let mut renderer = HeadlessRenderer::new();
    let reports = LessonRunner::run_all(&LessonConfig::default(), &mut renderer).unwrap();
    assert_eq!(reports.len(), 7);
    for (report, kind) in reports.iter().zip(LessonKind::all()) {
        assert_eq!(report.lesson, kind.name());
        assert!(report.all_passed(), "{}", report.to_text());
    }
    let total: u32 = reports.iter().map(|r| r.diagrams).sum();
    assert_eq!(renderer.diagram_count(), total);
    assert_eq!(total, 8);
}

#[test]
fn run_all_exports_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagrams.json");
    let mut exporter = JsonDiagramExporter::new(&path);
    LessonRunner::run_all(&LessonConfig::presentation(), &mut exporter).unwrap();
    exporter.finalize().unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["diagram_count"], 8);
}

// ─── Report Tests ─────────────────────────────────────────────

#[test]
fn report_text_output() {
    let mut report = LessonReport::new("demo", "Demo").with_precision(2);
    report.step("x", &1.23456);
    report.step("M", &Matrix::identity(2));
    report.check("x > 1", true, "1.23");
    report.check("x < 1", false, "1.23");

    let text = report.to_text();
    assert!(text.starts_with("== Demo =="));
    assert!(text.contains("x: 1.23\n"));
    assert!(text.contains("M:\n    [ 1.00 0.00 ]\n"));
    assert!(text.contains("[ok] x > 1"));
    assert!(text.contains("[FAILED] x < 1"));
    assert!(!report.all_passed());
    assert_eq!(report.failed_checks().count(), 1);
}

#[test]
fn precision_follows_config() {
    let config = LessonConfig {
        precision: 1,
        ..Default::default()
    };
    let lesson = Lesson::configured(LessonKind::LinearTransformation, &config).unwrap();
    let report = run(&lesson);
    assert_eq!(step(&report, "A·v"), "(1.0, 2.0)");
}

#[test]
fn report_json_roundtrip() {
    let report = run(&Lesson::rank());
    let json = LessonReport::to_json(std::slice::from_ref(&report)).unwrap();
    let back: Vec<LessonReport> = serde_json::from_str(&json).unwrap();
    assert_eq!(back[0], report);
}

// ─── Config Tests ─────────────────────────────────────────────

#[test]
fn config_defaults_validate() {
    LessonConfig::default().validate().unwrap();
    LessonConfig::strict().validate().unwrap();
    LessonConfig::presentation().validate().unwrap();
    assert_eq!(LessonConfig::presentation().plot_size(), (960, 960));
}

#[test]
fn config_from_toml() {
    let text = r#"
        tolerance = 1e-10
        precision = 3

        [overrides.inversion]
        matrix = [[4.0, 1.0], [2.0, 3.0]]
        vectors = [[1.0, 1.0]]
    "#;
    let config = LessonConfig::from_toml_str(text).unwrap();
    assert_eq!(config.tolerance, 1e-10);
    assert_eq!(config.precision, 3);
    assert_eq!(config.plot_size, [640, 640]);
    let over = &config.overrides["inversion"];
    assert_eq!(over.matrix.as_ref().unwrap().shape().rows, 2);

    let report = run(&Lesson::configured(LessonKind::Inversion, &config).unwrap());
    assert_eq!(step(&report, "det(A)"), "10.000");
    assert!(report.all_passed());
}

#[test]
fn config_toml_roundtrip() {
    let config = LessonConfig::strict().with_override(
        LessonKind::AffineTransformation,
        LessonOverride {
            translation: Some(Vector::from_slice(&[0.0, -1.0])),
            ..Default::default()
        },
    );
    let text = config.to_toml_string().unwrap();
    assert_eq!(LessonConfig::from_toml_str(&text).unwrap(), config);
}

#[test]
fn config_rejects_bad_overrides() {
    let non_square = "[overrides.eigenvectors]\nmatrix = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]\n";
    assert!(matches!(
        LessonConfig::from_toml_str(non_square),
        Err(LinalgError::InvalidConfig(_))
    ));

    let unknown = "[overrides.fourier]\nmatrix = [[1.0]]\n";
    assert!(LessonConfig::from_toml_str(unknown).is_err());

    let ragged = "[overrides.rank]\nmatrix = [[1.0, 2.0], [3.0]]\n";
    assert!(LessonConfig::from_toml_str(ragged).is_err());

    let short_vector = "[overrides.rank]\nvectors = [[1.0]]\n";
    assert!(LessonConfig::from_toml_str(short_vector).is_err());

    let stray_translation = "[overrides.rank]\ntranslation = [1.0, 1.0]\n";
    assert!(LessonConfig::from_toml_str(stray_translation).is_err());
}

#[test]
fn config_rejects_bad_ranges() {
    assert!(LessonConfig::from_toml_str("tolerance = 0.0").is_err());
    assert!(LessonConfig::from_toml_str("precision = 40").is_err());
    assert!(LessonConfig::from_toml_str("plot_size = [0, 100]").is_err());
    assert!(LessonConfig::from_toml_str("colour = \"red\"").is_err());
}

#[test]
fn config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lessons.toml");
    std::fs::write(&path, "precision = 2\n").unwrap();
    assert_eq!(LessonConfig::load(&path).unwrap().precision, 2);
    assert!(matches!(
        LessonConfig::load(dir.path().join("missing.toml")),
        Err(LinalgError::Io(_))
    ));
}
