//! Lesson runner — executes lessons, records their output, and hands
//! diagrams to a renderer.

use tracing::{info, warn};

use eigenwalk_math::{
    determinant, eigen, eigen_rank, inverse, magnitude_change, rank, singular_values,
    AffineMap, Complex64, EigenSystem, Eigendecomposition, LinearMap, Matrix, Vector,
};
use eigenwalk_plot::{Arrow, ArrowDiagram, ArrowStyle, Renderer};
use eigenwalk_types::{LinalgError, LinalgResult, Scalar};

use crate::config::LessonConfig;
use crate::lesson::{Lesson, LessonKind};
use crate::report::LessonReport;

/// Runs lessons and collects their reports.
pub struct LessonRunner;

impl LessonRunner {
    /// Run a single lesson.
    ///
    /// Diagrams are only produced when the lesson's matrix is 2×2.
    pub fn run(lesson: &Lesson, renderer: &mut dyn Renderer) -> LinalgResult<LessonReport> {
        let kind = lesson.kind;
        info!(lesson = kind.name(), shape = %lesson.matrix.shape(), "running lesson");

        let mut report =
            LessonReport::new(kind.name(), kind.title()).with_precision(lesson.precision);
        report.step("A", &lesson.matrix);

        let mut ctx = Context {
            lesson,
            renderer,
            report,
        };
        match kind {
            LessonKind::LinearTransformation => ctx.linear_transformation()?,
            LessonKind::MagnitudeChange => ctx.magnitude_change()?,
            LessonKind::AffineTransformation => ctx.affine_transformation()?,
            LessonKind::Eigenvectors => ctx.eigenvectors()?,
            LessonKind::Eigendecomposition => ctx.eigendecomposition()?,
            LessonKind::Rank => ctx.rank()?,
            LessonKind::Inversion => ctx.inversion()?,
        }
        let report = ctx.report;

        for failed in report.failed_checks() {
            warn!(
                lesson = kind.name(),
                check = %failed.name,
                detail = %failed.detail,
                "check failed"
            );
        }
        info!(
            lesson = kind.name(),
            steps = report.steps.len(),
            checks = report.checks.len(),
            passed = report.all_passed(),
            diagrams = report.diagrams,
            "lesson finished"
        );
        Ok(report)
    }

    /// Run every lesson in reading order.
    pub fn run_all(
        config: &LessonConfig,
        renderer: &mut dyn Renderer,
    ) -> LinalgResult<Vec<LessonReport>> {
        let mut reports = Vec::with_capacity(LessonKind::all().len());
        for &kind in LessonKind::all() {
            let lesson = Lesson::configured(kind, config)?;
            reports.push(Self::run(&lesson, renderer)?);
        }
        Ok(reports)
    }
}

/// Per-run state shared by the lesson bodies.
struct Context<'a> {
    lesson: &'a Lesson,
    renderer: &'a mut dyn Renderer,
    report: LessonReport,
}

impl Context<'_> {
    fn planar(&self) -> bool {
        self.lesson.matrix.rows() == 2 && self.lesson.matrix.cols() == 2
    }

    fn emit(&mut self, diagram: ArrowDiagram) -> LinalgResult<()> {
        self.renderer.render(&diagram)?;
        self.report.diagrams += 1;
        Ok(())
    }

    /// Records `|Δ| ≤ check_tolerance · max(1, scale)`.
    fn close(&mut self, name: &str, diff: Scalar, scale: Scalar) -> bool {
        let tol = self.lesson.check_tolerance * scale.max(1.0);
        self.report
            .check(name, diff <= tol, format!("max |Δ| = {diff:.2e}"))
    }

    // ─── Linear transformation ───────────────────────────────

    fn linear_transformation(&mut self) -> LinalgResult<()> {
        let lesson = self.lesson;
        let a = &lesson.matrix;
        let map = LinearMap::new(a.clone());
        let count = lesson.vectors.len();
        let mut images = Vec::with_capacity(count);
        for (i, v) in lesson.vectors.iter().enumerate() {
            let name = vector_name(i, count);
            let image = map.apply(v)?;
            self.report.step(name.clone(), v);
            self.report.step(format!("A·{name}"), &image);
            images.push(image);
        }

        // A·e_j picks out column j.
        let n = map.input_dim();
        let mut basis_images = Vec::with_capacity(n);
        for j in 0..n {
            let image = map.apply(&Vector::basis(n, j))?;
            let diff = image.max_abs_diff(&a.column(j))?;
            self.report.step(format!("A·e{}", j + 1), &image);
            self.close(
                &format!("A·e{} equals column {} of A", j + 1, j + 1),
                diff,
                image.norm(),
            );
            basis_images.push(image);
        }

        if self.planar() {
            let mut diagram = ArrowDiagram::new("Linear transformation: v and A·v");
            for (i, (v, image)) in lesson.vectors.iter().zip(&images).enumerate() {
                let name = vector_name(i, count);
                diagram.push(Arrow::from_vector(v, ArrowStyle::Original)?.labeled(name.clone()));
                diagram.push(
                    Arrow::from_vector(image, ArrowStyle::Transformed)?
                        .labeled(format!("A·{name}")),
                );
            }
            self.emit(diagram)?;

            let mut diagram = ArrowDiagram::new("Linear transformation: where the basis lands");
            for (j, image) in basis_images.iter().enumerate() {
                diagram.push(
                    Arrow::from_vector(&Vector::basis(2, j), ArrowStyle::Basis)?
                        .labeled(format!("e{}", j + 1)),
                );
                diagram.push(
                    Arrow::from_vector(image, ArrowStyle::Transformed)?
                        .labeled(format!("A·e{}", j + 1)),
                );
            }
            self.emit(diagram)?;
        }
        Ok(())
    }

    // ─── Magnitude change ────────────────────────────────────

    fn magnitude_change(&mut self) -> LinalgResult<()> {
        let lesson = self.lesson;
        let a = &lesson.matrix;
        let sv = singular_values(a)?;
        let sigma_max = sv.first().copied().unwrap_or(0.0);
        // Wide matrices have a null space, so some direction shrinks to zero.
        let sigma_min = if a.rows() >= a.cols() {
            sv.last().copied().unwrap_or(0.0)
        } else {
            0.0
        };
        let precision = self.report.precision;
        self.report.note("singular values", fmt_list(&sv, precision));

        let count = lesson.vectors.len();
        let mut images = Vec::with_capacity(count);
        for (i, v) in lesson.vectors.iter().enumerate() {
            let name = vector_name(i, count);
            let change = magnitude_change(a, v)?;
            self.report.step(format!("‖{name}‖"), &change.input_norm);
            self.report.step(format!("‖A·{name}‖"), &change.output_norm);
            match change.ratio {
                Some(ratio) => {
                    self.report.step(format!("‖A·{name}‖ / ‖{name}‖"), &ratio);
                    let slack = lesson.check_tolerance * sigma_max.max(1.0);
                    let bounds = format!("[{sigma_min:.precision$}, {sigma_max:.precision$}]");
                    self.report.check(
                        format!("σ_min ≤ ‖A·{name}‖/‖{name}‖ ≤ σ_max"),
                        ratio >= sigma_min - slack && ratio <= sigma_max + slack,
                        format!("{ratio:.precision$} in {bounds}"),
                    );
                }
                None => self
                    .report
                    .note(format!("‖A·{name}‖ / ‖{name}‖"), "undefined for the zero vector"),
            }
            images.push(a.mul_vec(v)?);
        }

        if self.planar() {
            let mut diagram = ArrowDiagram::new("Magnitude change: v and A·v");
            for (i, (v, image)) in lesson.vectors.iter().zip(&images).enumerate() {
                let name = vector_name(i, count);
                diagram.push(Arrow::from_vector(v, ArrowStyle::Original)?.labeled(name.clone()));
                diagram.push(
                    Arrow::from_vector(image, ArrowStyle::Transformed)?
                        .labeled(format!("A·{name}")),
                );
            }
            self.emit(diagram)?;
        }
        Ok(())
    }

    // ─── Affine transformation ───────────────────────────────

    fn affine_transformation(&mut self) -> LinalgResult<()> {
        let lesson = self.lesson;
        let a = &lesson.matrix;
        let b = self
            .lesson
            .translation
            .clone()
            .unwrap_or_else(|| Vector::zeros(a.rows()));
        let map = AffineMap::new(a.clone(), b.clone())?;
        self.report.step("b", &b);
        self.report.step("[A b; 0 1]", &map.homogeneous());

        // A linear map fixes the origin; an affine one sends it to b.
        let origin = map.apply(&Vector::zeros(a.cols()))?;
        self.report.step("f(0)", &origin);
        let diff = origin.max_abs_diff(&b)?;
        self.close("f(0) = b", diff, b.norm());

        let count = lesson.vectors.len();
        let mut pairs = Vec::with_capacity(count);
        for (i, v) in lesson.vectors.iter().enumerate() {
            let name = vector_name(i, count);
            let linear = a.mul_vec(v)?;
            let moved = map.apply(v)?;
            let lifted = map.apply_homogeneous(v)?;
            self.report.step(name.clone(), v);
            self.report.step(format!("A·{name}"), &linear);
            self.report.step(format!("A·{name} + b"), &moved);
            let diff = moved.max_abs_diff(&lifted)?;
            self.close(
                &format!("[A b; 0 1]·({name}, 1) agrees with A·{name} + b"),
                diff,
                moved.norm(),
            );
            pairs.push((linear, moved));
        }

        if self.planar() {
            let mut diagram = ArrowDiagram::new("Affine transformation: A·v + b");
            for (i, (v, (linear, moved))) in lesson.vectors.iter().zip(&pairs).enumerate() {
                let name = vector_name(i, count);
                let (Some(linear_tip), Some(moved_tip)) = (linear.to_dvec2(), moved.to_dvec2())
                else {
                    continue;
                };
                diagram.push(Arrow::from_vector(v, ArrowStyle::Original)?.labeled(name.clone()));
                diagram.push(
                    Arrow::from_vector(linear, ArrowStyle::Transformed)?
                        .labeled(format!("A·{name}")),
                );
                diagram.push(
                    Arrow::between(linear_tip, moved_tip, ArrowStyle::Translation).labeled("b"),
                );
                diagram.push(
                    Arrow::from_vector(moved, ArrowStyle::Transformed)?
                        .labeled(format!("A·{name} + b")),
                );
            }
            self.emit(diagram)?;
        }
        Ok(())
    }

    // ─── Eigenvectors ────────────────────────────────────────

    fn eigenvectors(&mut self) -> LinalgResult<()> {
        let lesson = self.lesson;
        let a = &lesson.matrix;
        let system = eigen(a)?;
        let real = system.real_vectors(self.lesson.check_tolerance);
        let values = system.real_values(self.lesson.check_tolerance);
        let precision = self.report.precision;

        match (&values, &real) {
            (Some(values), Some(vectors)) => {
                for (k, (lambda, v)) in values.iter().zip(vectors).enumerate() {
                    let av = a.mul_vec(v)?;
                    let lv = v.scale(*lambda);
                    self.report.step(format!("λ{}", k + 1), lambda);
                    self.report.step(format!("v{}", k + 1), v);
                    self.report.step(format!("A·v{}", k + 1), &av);
                    self.report.step(format!("λ{}·v{}", k + 1, k + 1), &lv);
                    let diff = av.max_abs_diff(&lv)?;
                    self.close(
                        &format!("A·v{} = λ{}·v{}", k + 1, k + 1, k + 1),
                        diff,
                        lambda.abs(),
                    );
                }
            }
            _ => {
                self.report.note("spectrum", "complex: A rotates every real direction");
                for (k, (lambda, v)) in system.pairs().enumerate() {
                    self.report.step(format!("λ{}", k + 1), &lambda);
                    self.report.note(format!("v{}", k + 1), fmt_complex_list(v, precision));
                }
            }
        }

        let residual = system.residual(a)?;
        self.report.step("max ‖A·v − λ·v‖", &residual);
        self.close(
            "‖A·v − λ·v‖ small for every pair",
            residual,
            system.spectral_radius(),
        );

        if is_diagonal(a) {
            let mut expected = a.diagonal_entries();
            expected.sort_by(|x, y| y.total_cmp(x));
            let mut found: Vec<Scalar> = system.values().iter().map(|z| z.re).collect();
            found.sort_by(|x, y| y.total_cmp(x));
            let diff = expected
                .iter()
                .zip(&found)
                .map(|(e, f)| (e - f).abs())
                .fold(0.0, Scalar::max);
            self.close(
                "eigenvalues of a diagonal matrix are its diagonal entries",
                diff,
                system.spectral_radius(),
            );
        }

        // Ordinary vectors change direction; eigenvectors do not.
        for (i, v) in lesson.vectors.iter().enumerate() {
            let name = format!("u{}", i + 1);
            let image = a.mul_vec(v)?;
            self.report.step(name.clone(), v);
            self.report.step(format!("A·{name}"), &image);
            match v.angle_to(&image)? {
                Some(angle) => {
                    let degrees = angle.to_degrees();
                    self.report.step(format!("angle({name}, A·{name}) [deg]"), &degrees);
                }
                None => self
                    .report
                    .note(format!("angle({name}, A·{name})"), "undefined (zero vector)"),
            }
        }

        if self.planar() {
            if let (Some(values), Some(vectors)) = (&values, &real) {
                let mut diagram = ArrowDiagram::new("Eigenvectors: v and A·v = λ·v");
                for (k, (lambda, v)) in values.iter().zip(vectors).enumerate() {
                    diagram.push(
                        Arrow::from_vector(v, ArrowStyle::Eigen)?.labeled(format!("v{}", k + 1)),
                    );
                    diagram.push(
                        Arrow::from_vector(&v.scale(*lambda), ArrowStyle::Transformed)?
                            .labeled(format!("λ{}·v{}", k + 1, k + 1)),
                    );
                }
                for (i, v) in lesson.vectors.iter().enumerate() {
                    let name = format!("u{}", i + 1);
                    diagram.push(
                        Arrow::from_vector(v, ArrowStyle::Original)?.labeled(name.clone()),
                    );
                    diagram.push(
                        Arrow::from_vector(&a.mul_vec(v)?, ArrowStyle::Transformed)?
                            .labeled(format!("A·{name}")),
                    );
                }
                self.emit(diagram)?;
            }
        }
        Ok(())
    }

    // ─── Eigendecomposition ──────────────────────────────────

    fn eigendecomposition(&mut self) -> LinalgResult<()> {
        let lesson = self.lesson;
        let a = &lesson.matrix;
        let system = eigen(a)?;
        let decomposition = match Eigendecomposition::from_system(&system) {
            Ok(d) => d,
            Err(LinalgError::ComplexSpectrum) => {
                self.note_spectrum(&system);
                self.report.note(
                    "A = Q·Λ·Q⁻¹",
                    "no real eigendecomposition: the spectrum is complex",
                );
                return Ok(());
            }
            Err(LinalgError::NotDiagonalizable) => {
                self.note_spectrum(&system);
                self.report.note(
                    "A = Q·Λ·Q⁻¹",
                    "no eigendecomposition: the eigenvectors do not span the space",
                );
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let scale = system.spectral_radius();
        self.report.step("Q", decomposition.q());
        self.report.step("Λ", &decomposition.lambda());
        self.report.step("Q⁻¹", decomposition.q_inv());

        let rebuilt = decomposition.reconstruct()?;
        self.report.step("Q·Λ·Q⁻¹", &rebuilt);
        let diff = rebuilt.max_abs_diff(a)?;
        self.close("A = Q·Λ·Q⁻¹", diff, scale);

        let identity = Matrix::identity(a.rows());
        let diff = decomposition
            .q()
            .mul_mat(decomposition.q_inv())?
            .max_abs_diff(&identity)?;
        self.close("Q·Q⁻¹ = I", diff, 1.0);

        let cubed = decomposition.power(3)?;
        let direct = a.mul_mat(a)?.mul_mat(a)?;
        self.report.step("A³ = Q·Λ³·Q⁻¹", &cubed);
        let diff = cubed.max_abs_diff(&direct)?;
        self.close("Q·Λ³·Q⁻¹ = A·A·A", diff, scale.powi(3));

        if self.planar() {
            let mut diagram = ArrowDiagram::new("Eigendecomposition: columns of Q");
            for (k, (lambda, q)) in decomposition
                .eigenvalues()
                .iter()
                .zip(decomposition.q().columns())
                .enumerate()
            {
                diagram.push(
                    Arrow::from_vector(&q, ArrowStyle::Eigen)?.labeled(format!("q{}", k + 1)),
                );
                diagram.push(
                    Arrow::from_vector(&q.scale(*lambda), ArrowStyle::Transformed)?
                        .labeled(format!("λ{}·q{}", k + 1, k + 1)),
                );
            }
            self.emit(diagram)?;
        }
        Ok(())
    }

    /// Records each eigenvalue, as a real number when the spectrum is real.
    fn note_spectrum(&mut self, system: &EigenSystem) {
        match system.real_values(self.lesson.check_tolerance) {
            Some(values) => {
                for (k, lambda) in values.iter().enumerate() {
                    self.report.step(format!("λ{}", k + 1), lambda);
                }
            }
            None => {
                for (k, lambda) in system.values().iter().enumerate() {
                    self.report.step(format!("λ{}", k + 1), lambda);
                }
            }
        }
    }

    // ─── Rank ────────────────────────────────────────────────

    fn rank(&mut self) -> LinalgResult<()> {
        let lesson = self.lesson;
        let a = &lesson.matrix;
        let tol = self.lesson.tolerance;
        let precision = self.report.precision;
        let sv = singular_values(a)?;
        let r = rank(a, tol)?;
        let cols = a.cols();
        self.report.note("singular values", fmt_list(&sv, precision));
        self.report.step("rank", &r);
        let dependent = r < cols;
        self.report.note(
            "columns",
            if dependent {
                format!("linearly dependent ({r} of {cols} independent)")
            } else {
                "linearly independent".to_string()
            },
        );

        let system = eigen(a)?;
        self.note_spectrum(&system);
        let nonzero = eigen_rank(a, tol)?;
        self.report.step("non-zero eigenvalues", &nonzero);
        if nonzero != r {
            self.report.note(
                "eigenvalue count",
                "differs from the rank: A is not diagonalizable",
            );
        }
        let zeros = system.near_zero(tol);
        self.report.check(
            "dependent columns ⇒ some eigenvalue ≈ 0",
            !dependent || !zeros.is_empty(),
            format!("{} eigenvalue(s) ≈ 0", zeros.len()),
        );

        let count = lesson.vectors.len();
        let mut images = Vec::with_capacity(count);
        for (i, v) in lesson.vectors.iter().enumerate() {
            let name = vector_name(i, count);
            let image = a.mul_vec(v)?;
            self.report.step(name.clone(), v);
            self.report.step(format!("A·{name}"), &image);
            images.push(image);
        }

        if self.planar() {
            let mut diagram = ArrowDiagram::new("Rank: columns of A and images");
            for (j, column) in a.columns().iter().enumerate() {
                diagram.push(
                    Arrow::from_vector(column, ArrowStyle::Basis)?.labeled(format!("a{}", j + 1)),
                );
            }
            for (i, (v, image)) in lesson.vectors.iter().zip(&images).enumerate() {
                let name = vector_name(i, count);
                diagram.push(Arrow::from_vector(v, ArrowStyle::Original)?.labeled(name.clone()));
                diagram.push(
                    Arrow::from_vector(image, ArrowStyle::Transformed)?
                        .labeled(format!("A·{name}")),
                );
            }
            self.emit(diagram)?;
        }
        Ok(())
    }

    // ─── Inversion ───────────────────────────────────────────

    fn inversion(&mut self) -> LinalgResult<()> {
        let lesson = self.lesson;
        let a = &lesson.matrix;
        self.report.step("det(A)", &determinant(a)?);
        let direct = match inverse(a) {
            Ok(inv) => inv,
            Err(LinalgError::Singular) => {
                self.report.note("A⁻¹", "A is singular and has no inverse");
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        self.report.step("A⁻¹ (direct)", &direct);

        match Eigendecomposition::new(a).and_then(|d| d.inverse()) {
            Ok(via_eigen) => {
                self.report.step("A⁻¹ = Q·Λ⁻¹·Q⁻¹", &via_eigen);
                let diff = via_eigen.max_abs_diff(&direct)?;
                self.close(
                    "Q·Λ⁻¹·Q⁻¹ matches the direct inverse",
                    diff,
                    magnitude(&direct),
                );
            }
            Err(LinalgError::ComplexSpectrum) => self
                .report
                .note("A⁻¹ = Q·Λ⁻¹·Q⁻¹", "unavailable: the spectrum is complex"),
            Err(LinalgError::NotDiagonalizable) => self
                .report
                .note("A⁻¹ = Q·Λ⁻¹·Q⁻¹", "unavailable: A is not diagonalizable"),
            Err(LinalgError::Singular) => self
                .report
                .note("A⁻¹ = Q·Λ⁻¹·Q⁻¹", "unavailable: an eigenvalue is ≈ 0"),
            Err(e) => return Err(e),
        }

        let n = a.rows();
        let identity = Matrix::identity(n);
        let scale = magnitude(a) * magnitude(&direct);
        let left = direct.mul_mat(a)?;
        let right = a.mul_mat(&direct)?;
        self.report.step("A⁻¹·A", &left);
        let diff = left.max_abs_diff(&identity)?;
        self.close("A⁻¹·A = I", diff, scale);
        let diff = right.max_abs_diff(&identity)?;
        self.close("A·A⁻¹ = I", diff, scale);

        let count = lesson.vectors.len();
        let mut trips = Vec::with_capacity(count);
        for (i, v) in lesson.vectors.iter().enumerate() {
            let name = vector_name(i, count);
            let image = a.mul_vec(v)?;
            let back = direct.mul_vec(&image)?;
            self.report.step(name.clone(), v);
            self.report.step(format!("A·{name}"), &image);
            self.report.step(format!("A⁻¹·(A·{name})"), &back);
            let diff = back.max_abs_diff(v)?;
            self.close(&format!("A⁻¹·(A·{name}) = {name}"), diff, scale * v.norm());
            trips.push((image, direct.mul_vec(v)?));
        }

        if self.planar() {
            let mut diagram = ArrowDiagram::new("Inversion: A and A⁻¹ acting on v");
            for (i, (v, (image, pulled))) in lesson.vectors.iter().zip(&trips).enumerate() {
                let name = vector_name(i, count);
                diagram.push(Arrow::from_vector(v, ArrowStyle::Original)?.labeled(name.clone()));
                diagram.push(
                    Arrow::from_vector(image, ArrowStyle::Transformed)?
                        .labeled(format!("A·{name}")),
                );
                diagram.push(
                    Arrow::from_vector(pulled, ArrowStyle::Transformed)?
                        .labeled(format!("A⁻¹·{name}")),
                );
            }
            self.emit(diagram)?;
        }
        Ok(())
    }
}

/// `v` for a single vector, `v1`, `v2`, ... otherwise.
fn vector_name(index: usize, count: usize) -> String {
    if count == 1 {
        "v".to_string()
    } else {
        format!("v{}", index + 1)
    }
}

fn is_diagonal(a: &Matrix) -> bool {
    a.is_square()
        && (0..a.rows()).all(|i| (0..a.cols()).all(|j| i == j || a[(i, j)] == 0.0))
}

/// Largest absolute entry.
fn magnitude(a: &Matrix) -> Scalar {
    a.to_rows()
        .iter()
        .flatten()
        .fold(0.0, |acc: Scalar, x| acc.max(x.abs()))
}

fn fmt_list(values: &[Scalar], precision: usize) -> String {
    let items: Vec<String> = values.iter().map(|x| format!("{x:.precision$}")).collect();
    format!("[{}]", items.join(", "))
}

fn fmt_complex_list(values: &[Complex64], precision: usize) -> String {
    let items: Vec<String> = values.iter().map(|z| format!("{z:.precision$}")).collect();
    format!("({})", items.join(", "))
}
