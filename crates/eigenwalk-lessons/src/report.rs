//! Lesson report — what a lesson printed and what it verified.

use std::fmt::{self, Display, Write as _};

use serde::{Deserialize, Serialize};

use eigenwalk_types::constants;

/// One printed result, e.g. `A·v` and its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub label: String,
    /// Rendered value; may span several lines for matrices.
    pub value: String,
}

/// A named identity the lesson checked numerically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    /// Measured error or other evidence.
    pub detail: String,
}

/// Everything one lesson produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonReport {
    /// Lesson machine name.
    pub lesson: String,
    /// Lesson heading.
    pub title: String,
    /// Printed steps, in order.
    pub steps: Vec<Step>,
    /// Numerical checks, in order.
    pub checks: Vec<Check>,
    /// Diagrams handed to the renderer.
    pub diagrams: u32,
    /// Digits after the decimal point used for values.
    pub precision: usize,
}

impl LessonReport {
    pub fn new(lesson: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            lesson: lesson.into(),
            title: title.into(),
            steps: Vec::new(),
            checks: Vec::new(),
            diagrams: 0,
            precision: constants::DISPLAY_PRECISION,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Records a value, formatted with the report's precision.
    pub fn step(&mut self, label: impl Into<String>, value: &impl Display) {
        let precision = self.precision;
        self.steps.push(Step {
            label: label.into(),
            value: format!("{value:.precision$}"),
        });
    }

    /// Records free text, e.g. why a step was skipped.
    pub fn note(&mut self, label: impl Into<String>, text: impl Into<String>) {
        self.steps.push(Step {
            label: label.into(),
            value: text.into(),
        });
    }

    /// Records a check, returning whether it passed.
    pub fn check(
        &mut self,
        name: impl Into<String>,
        passed: bool,
        detail: impl Into<String>,
    ) -> bool {
        self.checks.push(Check {
            name: name.into(),
            passed,
            detail: detail.into(),
        });
        passed
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failed_checks(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn find_step(&self, label: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.label == label)
    }

    /// Plain-text rendition, as the notebook would print it.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== {} ==", self.title);
        for step in &self.steps {
            if step.value.contains('\n') {
                let _ = writeln!(out, "{}:", step.label);
                for line in step.value.lines() {
                    let _ = writeln!(out, "    {line}");
                }
            } else {
                let _ = writeln!(out, "{}: {}", step.label, step.value);
            }
        }
        for check in &self.checks {
            let mark = if check.passed { "ok" } else { "FAILED" };
            let _ = writeln!(out, "[{mark}] {} ({})", check.name, check.detail);
        }
        if self.diagrams > 0 {
            let _ = writeln!(out, "({} diagram(s))", self.diagrams);
        }
        out
    }

    /// Pretty JSON for a set of reports.
    pub fn to_json(reports: &[LessonReport]) -> serde_json::Result<String> {
        serde_json::to_string_pretty(reports)
    }
}

impl fmt::Display for LessonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
