//! Outcome bookkeeping and terminal reporting.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::prelude::*;

/// Exit codes, matching the conventions of common test runners.
pub const EXIT_OK: i32 = 0;
pub const EXIT_TESTS_FAILED: i32 = 1;
pub const EXIT_INTERRUPTED: i32 = 2;
pub const EXIT_NO_TESTS_COLLECTED: i32 = 5;

/// Result of one test item, or of one failed collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(String),
    Error(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    pub id: String,
    pub outcome: Outcome,
}

/// Everything that happened during one run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub reports: Vec<TestReport>,
    pub collection_errors: Vec<(String, GenStringError)>,
    pub interrupted: bool,
}

impl RunReport {
    pub fn push(&mut self, report: TestReport) {
        self.reports.push(report);
    }

    pub fn push_collection_error(&mut self, test: &str, error: GenStringError) {
        self.collection_errors.push((test.to_string(), error));
    }

    pub fn has_collection_errors(&self) -> bool {
        !self.collection_errors.is_empty()
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    /// Setup errors plus collection errors.
    pub fn errors(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Error(_))) + self.collection_errors.len()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn exit_code(&self) -> i32 {
        if self.has_collection_errors() && self.interrupted {
            EXIT_INTERRUPTED
        } else if self.failed() > 0 || self.errors() > 0 {
            EXIT_TESTS_FAILED
        } else if self.reports.is_empty() {
            EXIT_NO_TESTS_COLLECTED
        } else {
            EXIT_OK
        }
    }

    /// One-line summary, e.g. `9 passed, 1 failed`.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        for (n, label) in [
            (self.failed(), "failed"),
            (self.passed(), "passed"),
            (self.skipped(), "skipped"),
            (self.errors(), "error"),
        ] {
            if n > 0 {
                let label = if label == "error" && n > 1 { "errors" } else { label };
                parts.push(format!("{} {}", n, label));
            }
        }
        if parts.is_empty() {
            return "no tests ran".to_string();
        }
        parts.join(", ")
    }

    /// Writes per-test lines, collection errors and the summary.
    pub fn render<W: WriteColor>(&self, out: &mut W) -> io::Result<()> {
        for (test, error) in &self.collection_errors {
            write_colored(out, Color::Red, "ERROR")?;
            writeln!(out, " collecting {}: {}", test, error)?;
        }
        if self.interrupted {
            write_colored(out, Color::Red, "Interrupted")?;
            let n = self.collection_errors.len();
            writeln!(
                out,
                ": {} {} during collection",
                n,
                if n == 1 { "error" } else { "errors" }
            )?;
        }
        for report in &self.reports {
            match &report.outcome {
                Outcome::Passed => {
                    write_colored(out, Color::Green, "PASSED")?;
                    writeln!(out, " {}", report.id)?;
                }
                Outcome::Failed(message) => {
                    write_colored(out, Color::Red, "FAILED")?;
                    writeln!(out, " {} - {}", report.id, message)?;
                }
                Outcome::Error(message) => {
                    write_colored(out, Color::Yellow, "ERROR")?;
                    writeln!(out, " {} - {}", report.id, message)?;
                }
                Outcome::Skipped(reason) => {
                    write_colored(out, Color::Yellow, "SKIPPED")?;
                    writeln!(out, " {} - {}", report.id, reason)?;
                }
            }
        }
        let color = if self.exit_code() == EXIT_OK {
            Color::Green
        } else {
            Color::Red
        };
        write_colored(out, color, &format!("== {} ==", self.summary()))?;
        writeln!(out)
    }

    /// Renders to stdout.
    pub fn print(&self, use_colors: bool) -> io::Result<()> {
        let choice = if use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.render(&mut stdout)
    }
}

fn write_colored<W: WriteColor>(out: &mut W, color: Color, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}", text)?;
    out.reset()
}
