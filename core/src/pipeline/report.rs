//! Run outcomes and the reporters that receive dry-run output.

use std::fmt;

/// Rule line framing every printed document.
pub const RULE: &str = " ---------------  ******* -----------------";

/// Receives dry-run output and user-facing progress lines.
pub trait Reporter {
    /// Emits a single line.
    fn line(&mut self, text: &str);

    /// Emits a full document framed by header and footer rule lines.
    fn document(&mut self, title: &str, text: &str) {
        self.line(RULE);
        self.line(title);
        self.line(text);
        self.line(RULE);
    }
}

/// Writes to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn line(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Keeps every emitted line in memory.
#[derive(Debug, Default, Clone)]
pub struct CapturingReporter {
    /// Emitted lines, in order.
    pub lines: Vec<String>,
}

impl CapturingReporter {
    /// Everything emitted, newline separated.
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }
}

impl Reporter for CapturingReporter {
    fn line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

/// What happened to one unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// The rewritten document was persisted.
    Written,
    /// Dry run: the rewritten document was sent to the reporter.
    Printed,
    /// A new document was added to the set.
    Created,
    /// The rewrite was a no-op.
    Unchanged,
    /// The unit was skipped; the reason is user-facing.
    Skipped(String),
}

impl fmt::Display for DocumentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentOutcome::Written => write!(f, "written"),
            DocumentOutcome::Printed => write!(f, "printed"),
            DocumentOutcome::Created => write!(f, "created"),
            DocumentOutcome::Unchanged => write!(f, "unchanged"),
            DocumentOutcome::Skipped(reason) => write!(f, "skipped ({})", reason),
        }
    }
}

/// One line of a [`RunReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Type name or document name the outcome refers to.
    pub subject: String,
    /// The outcome.
    pub outcome: DocumentOutcome,
}

/// Per-unit outcomes of a pipeline run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Recorded outcomes.
    pub entries: Vec<ReportEntry>,
}

impl RunReport {
    /// Records an outcome.
    pub fn record(&mut self, subject: impl Into<String>, outcome: DocumentOutcome) {
        self.entries.push(ReportEntry {
            subject: subject.into(),
            outcome,
        });
    }

    /// The first outcome recorded for `subject`.
    pub fn outcome(&self, subject: &str) -> Option<&DocumentOutcome> {
        self.entries
            .iter()
            .find(|e| e.subject == subject)
            .map(|e| &e.outcome)
    }

    /// Number of skipped units.
    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, DocumentOutcome::Skipped(_)))
            .count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}: {}", entry.subject, entry.outcome)?;
        }
        Ok(())
    }
}
