//! Finding and report types for the board audit.

use std::fmt;

use serde::Serialize;

use crate::adjacency::{Direction, Scope};
use crate::layout::CellId;

/// Severity of an audit finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The board violates a structural invariant.
    Error,
    /// Unusual but printable (oversized cell, overlapping keys).
    Warning,
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// One side of a cell in one adjacency scope. `section` is set for local scope.
    Slot {
        #[serde(skip)]
        cell: CellId,
        direction: Direction,
        scope: Scope,
        section: Option<usize>,
    },
    Cell {
        #[serde(skip)]
        cell: CellId,
    },
    Section {
        index: usize,
    },
}

/// Enumeration of all audit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AuditCode {
    /// A slot was left unresolved after the resolver finished.
    MissingSlot,
    /// A linked neighbor does not link back.
    AsymmetricLink,
    /// A link and its mirror disagree on the gap or the perpendicular offset.
    OffsetMismatch,
    /// A cell belongs to no section.
    UncoveredCell,
    /// A cell belongs to more than one section.
    DuplicateCell,
    /// A section is wider than the build envelope.
    SectionOverBudget,
    /// Two cell footprints overlap.
    OverlappingCells,
}

impl fmt::Display for AuditCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single audit finding.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub subject: Subject,
    pub code: AuditCode,
    pub message: String,
    pub severity: Severity,
    /// Measured value, e.g. a section width in millimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
    /// The limit that was exceeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
}

impl Finding {
    pub(crate) fn error(subject: Subject, code: AuditCode, message: impl Into<String>) -> Self {
        Self {
            subject,
            code,
            message: message.into(),
            severity: Severity::Error,
            numeric_value: None,
            limit: None,
        }
    }

    pub(crate) fn warning(subject: Subject, code: AuditCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(subject, code, message)
        }
    }

    pub(crate) fn measured(mut self, value: f64, limit: f64) -> Self {
        self.numeric_value = Some(value);
        self.limit = Some(limit);
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };
        write!(f, "[{}] {:?}: {} (code: {})", sev, self.subject, self.message, self.code)?;
        if let Some(val) = self.numeric_value {
            write!(f, " value={val:.3}")?;
        }
        if let Some(limit) = self.limit {
            write!(f, " limit={limit:.3}")?;
        }
        Ok(())
    }
}

/// Counts gathered while auditing.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AuditCounts {
    pub cells: usize,
    pub sections: usize,
    /// Linked slots in the global table, counted once per side.
    pub global_links: usize,
    pub open_slots: usize,
}

/// The outcome of [`audit`](super::audit).
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// True when there are no errors. Warnings do not invalidate a board.
    pub valid: bool,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub counts: AuditCounts,
}

impl AuditReport {
    /// Filter errors by a specific code.
    pub fn errors_of(&self, code: AuditCode) -> Vec<&Finding> {
        self.errors.iter().filter(|e| e.code == code).collect()
    }

    pub fn warnings_of(&self, code: AuditCode) -> Vec<&Finding> {
        self.warnings.iter().filter(|w| w.code == code).collect()
    }

    pub fn no_errors_of(&self, code: AuditCode) -> bool {
        !self.errors.iter().any(|e| e.code == code)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Errors then warnings.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> + '_ {
        self.errors.iter().chain(&self.warnings)
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "AuditReport: valid={}, cells={}, sections={}, errors={}, warnings={}",
            self.valid,
            self.counts.cells,
            self.counts.sections,
            self.errors.len(),
            self.warnings.len()
        )?;
        for e in self.findings() {
            writeln!(f, "  {e}")?;
        }
        Ok(())
    }
}
