//! Structured diagnostics for compile-time and match-time problems.
//!
//! Nothing reported here aborts a batch: rows are skipped, rules are
//! excluded and lines are left unmatched, and each event becomes one
//! [`Diagnostic`] keyed by row, line or rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::rule::RuleKey;

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Processing continued with a caveat.
    Warning,
    /// A row, rule or line was dropped.
    Error,
}

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// A row had no verb or object to inherit.
    InvalidRow,
    /// A template could not be compiled; the row was skipped.
    TemplateCompileError,
    /// A template has no mandatory literal to anchor on.
    AmbiguousAnchorWarning,
    /// A persisted rule descriptor was missing or corrupt; the rule was excluded.
    RuleMetadataMismatch,
    /// An input line matched no rule.
    Unmatched,
}

/// Where it happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "at", rename_all = "lowercase")]
pub enum Location {
    /// Grammar row: the table line when known, else the 1-based row index.
    Row {
        /// Row number.
        row: usize,
    },
    /// 1-based input line.
    Line {
        /// Line number.
        line: usize,
    },
    /// A persisted rule.
    Rule {
        /// The rule key.
        rule: RuleKey,
    },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row { row } => write!(f, "row {row}"),
            Self::Line { line } => write!(f, "line {line}"),
            Self::Rule { rule } => write!(f, "rule '{rule}'"),
        }
    }
}

/// One reported event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// How serious it is.
    pub severity: Severity,
    /// What happened.
    pub code: DiagnosticCode,
    /// Where it happened.
    pub location: Location,
    /// Human-readable detail.
    pub message: String,
}

impl Diagnostic {
    /// A row that could not be resolved or compiled.
    #[must_use]
    pub fn row_error(row: usize, error: &Error) -> Self {
        let code = if error.is_template_error() {
            DiagnosticCode::TemplateCompileError
        } else {
            DiagnosticCode::InvalidRow
        };
        let message = match &error.context {
            Some(context) => format!("{error} [{context}]"),
            None => error.to_string(),
        };
        Self {
            severity: Severity::Error,
            code,
            location: Location::Row { row },
            message,
        }
    }

    /// A row whose template has nothing to anchor on.
    #[must_use]
    pub fn ambiguous_anchor(row: usize, template: &str) -> Self {
        Self {
            severity: Severity::Warning,
            code: DiagnosticCode::AmbiguousAnchorWarning,
            location: Location::Row { row },
            message: format!("template {template:?} has no mandatory literal to anchor on"),
        }
    }

    /// A persisted rule that was excluded.
    #[must_use]
    pub fn metadata_mismatch(rule: RuleKey, error: &Error) -> Self {
        Self {
            severity: Severity::Warning,
            code: DiagnosticCode::RuleMetadataMismatch,
            location: Location::Rule { rule },
            message: error.to_string(),
        }
    }

    /// An input line that matched no rule.
    #[must_use]
    pub fn unmatched(line: usize, raw: &str) -> Self {
        Self {
            severity: Severity::Warning,
            code: DiagnosticCode::Unmatched,
            location: Location::Line { line },
            message: format!("no rule matches {raw:?}"),
        }
    }

    /// Returns true for error severity.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{severity}: {}: {}", self.location, self.message)
    }
}
