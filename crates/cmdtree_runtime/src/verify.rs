//! Verification of batch output against its input log.
//!
//! Every non-blank, non-comment log line should have produced one
//! tokens-layout record, and every record should reconstruct its own raw
//! line.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::warn;

use cmdtree_engine::SerializedRecord;
use cmdtree_engine::roundtrip::{lines_agree, normalize_space, reconstruct_serialized};
use cmdtree_grammar::{Error, Result};

/// A record whose reconstruction differs from its raw line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// 1-based position of the record among the output objects.
    pub object: usize,
    /// The normalized raw line.
    pub raw: String,
    /// The normalized reconstruction.
    pub reassembled: String,
}

/// The outcome of comparing a log with its JSON-lines output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Log lines that should have produced a record.
    pub valid_lines: usize,
    /// Non-blank lines in the output.
    pub objects: usize,
    /// Output line numbers that were not valid records.
    pub invalid: Vec<usize>,
    /// Output line numbers of records without a raw line.
    pub missing_raw: Vec<usize>,
    /// Records that did not reconstruct.
    pub mismatches: Vec<Mismatch>,
}

impl VerificationReport {
    /// Counts the lines of `log` that are neither blank nor comments.
    #[must_use]
    pub fn count_valid_lines(log: &str, comment_prefix: &str) -> usize {
        log.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .filter(|l| comment_prefix.is_empty() || !l.starts_with(comment_prefix))
            .count()
    }

    /// Compares log text with JSON-lines output text.
    #[must_use]
    pub fn check(log: &str, output: &str, comment_prefix: &str, case_insensitive: bool) -> Self {
        let mut report = Self {
            valid_lines: Self::count_valid_lines(log, comment_prefix),
            ..Self::default()
        };

        for (i, line) in output.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            report.objects += 1;

            let record: SerializedRecord = match serde_json::from_str(line) {
                Ok(record) => record,
                Err(e) => {
                    warn!(line = i + 1, error = %e, "skipping invalid record");
                    report.invalid.push(i + 1);
                    continue;
                }
            };
            let Some(raw) = record.raw.as_deref() else {
                warn!(line = i + 1, "record has no raw line");
                report.missing_raw.push(i + 1);
                continue;
            };

            let reassembled = reconstruct_serialized(&record);
            if !lines_agree(raw, &reassembled, case_insensitive) {
                report.mismatches.push(Mismatch {
                    object: report.objects,
                    raw: normalize_space(raw),
                    reassembled,
                });
            }
        }
        report
    }

    /// Compares a log file with a JSON-lines file.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        log: P,
        output: Q,
        comment_prefix: &str,
        case_insensitive: bool,
    ) -> Result<Self> {
        let read = |path: &Path| {
            fs::read_to_string(path)
                .map_err(|e| Error::io(format!("failed to read '{}': {e}", path.display())))
        };
        let log = read(log.as_ref())?;
        let output = read(output.as_ref())?;
        Ok(Self::check(&log, &output, comment_prefix, case_insensitive))
    }

    /// Returns true if counts agree and every record reconstructs.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.mismatches.is_empty() && self.valid_lines == self.objects
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.mismatches {
            writeln!(f, "mismatch in object #{}:", m.object)?;
            writeln!(f, "  raw        : {}", m.raw)?;
            writeln!(f, "  reassembled: {}", m.reassembled)?;
        }
        writeln!(f, "valid command lines : {}", self.valid_lines)?;
        writeln!(f, "output objects      : {}", self.objects)?;
        writeln!(f, "invalid objects     : {}", self.invalid.len())?;
        writeln!(f, "objects without raw : {}", self.missing_raw.len())?;
        writeln!(f, "mismatched commands : {}", self.mismatches.len())?;
        if self.is_success() {
            write!(f, "verification successful")
        } else {
            write!(f, "verification failed")
        }
    }
}
