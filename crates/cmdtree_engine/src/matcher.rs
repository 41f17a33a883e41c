//! Line matching against a ranked rule set.
//!
//! The matcher holds no per-line state: matching a line is a pure function
//! of the rule set and the line, so one matcher can serve any number of
//! lines in any order.

use tracing::{debug, trace, warn};

use cmdtree_grammar::{Diagnostic, RuleSet};

use crate::record::{MatchRecord, RecordBuilder};

/// Default prefix of comment lines skipped in batch mode.
pub const DEFAULT_COMMENT_PREFIX: &str = "##";

/// A line no rule accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unmatched {
    /// The input line as given.
    pub raw: String,
}

/// The result of matching one line.
#[derive(Clone, Debug)]
pub enum MatchOutcome<'r> {
    /// A rule matched.
    Matched(MatchRecord<'r>),
    /// No rule matched.
    Unmatched(Unmatched),
}

impl<'r> MatchOutcome<'r> {
    /// Returns the record if the line matched.
    #[must_use]
    pub fn record(&self) -> Option<&MatchRecord<'r>> {
        match self {
            Self::Matched(record) => Some(record),
            Self::Unmatched(_) => None,
        }
    }

    /// Consumes the outcome and returns the record if the line matched.
    #[must_use]
    pub fn into_record(self) -> Option<MatchRecord<'r>> {
        match self {
            Self::Matched(record) => Some(record),
            Self::Unmatched(_) => None,
        }
    }

    /// Returns true if a rule matched.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// The outcome for one numbered input line.
#[derive(Clone, Debug)]
pub struct LineOutcome<'r> {
    /// 1-based line number in the input.
    pub line: usize,
    /// What happened.
    pub outcome: MatchOutcome<'r>,
}

/// The result of matching many lines.
#[derive(Clone, Debug, Default)]
pub struct BatchReport<'r> {
    /// Outcomes of the lines that were not skipped, in input order.
    pub lines: Vec<LineOutcome<'r>>,
    /// One diagnostic per unmatched line.
    pub diagnostics: Vec<Diagnostic>,
}

impl<'r> BatchReport<'r> {
    /// Records of the matched lines, in input order.
    pub fn records(&self) -> impl Iterator<Item = &MatchRecord<'r>> {
        self.lines.iter().filter_map(|l| l.outcome.record())
    }

    /// Number of lines that were considered.
    #[must_use]
    pub fn considered(&self) -> usize {
        self.lines.len()
    }

    /// Number of matched lines.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.lines.iter().filter(|l| l.outcome.is_matched()).count()
    }

    /// Number of unmatched lines.
    #[must_use]
    pub fn unmatched(&self) -> usize {
        self.considered() - self.matched()
    }
}

/// Matches lines against a [`RuleSet`].
#[derive(Clone, Debug)]
pub struct Matcher<'r> {
    rules: &'r RuleSet,
    comment_prefix: String,
}

impl<'r> Matcher<'r> {
    /// Creates a matcher over `rules`.
    #[must_use]
    pub fn new(rules: &'r RuleSet) -> Self {
        Self {
            rules,
            comment_prefix: DEFAULT_COMMENT_PREFIX.to_string(),
        }
    }

    /// Sets the prefix that marks comment lines in batch mode.
    ///
    /// An empty prefix disables comment skipping.
    #[must_use]
    pub fn with_comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// The rule set being matched against.
    #[must_use]
    pub fn rules(&self) -> &'r RuleSet {
        self.rules
    }

    /// Matches one line.
    ///
    /// Rules are tried in ranked order; the first whose pattern consumes the
    /// whole line and whose captures validate wins.
    #[must_use]
    pub fn match_line(&self, line: &str) -> MatchOutcome<'r> {
        let text = line.trim();
        for rule in self.rules.candidates(text) {
            let Some(captures) = rule.pattern().captures(text) else {
                continue;
            };
            match RecordBuilder::build(rule, &captures, line) {
                Some(record) => {
                    debug!(rule = %rule.key(), score = rule.score(), "matched line");
                    return MatchOutcome::Matched(record);
                }
                None => trace!(rule = %rule.key(), "captures rejected"),
            }
        }

        debug!(line = %text, "no rule matches");
        MatchOutcome::Unmatched(Unmatched {
            raw: line.to_string(),
        })
    }

    /// Returns true if `line` would be skipped in batch mode.
    #[must_use]
    pub fn is_skipped(&self, line: &str) -> bool {
        let text = line.trim();
        text.is_empty() || (!self.comment_prefix.is_empty() && text.starts_with(&self.comment_prefix))
    }

    /// Matches many lines, skipping blank and comment lines.
    ///
    /// Unmatched lines are reported as diagnostics; nothing here is fatal.
    pub fn match_lines<I, S>(&self, lines: I) -> BatchReport<'r>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = BatchReport::default();
        for (i, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if self.is_skipped(line) {
                continue;
            }
            let outcome = self.match_line(line);
            if let MatchOutcome::Unmatched(unmatched) = &outcome {
                warn!(line = i + 1, raw = %unmatched.raw.trim(), "unmatched line");
                report
                    .diagnostics
                    .push(Diagnostic::unmatched(i + 1, unmatched.raw.trim()));
            }
            report.lines.push(LineOutcome { line: i + 1, outcome });
        }
        report
    }
}
