//! Grammar rows, continuation carry-over and verb alias expansion.

use serde::{Deserialize, Serialize};

use crate::compiler::CompiledTemplate;
use crate::error::{Error, ErrorContext, ErrorKind, Result};
use crate::options::CompileOptions;
use crate::rule::{GrammarRule, RuleKey};

/// One raw row of a grammar table.
///
/// Blank `verb` or `object` cells continue the previous row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarRow {
    /// Verb field, possibly listing aliases such as `bind/unbind`.
    #[serde(default)]
    pub verb: String,
    /// Object field.
    #[serde(default)]
    pub object: String,
    /// Parameter template.
    #[serde(default)]
    pub template: String,
    /// Line in the source table, when read from one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl GrammarRow {
    /// Creates a row with all three fields.
    #[must_use]
    pub fn new(
        verb: impl Into<String>,
        object: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            verb: verb.into(),
            object: object.into(),
            template: template.into(),
            line: None,
        }
    }

    /// Records the source table line this row came from.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// The number diagnostics use for this row: its table line if known,
    /// otherwise `index`.
    #[must_use]
    pub fn number(&self, index: usize) -> usize {
        self.line.unwrap_or(index)
    }

    /// Creates a continuation row that inherits verb and object.
    #[must_use]
    pub fn continuation(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Self::default()
        }
    }
}

/// A row with verb and object filled in from the carry state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRow {
    /// 1-based row number in the table.
    pub row: usize,
    /// Verb field (still unsplit).
    pub verb_field: String,
    /// Object label.
    pub object: String,
    /// Trimmed template.
    pub template: String,
}

impl ResolvedRow {
    /// Error context describing this row.
    #[must_use]
    pub fn context(&self) -> ErrorContext {
        ErrorContext::new()
            .with_row(self.row)
            .with_verb(&self.verb_field)
            .with_object(&self.object)
            .with_template(&self.template)
    }
}

/// Verb and object carried from one row to the next.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowCarry {
    verb: Option<String>,
    object: Option<String>,
}

impl RowCarry {
    /// Resolves `row` against the carried state and updates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the row has a blank verb or object and nothing
    /// has been carried yet.
    pub fn resolve(&mut self, number: usize, row: &GrammarRow) -> Result<ResolvedRow> {
        let verb = row.verb.trim();
        if !verb.is_empty() {
            self.verb = Some(verb.to_string());
        }
        let object = row.object.trim();
        if !object.is_empty() {
            self.object = Some(object.to_string());
        }

        let context = || {
            ErrorContext::new()
                .with_row(number)
                .with_template(row.template.trim())
        };
        let verb_field = self
            .verb
            .clone()
            .ok_or_else(|| Error::new(ErrorKind::MissingVerb).with_context(context()))?;
        let object = self
            .object
            .clone()
            .ok_or_else(|| Error::new(ErrorKind::MissingObject).with_context(context()))?;

        Ok(ResolvedRow {
            row: number,
            verb_field,
            object,
            template: row.template.trim().to_string(),
        })
    }
}

/// Resolves continuation rows by folding a [`RowCarry`] over the table.
///
/// Returns one result per input row, numbered by source line when the row
/// carries one and from 1 otherwise.
#[must_use]
pub fn resolve_rows(rows: &[GrammarRow]) -> Vec<Result<ResolvedRow>> {
    rows.iter()
        .enumerate()
        .scan(RowCarry::default(), |carry, (i, row)| {
            Some(carry.resolve(row.number(i + 1), row))
        })
        .collect()
}

/// Splits a verb field into aliases.
///
/// Pieces are trimmed; empty pieces and repeats are dropped.
#[must_use]
pub fn split_aliases(field: &str, separators: &[char]) -> Vec<String> {
    let mut aliases: Vec<String> = Vec::new();
    for piece in field.split(|c| separators.contains(&c)) {
        let alias = piece.trim();
        if !alias.is_empty() && !aliases.iter().any(|a| a == alias) {
            aliases.push(alias.to_string());
        }
    }
    aliases
}

/// Expands one resolved row into one rule per verb alias.
pub struct VerbExpander<'o> {
    options: &'o CompileOptions,
}

impl<'o> VerbExpander<'o> {
    /// Creates an expander using the given options.
    #[must_use]
    pub fn new(options: &'o CompileOptions) -> Self {
        Self { options }
    }

    /// The aliases of a verb field, minus skipped verbs.
    #[must_use]
    pub fn aliases(&self, verb_field: &str) -> Vec<String> {
        split_aliases(verb_field, &self.options.alias_separators)
            .into_iter()
            .filter(|verb| !self.options.skips(verb))
            .collect()
    }

    /// Builds one rule per alias, all sharing the compiled slot structure.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule pattern cannot be built.
    pub fn expand(&self, row: &ResolvedRow, compiled: &CompiledTemplate) -> Result<Vec<GrammarRule>> {
        self.aliases(&row.verb_field)
            .into_iter()
            .map(|verb| {
                let key = RuleKey::new(verb, row.object.clone(), row.template.clone());
                GrammarRule::new(key, compiled.clone(), self.options.case_insensitive)
                    .map_err(|e| e.with_context(row.context()))
            })
            .collect()
    }
}
