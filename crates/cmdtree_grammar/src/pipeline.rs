//! Rows-to-rule-set compilation pipeline.
//!
//! ```text
//! rows ─▶ carry fold ─▶ tokenize ─▶ compile ─▶ anchor ─▶ expand aliases ─▶ rank ─▶ RuleSet
//! ```
//!
//! The anchor is resolved once per row, before alias expansion, because all
//! aliases share the same slot structure.

use tracing::{debug, warn};

use crate::anchor::{AnchorOutcome, AnchorResolver};
use crate::compiler::TemplateCompiler;
use crate::diagnostic::Diagnostic;
use crate::error::Result;
use crate::expander::{GrammarRow, ResolvedRow, VerbExpander, resolve_rows};
use crate::options::CompileOptions;
use crate::rule::GrammarRule;
use crate::ruleset::RuleSet;

/// The outcome of compiling a grammar table.
#[derive(Debug)]
pub struct Compilation {
    /// The ranked rule set built from every row that compiled.
    pub rules: RuleSet,
    /// Skipped rows and caveats.
    pub diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    /// Returns true if any row was dropped.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Compiles grammar rows into a [`RuleSet`].
#[derive(Clone, Debug, Default)]
pub struct GrammarCompiler {
    options: CompileOptions,
}

impl GrammarCompiler {
    /// Creates a compiler with the given options.
    #[must_use]
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compiles every row; bad rows are reported and skipped.
    #[must_use]
    pub fn compile_rows(&self, rows: &[GrammarRow]) -> Compilation {
        let mut rules = Vec::new();
        let mut diagnostics = Vec::new();

        for (i, (source, resolved)) in rows.iter().zip(resolve_rows(rows)).enumerate() {
            let row = match resolved {
                Ok(row) => row,
                Err(e) => {
                    let number = source.number(i + 1);
                    warn!(row = number, error = %e, "skipping grammar row");
                    diagnostics.push(Diagnostic::row_error(number, &e));
                    continue;
                }
            };

            match self.compile_row(&row) {
                Ok((row_rules, outcome)) => {
                    if outcome == AnchorOutcome::Unanchored && !row_rules.is_empty() {
                        debug!(row = row.row, template = %row.template, "template has no anchor");
                        diagnostics.push(Diagnostic::ambiguous_anchor(row.row, &row.template));
                    }
                    rules.extend(row_rules);
                }
                Err(e) => {
                    warn!(row = row.row, error = %e, "skipping grammar row");
                    diagnostics.push(Diagnostic::row_error(row.row, &e));
                }
            }
        }

        let rules = RuleSet::new(rules, self.options.case_insensitive);
        debug!(rules = rules.len(), diagnostics = diagnostics.len(), "compiled rule set");
        Compilation { rules, diagnostics }
    }

    /// Compiles one resolved row into its alias rules.
    ///
    /// # Errors
    ///
    /// Returns a template error carrying the row's context.
    pub fn compile_row(&self, row: &ResolvedRow) -> Result<(Vec<GrammarRule>, AnchorOutcome)> {
        let mut compiled =
            TemplateCompiler::compile(&row.template).map_err(|e| e.with_context(row.context()))?;
        let outcome = AnchorResolver::resolve(&mut compiled.slots);
        let rules = VerbExpander::new(&self.options).expand(row, &compiled)?;

        for rule in &rules {
            debug!(
                row = row.row,
                rule = %rule.key(),
                score = rule.score(),
                slots = rule.slots().len(),
                "compiled rule"
            );
        }
        Ok((rules, outcome))
    }
}
