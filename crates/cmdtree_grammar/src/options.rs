//! Compilation options.

/// Controls how grammar rows are compiled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Whether patterns ignore case.
    pub case_insensitive: bool,

    /// Characters separating verb aliases in a row's verb field.
    pub alias_separators: Vec<char>,

    /// Verbs that never produce rules.
    pub skip_verbs: Vec<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            alias_separators: vec!['/', '|', ','],
            skip_verbs: Vec::new(),
        }
    }
}

impl CompileOptions {
    /// Builder method to set case sensitivity.
    #[must_use]
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Builder method to set the alias separators.
    #[must_use]
    pub fn with_alias_separators(mut self, separators: impl IntoIterator<Item = char>) -> Self {
        self.alias_separators = separators.into_iter().collect();
        self
    }

    /// Builder method to add a verb that is skipped during expansion.
    #[must_use]
    pub fn with_skip_verb(mut self, verb: impl Into<String>) -> Self {
        self.skip_verbs.push(verb.into());
        self
    }

    /// Returns true if `verb` is on the skip list.
    #[must_use]
    pub fn skips(&self, verb: &str) -> bool {
        self.skip_verbs.iter().any(|v| v.eq_ignore_ascii_case(verb))
    }
}
