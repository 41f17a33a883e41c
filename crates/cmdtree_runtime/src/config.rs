//! Runtime configuration.
//!
//! Defaults can be overridden from a TOML file:
//!
//! ```toml
//! case_insensitive = true
//! alias_separators = "/|,"
//! skip_verbs = ["show"]
//! layout = "nested"
//! include_raw = true
//! comment_prefix = "##"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use cmdtree_engine::{DEFAULT_COMMENT_PREFIX, RecordLayout};
use cmdtree_grammar::{CompileOptions, Error, Result};

/// Settings shared by every command of the runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Whether rule patterns ignore case.
    pub case_insensitive: bool,

    /// Characters separating verb aliases, e.g. `"/|,"`.
    pub alias_separators: String,

    /// Verbs that never produce rules.
    pub skip_verbs: Vec<String>,

    /// Record layout for output.
    pub layout: RecordLayout,

    /// Whether output records carry the input line.
    pub include_raw: bool,

    /// Prefix of comment lines skipped in batch input.
    pub comment_prefix: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let options = CompileOptions::default();
        Self {
            case_insensitive: options.case_insensitive,
            alias_separators: options.alias_separators.iter().collect(),
            skip_verbs: options.skip_verbs,
            layout: RecordLayout::default(),
            include_raw: true,
            comment_prefix: DEFAULT_COMMENT_PREFIX.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set case sensitivity.
    #[must_use]
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Builder method to set the alias separators.
    #[must_use]
    pub fn with_alias_separators(mut self, separators: impl Into<String>) -> Self {
        self.alias_separators = separators.into();
        self
    }

    /// Builder method to add a skipped verb.
    #[must_use]
    pub fn with_skip_verb(mut self, verb: impl Into<String>) -> Self {
        self.skip_verbs.push(verb.into());
        self
    }

    /// Builder method to set the output layout.
    #[must_use]
    pub fn with_layout(mut self, layout: RecordLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Builder method to include or omit the raw line in records.
    #[must_use]
    pub fn with_include_raw(mut self, include_raw: bool) -> Self {
        self.include_raw = include_raw;
        self
    }

    /// Builder method to set the comment prefix.
    #[must_use]
    pub fn with_comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// Parses a configuration from TOML text.
    ///
    /// Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("failed to read '{}': {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| Error::config(format!("'{}': {e}", path.display())))
    }

    /// Options for the grammar compiler.
    #[must_use]
    pub fn compile_options(&self) -> CompileOptions {
        let options = CompileOptions::default()
            .with_case_insensitive(self.case_insensitive)
            .with_alias_separators(self.alias_separators.chars());
        self.skip_verbs
            .iter()
            .fold(options, |options, verb| options.with_skip_verb(verb.clone()))
    }
}
