//! The interactive matching loop.
//!
//! Each input line is matched against the loaded rule set and the record is
//! printed in the current layout. Lines starting with `:` are commands.

use std::io::{self, Write};

use cmdtree_engine::{MatchOutcome, Matcher, RecordLayout, verify};
use cmdtree_grammar::{Error, Result, RuleSet};

use crate::config::RuntimeConfig;
use crate::editor::{LineEditor, ReadResult, RustylineEditor};

const HELP: &str = "\
:help            Show this help
:rules           List rules in ranked order
:layout <name>   Switch output layout (tokens, nested, flat)
:raw on|off      Include the input line in records
:quit            Exit";

/// The interactive REPL.
pub struct Repl<'r, E: LineEditor = RustylineEditor> {
    editor: E,
    matcher: Matcher<'r>,
    layout: RecordLayout,
    include_raw: bool,
    prompt: String,
    show_banner: bool,
}

impl<'r> Repl<'r, RustylineEditor> {
    /// Creates a REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(rules: &'r RuleSet, config: &RuntimeConfig) -> Result<Self> {
        Ok(Self::with_editor(RustylineEditor::new()?, rules, config))
    }
}

impl<'r, E: LineEditor> Repl<'r, E> {
    /// Creates a REPL with the given editor.
    pub fn with_editor(mut editor: E, rules: &'r RuleSet, config: &RuntimeConfig) -> Self {
        editor.set_completions(completion_words(rules));
        Self {
            editor,
            matcher: Matcher::new(rules).with_comment_prefix(config.comment_prefix.clone()),
            layout: config.layout,
            include_raw: config.include_raw,
            prompt: "cmdtree> ".to_string(),
            show_banner: true,
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// The current output layout.
    #[must_use]
    pub fn layout(&self) -> RecordLayout {
        self.layout
    }

    /// Runs the loop until EOF or `:quit`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            println!(
                "cmdtree {}: {} rules loaded, :help for commands",
                env!("CARGO_PKG_VERSION"),
                self.matcher.rules().len()
            );
        }

        loop {
            let line = match self.editor.read_line(&self.prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => continue,
                ReadResult::Eof => break,
            };
            if line.trim().is_empty() {
                continue;
            }
            self.editor.add_history(&line);

            match self.eval(&line) {
                Ok(Some(output)) => println!("{output}"),
                Ok(None) => break,
                Err(e) => eprintln!("error: {e}"),
            }
            let _ = io::stdout().flush();
        }
        Ok(())
    }

    /// Handles one input line and returns the text to print.
    ///
    /// Returns `Ok(None)` when the user asked to quit.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown commands or bad command arguments.
    pub fn eval(&mut self, line: &str) -> Result<Option<String>> {
        let line = line.trim();
        if let Some(command) = line.strip_prefix(':') {
            return self.command(command);
        }

        let output = match self.matcher.match_line(line) {
            MatchOutcome::Matched(record) => {
                let value = self.layout.render(&record, self.include_raw);
                let mut text = serde_json::to_string_pretty(&value)
                    .map_err(|e| Error::serialization(e.to_string()))?;
                if !verify(&record, line) {
                    text.push_str("\n(warning: record does not reconstruct the input)");
                }
                text
            }
            MatchOutcome::Unmatched(_) => "no rule matches".to_string(),
        };
        Ok(Some(output))
    }

    fn command(&mut self, command: &str) -> Result<Option<String>> {
        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or("");
        let arg = parts.next();

        let output = match (name, arg) {
            ("q" | "quit" | "exit", _) => return Ok(None),
            ("help", _) => HELP.to_string(),
            ("rules", _) => self
                .matcher
                .rules()
                .iter()
                .map(|rule| format!("{:>3}  {}", rule.score(), rule.key()))
                .collect::<Vec<_>>()
                .join("\n"),
            ("layout", None) => self.layout.to_string(),
            ("layout", Some(name)) => {
                self.layout = name.parse().map_err(Error::config)?;
                format!("layout: {}", self.layout)
            }
            ("raw", Some("on")) => {
                self.include_raw = true;
                "raw: on".to_string()
            }
            ("raw", Some("off")) => {
                self.include_raw = false;
                "raw: off".to_string()
            }
            _ => return Err(Error::config(format!("unknown command ':{command}'"))),
        };
        Ok(Some(output))
    }
}

/// Verbs and objects of a rule set, deduplicated, for completion.
fn completion_words(rules: &RuleSet) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for rule in rules {
        for word in rule.verb().split_whitespace().chain(rule.object().split_whitespace()) {
            if !words.iter().any(|w| w == word) {
                words.push(word.to_string());
            }
        }
    }
    words
}
