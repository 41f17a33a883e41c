//! Token types for the template tokenizer.

/// Standalone words that stand for "the rest of the line".
pub const WILDCARD_MARKERS: [&str; 2] = ["...", "*"];

/// Characters that always form their own token, even when glued to a word.
pub const PUNCTUATION: [char; 2] = [',', '~'];

/// Returns true if `word` is a wildcard marker.
#[must_use]
pub fn is_wildcard(word: &str) -> bool {
    WILDCARD_MARKERS.contains(&word)
}

/// Returns true if `c` is a punctuation token character.
#[must_use]
pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

/// A byte range within a template string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset where this span starts.
    pub start: usize,
    /// Byte offset where this span ends (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of this span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The kind of a template token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// A fixed keyword matched verbatim.
    Literal(String),
    /// `<name>`, `<a|b>` or `<name...>`.
    Variable {
        /// Spellings listed inside the brackets; the first one names the slot.
        alternatives: Vec<String>,
        /// `<name...>` consumes the rest of the line.
        remainder: bool,
    },
    /// `{a|b|c}`.
    Choice(Vec<String>),
    /// `[ ... ]` with its re-tokenized contents.
    Optional(Vec<Token>),
    /// `...` or `*` as a standalone word.
    Wildcard,
    /// A punctuation character such as `,`.
    Punct(char),
}

/// A token with its location in the template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// What was recognized.
    pub kind: TokenKind,
    /// Where it was recognized.
    pub span: Span,
    /// No whitespace separates this token from the previous one.
    pub joined: bool,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span, joined: bool) -> Self {
        Self { kind, span, joined }
    }

    /// Returns true if this token is a fixed keyword or punctuation.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self.kind, TokenKind::Literal(_) | TokenKind::Punct(_))
    }
}
