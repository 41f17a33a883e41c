//! Template tokenization.
//!
//! Converts one template string such as `host <ip> [port <p>]` into an
//! ordered token stream. Optional block contents are re-tokenized with a
//! nested tokenizer whose spans stay relative to the whole template.

use crate::error::{Error, ErrorKind, Result};
use crate::token::{Span, Token, TokenKind, is_punctuation, is_wildcard};

/// Tokenizes a template string.
///
/// # Errors
///
/// Returns an error for unbalanced or stray delimiters, empty `<>`, `[]`
/// or alternations, and optional blocks nested inside optional blocks.
pub fn tokenize(template: &str) -> Result<Vec<Token>> {
    Tokenizer::new(template).tokenize()
}

/// Tokenizer for grammar templates.
pub struct Tokenizer<'src> {
    /// Text being tokenized.
    source: &'src str,
    /// Byte offset of `source` within the full template.
    base: usize,
    /// Whether we are inside an optional block.
    nested: bool,
}

impl<'src> Tokenizer<'src> {
    /// Creates a tokenizer for a whole template.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            base: 0,
            nested: false,
        }
    }

    fn inner(source: &'src str, base: usize) -> Self {
        Self {
            source,
            base,
            nested: true,
        }
    }

    /// Produces the token stream.
    ///
    /// # Errors
    ///
    /// See [`tokenize`].
    pub fn tokenize(&self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        // The first token is always separated from the verb/object prefix.
        let mut spaced = true;

        while let Some(c) = self.source[pos..].chars().next() {
            if c.is_whitespace() {
                pos += c.len_utf8();
                spaced = true;
                continue;
            }

            let (kind, end) = match c {
                '<' => self.scan_variable(pos)?,
                '{' => self.scan_choice(pos)?,
                '[' => self.scan_optional(pos)?,
                '>' | '}' | ']' => return Err(Error::unexpected_closer(c, self.base + pos)),
                c if is_punctuation(c) => (TokenKind::Punct(c), pos + c.len_utf8()),
                _ => self.scan_word(pos),
            };

            tokens.push(Token::new(
                kind,
                Span::new(self.base + pos, self.base + end),
                !spaced,
            ));
            spaced = false;
            pos = end;
        }

        Ok(tokens)
    }

    /// Scans `<...>` starting at the `<`.
    fn scan_variable(&self, start: usize) -> Result<(TokenKind, usize)> {
        let (inner, end) = self.delimited(start, '<', '>')?;
        let mut inner = inner.trim();

        let remainder = inner.ends_with("...");
        if remainder {
            inner = inner.trim_end_matches("...").trim_end();
        }

        let alternatives: Vec<String> = inner
            .split('|')
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .map(String::from)
            .collect();

        if alternatives.is_empty() {
            return Err(Error::new(ErrorKind::EmptyVariable {
                position: self.base + start,
            }));
        }

        Ok((
            TokenKind::Variable {
                alternatives,
                remainder,
            },
            end,
        ))
    }

    /// Scans `{a|b}` starting at the `{`.
    fn scan_choice(&self, start: usize) -> Result<(TokenKind, usize)> {
        let (inner, end) = self.delimited(start, '{', '}')?;
        let empty = || {
            Error::new(ErrorKind::EmptyAlternation {
                position: self.base + start,
            })
        };

        if inner.trim().is_empty() {
            return Err(empty());
        }

        let mut alternatives = Vec::new();
        for alt in inner.split('|') {
            let words: Vec<&str> = alt.split_whitespace().collect();
            if words.is_empty() {
                return Err(empty());
            }
            alternatives.push(words.join(" "));
        }

        Ok((TokenKind::Choice(alternatives), end))
    }

    /// Scans `[...]` starting at the `[` and re-tokenizes its contents.
    fn scan_optional(&self, start: usize) -> Result<(TokenKind, usize)> {
        if self.nested {
            return Err(Error::new(ErrorKind::NestedOptional {
                position: self.base + start,
            }));
        }

        let body_start = start + 1;
        let mut close = None;
        for (offset, c) in self.source[body_start..].char_indices() {
            match c {
                '[' => {
                    return Err(Error::new(ErrorKind::NestedOptional {
                        position: self.base + body_start + offset,
                    }));
                }
                ']' => {
                    close = Some(body_start + offset);
                    break;
                }
                _ => {}
            }
        }

        let Some(close) = close else {
            return Err(Error::unbalanced('[', self.base + start));
        };

        let body = &self.source[body_start..close];
        let inner = Tokenizer::inner(body, self.base + body_start).tokenize()?;
        if inner.is_empty() {
            return Err(Error::new(ErrorKind::EmptyOptional {
                position: self.base + start,
            }));
        }

        Ok((TokenKind::Optional(inner), close + 1))
    }

    /// Scans a bare word; wildcard markers become [`TokenKind::Wildcard`].
    fn scan_word(&self, start: usize) -> (TokenKind, usize) {
        let rest = &self.source[start..];
        let len = rest
            .find(|c: char| c.is_whitespace() || is_delimiter(c) || is_punctuation(c))
            .unwrap_or(rest.len());
        let word = &rest[..len];

        let kind = if is_wildcard(word) {
            TokenKind::Wildcard
        } else {
            TokenKind::Literal(word.to_string())
        };
        (kind, start + len)
    }

    /// Returns the text between `open` at `start` and the next `close`.
    ///
    /// A second `open` before the closer counts as unbalanced.
    fn delimited(&self, start: usize, open: char, close: char) -> Result<(&'src str, usize)> {
        let body_start = start + open.len_utf8();
        let rest = &self.source[body_start..];
        match rest.find([open, close]) {
            Some(i) if rest[i..].starts_with(close) => {
                Ok((&rest[..i], body_start + i + close.len_utf8()))
            }
            _ => Err(Error::unbalanced(open, self.base + start)),
        }
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '<' | '>' | '{' | '}' | '[' | ']')
}
