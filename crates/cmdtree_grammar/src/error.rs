//! Error types for the cmdtree system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for cmdtree operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about which grammar row produced the error.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an unbalanced delimiter error.
    #[must_use]
    pub fn unbalanced(open: char, position: usize) -> Self {
        Self::new(ErrorKind::UnbalancedDelimiter { open, position })
    }

    /// Creates an unexpected closing delimiter error.
    #[must_use]
    pub fn unexpected_closer(close: char, position: usize) -> Self {
        Self::new(ErrorKind::UnexpectedCloser { close, position })
    }

    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPattern(message.into()))
    }

    /// Creates a descriptor mismatch error.
    #[must_use]
    pub fn descriptor_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DescriptorMismatch(message.into()))
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IoError(message.into()))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SerializationError(message.into()))
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigError(message.into()))
    }

    /// Returns true if this error came from template tokenizing or compiling.
    #[must_use]
    pub fn is_template_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UnbalancedDelimiter { .. }
                | ErrorKind::UnexpectedCloser { .. }
                | ErrorKind::EmptyVariable { .. }
                | ErrorKind::EmptyOptional { .. }
                | ErrorKind::EmptyAlternation { .. }
                | ErrorKind::NestedOptional { .. }
                | ErrorKind::InvalidPattern(_)
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// An opening delimiter was never closed.
    #[error("unbalanced '{open}' opened at byte {position}")]
    UnbalancedDelimiter {
        /// The opening delimiter.
        open: char,
        /// Byte offset of the opener in the template.
        position: usize,
    },

    /// A closing delimiter appeared without an opener.
    #[error("unexpected '{close}' at byte {position}")]
    UnexpectedCloser {
        /// The closing delimiter.
        close: char,
        /// Byte offset in the template.
        position: usize,
    },

    /// `<>` with nothing inside.
    #[error("empty variable at byte {position}")]
    EmptyVariable {
        /// Byte offset of the opener.
        position: usize,
    },

    /// `[]` with nothing inside.
    #[error("empty optional block at byte {position}")]
    EmptyOptional {
        /// Byte offset of the opener.
        position: usize,
    },

    /// `{}` or a choice with an empty alternative such as `{a||b}`.
    #[error("empty alternation at byte {position}")]
    EmptyAlternation {
        /// Byte offset of the opener.
        position: usize,
    },

    /// An optional block inside another optional block.
    #[error("nested optional block at byte {position} (only one level is supported)")]
    NestedOptional {
        /// Byte offset of the inner opener.
        position: usize,
    },

    /// A grammar row had no verb and none could be inherited.
    #[error("row has no verb and no previous row to inherit one from")]
    MissingVerb,

    /// A grammar row had no object and none could be inherited.
    #[error("row has no object and no previous row to inherit one from")]
    MissingObject,

    /// The generated pattern was rejected by the regex engine.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// A persisted rule descriptor is missing fields or is inconsistent.
    #[error("rule descriptor mismatch: {0}")]
    DescriptorMismatch(String),

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    IoError(String),

    /// Encoding or decoding a persisted artifact failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// A configuration file was malformed.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Context about which grammar row an error belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// 1-based row number in the grammar table.
    pub row: Option<usize>,
    /// Verb field of the row.
    pub verb: Option<String>,
    /// Object field of the row.
    pub object: Option<String>,
    /// Template text of the row.
    pub template: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row number.
    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Sets the verb.
    #[must_use]
    pub fn with_verb(mut self, verb: impl Into<String>) -> Self {
        self.verb = Some(verb.into());
        self
    }

    /// Sets the object.
    #[must_use]
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Sets the template text.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(row) = self.row {
            write!(f, "row {row}")?;
        }
        if let (Some(verb), Some(object)) = (&self.verb, &self.object) {
            if self.row.is_some() {
                write!(f, " ")?;
            }
            write!(f, "({verb} {object})")?;
        }
        if let Some(template) = &self.template {
            write!(f, ": {template:?}")?;
        }
        Ok(())
    }
}
