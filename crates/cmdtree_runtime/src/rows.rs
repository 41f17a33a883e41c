//! Grammar tables stored as CSV or TSV.
//!
//! The header row must name `verb`, `object` and `template` columns (any
//! order, any case); other columns such as a category are ignored. Tables
//! exported from spreadsheets carry annotation rows between the templates.
//! Blank verb and object cells are filled downward first, from every row
//! including notes, and only then are rows filtered:
//!
//! - a verb that does not start with an ASCII letter marks a note row
//! - a template containing CJK text is a description, not a template
//! - a blank template only sets verb/object for the rows after it
//!
//! Emitted rows are complete and carry their table line.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use cmdtree_grammar::{Error, GrammarRow, Result};

/// Reads grammar rows from delimited text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableReader {
    delimiter: u8,
}

impl Default for TableReader {
    fn default() -> Self {
        Self::csv()
    }
}

impl TableReader {
    /// Comma-separated input.
    #[must_use]
    pub const fn csv() -> Self {
        Self { delimiter: b',' }
    }

    /// Tab-separated input.
    #[must_use]
    pub const fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }

    /// Picks the delimiter from a file extension (`.tsv`/`.tab` are tabs).
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab") => {
                Self::tsv()
            }
            _ => Self::csv(),
        }
    }

    /// Reads and filters rows from `input`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid delimited text or the
    /// header lacks a required column.
    pub fn read<R: Read>(&self, input: R) -> Result<Vec<GrammarRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| Error::serialization(format!("failed to read table header: {e}")))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::serialization(format!("table header has no '{name}' column")))
        };
        let (verb, object, template) = (column("verb")?, column("object")?, column("template")?);

        let mut rows = Vec::new();
        let mut fill = FillDown::default();
        for (i, record) in reader.records().enumerate() {
            let line = i + 2;
            let record = record
                .map_err(|e| Error::serialization(format!("failed to read table row {line}: {e}")))?;
            let cell = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
            let row = fill.apply(GrammarRow::new(cell(verb), cell(object), cell(template)));

            if is_annotation(&row) {
                debug!(line, verb = %row.verb, object = %row.object, "skipping annotation row");
                continue;
            }
            if row.template.is_empty() {
                debug!(line, verb = %row.verb, object = %row.object, "header row");
                continue;
            }

            rows.push(row.with_line(line));
        }
        Ok(rows)
    }

    /// Reads and filters rows from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<GrammarRow>> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::io(format!("failed to open '{}': {e}", path.display())))?;
        self.read(file)
    }
}

/// Reads a grammar table, choosing the delimiter from the extension.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Vec<GrammarRow>> {
    let path = path.as_ref();
    TableReader::for_path(path).read_path(path)
}

/// Verb and object filled down a column, as a spreadsheet does.
#[derive(Debug, Default)]
struct FillDown {
    verb: String,
    object: String,
}

impl FillDown {
    fn apply(&mut self, mut row: GrammarRow) -> GrammarRow {
        if row.verb.is_empty() {
            row.verb.clone_from(&self.verb);
        } else {
            self.verb.clone_from(&row.verb);
        }
        if row.object.is_empty() {
            row.object.clone_from(&self.object);
        } else {
            self.object.clone_from(&row.object);
        }
        row
    }
}

/// Returns true for spreadsheet rows that are notes rather than templates.
#[must_use]
pub fn is_annotation(row: &GrammarRow) -> bool {
    let verb = row.verb.trim();
    let note_verb = verb
        .chars()
        .next()
        .is_some_and(|c| !c.is_ascii_alphabetic());
    note_verb || row.template.chars().any(is_cjk)
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3000}'..='\u{303F}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF00}'..='\u{FFEF}')
}
