//! Rule-set descriptor persistence and record output.
//!
//! Descriptors are written as JSON, or as `MessagePack` when the file name
//! ends in `.msgpack` / `.mp`. Records are written one JSON object per line.
//! A rule set can also be listed as plain `verb object template` lines.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use cmdtree_engine::{MatchRecord, RecordLayout};
use cmdtree_grammar::{Error, Result, RuleSet, RuleSetDescriptor};

/// On-disk encoding of a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorFormat {
    /// Pretty-printed JSON.
    Json,
    /// `MessagePack` with named fields.
    MessagePack,
}

impl DescriptorFormat {
    /// Picks the format from a file extension.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("msgpack") || ext.eq_ignore_ascii_case("mp") => {
                Self::MessagePack
            }
            _ => Self::Json,
        }
    }
}

/// Encodes a descriptor.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(descriptor: &RuleSetDescriptor, format: DescriptorFormat) -> Result<Vec<u8>> {
    match format {
        DescriptorFormat::Json => serde_json::to_vec_pretty(descriptor)
            .map_err(|e| Error::serialization(e.to_string())),
        DescriptorFormat::MessagePack => {
            rmp_serde::to_vec_named(descriptor).map_err(|e| Error::serialization(e.to_string()))
        }
    }
}

/// Decodes a descriptor.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes(bytes: &[u8], format: DescriptorFormat) -> Result<RuleSetDescriptor> {
    match format {
        DescriptorFormat::Json => {
            serde_json::from_slice(bytes).map_err(|e| Error::serialization(e.to_string()))
        }
        DescriptorFormat::MessagePack => {
            rmp_serde::from_slice(bytes).map_err(|e| Error::serialization(e.to_string()))
        }
    }
}

/// Saves a descriptor, choosing the format from the extension.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn save_descriptor<P: AsRef<Path>>(descriptor: &RuleSetDescriptor, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(descriptor, DescriptorFormat::for_path(path))?;

    let file = File::create(path).map_err(|e| {
        Error::io(format!("failed to create file '{}': {e}", path.display()))
    })?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .and_then(|()| writer.flush())
        .map_err(|e| Error::io(format!("failed to write to file '{}': {e}", path.display())))
}

/// Loads a descriptor, choosing the format from the extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or deserialization fails.
pub fn load_descriptor<P: AsRef<Path>>(path: P) -> Result<RuleSetDescriptor> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| Error::io(format!("failed to open file '{}': {e}", path.display())))?;

    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(format!("failed to read file '{}': {e}", path.display())))?;

    from_bytes(&bytes, DescriptorFormat::for_path(path))
}

/// Writes one `verb object template` line per rule, in match order.
///
/// Returns the number of lines written.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_syntax<W: Write>(rules: &RuleSet, mut out: W) -> Result<usize> {
    for rule in rules {
        writeln!(out, "{}", rule.key()).map_err(|e| Error::io(e.to_string()))?;
    }
    out.flush().map_err(|e| Error::io(e.to_string()))?;
    Ok(rules.len())
}

/// Writes the syntax listing of `rules` to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_syntax<P: AsRef<Path>>(rules: &RuleSet, path: P) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        Error::io(format!("failed to create file '{}': {e}", path.display()))
    })?;
    write_syntax(rules, BufWriter::new(file))
        .map_err(|e| Error::io(format!("failed to write to file '{}': {e}", path.display())))
}

/// Writes records as JSON lines in a fixed layout.
pub struct RecordWriter<W: Write> {
    out: W,
    layout: RecordLayout,
    include_raw: bool,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Creates a writer.
    pub fn new(out: W, layout: RecordLayout, include_raw: bool) -> Self {
        Self {
            out,
            layout,
            include_raw,
            written: 0,
        }
    }

    /// Writes one record as a single line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write(&mut self, record: &MatchRecord<'_>) -> Result<()> {
        let value = self.layout.render(record, self.include_raw);
        serde_json::to_writer(&mut self.out, &value)
            .map_err(|e| Error::serialization(e.to_string()))?;
        self.out
            .write_all(b"\n")
            .map_err(|e| Error::io(e.to_string()))?;
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush().map_err(|e| Error::io(e.to_string()))?;
        Ok(self.out)
    }
}
