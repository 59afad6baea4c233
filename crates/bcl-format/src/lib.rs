//! Pretty-printer for BCL documents.
//!
//! The output has one element per line, children indented one level per
//! block, and keeps the blank lines separating elements in the source.
//! Comments are not preserved.

mod options;
mod scalar;
mod writer;

use std::io;

use bcl_parse::ParseError;
use bcl_tree::Document;
use tracing::debug;

pub use options::FormatOptions;
pub use scalar::{escape_quoted, format_value, raw_hashes};
pub use writer::DocumentWriter;

/// Render a document as BCL text.
pub fn format_document(document: &Document, options: &FormatOptions) -> String {
    let mut writer = DocumentWriter::new(options);
    writer.write_elements(document.elements(), 0);
    let output = writer.finish();
    debug!("Formatted {} into {} bytes", document.source, output.len());
    output
}

/// Parse and reformat BCL source text.
pub fn format_source(text: &str, source: &str, options: &FormatOptions) -> Result<String, ParseError> {
    let document = bcl_parse::parse(text.as_bytes(), source)?;
    Ok(format_document(&document, options))
}

/// Write a document to `sink` with the default options.
pub fn print<W: io::Write>(document: &Document, sink: W) -> io::Result<()> {
    print_with_options(document, &FormatOptions::default(), sink)
}

/// Write a document to `sink`.
pub fn print_with_options<W: io::Write>(
    document: &Document,
    options: &FormatOptions,
    mut sink: W,
) -> io::Result<()> {
    sink.write_all(format_document(document, options).as_bytes())?;
    sink.flush()
}

/// Printing support for [`Document`].
pub trait PrintDocument {
    /// Write the document to `sink` with the default options.
    fn print<W: io::Write>(&self, sink: W) -> io::Result<()>;
}

impl PrintDocument for Document {
    fn print<W: io::Write>(&self, sink: W) -> io::Result<()> {
        print(self, sink)
    }
}
