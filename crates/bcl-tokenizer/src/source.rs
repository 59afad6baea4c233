//! Source excerpts for diagnostics.
//!
//! Syntax errors and validation errors are both rendered with
//! [`write_source_excerpt`], keyed by a [`Span`] over the document lines.

use std::fmt::{self, Write};

use crate::Span;

/// Number of lines printed before and after the lines covered by a span.
pub const DEFAULT_CONTEXT_LINES: usize = 1;

/// Split source text into lines for diagnostic rendering.
///
/// Lines are split on `\n`; a trailing `\r` is removed from each line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Write the lines covered by `span`, with `context_lines` lines of context
/// on each side, and carets under the spanned characters.
///
/// ```text
///   1 | server {
///   2 |   port "http"
///     |        ^^^^^^
///   3 | }
/// ```
pub fn write_source_excerpt<W: Write>(
    out: &mut W,
    lines: &[String],
    span: Span,
    indent: &str,
    context_lines: usize,
) -> fmt::Result {
    let first = span.start.line;
    let last = span.end.line.max(first);
    if first == 0 || first > lines.len() {
        return Ok(());
    }
    let last = last.min(lines.len());

    let from = first.saturating_sub(context_lines).max(1);
    let to = (last + context_lines).min(lines.len());
    let gutter = to.to_string().len();

    for n in from..=to {
        let line = &lines[n - 1];
        if line.is_empty() {
            writeln!(out, "{indent}{n:>gutter$} |")?;
        } else {
            writeln!(out, "{indent}{n:>gutter$} | {line}")?;
        }

        if n < first || n > last {
            continue;
        }

        let line_len = line.chars().count();
        let start_col = if n == first { span.start.column } else { 1 };
        let end_col = if n == last {
            span.end.column
        } else {
            line_len.max(1)
        };
        let end_col = end_col.max(start_col);

        let mut markers = String::new();
        let mut chars = line.chars();
        for _ in 1..start_col {
            match chars.next() {
                Some('\t') => markers.push('\t'),
                _ => markers.push(' '),
            }
        }
        for _ in start_col..=end_col {
            markers.push('^');
        }

        writeln!(out, "{indent}{:>gutter$} | {markers}", "")?;
    }

    Ok(())
}
