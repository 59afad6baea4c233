//! Syntax errors and their rendering.

use std::fmt::{self, Write as _};

use ariadne::{Color, Label, Report, ReportKind, Source};
use bcl_tokenizer::{DEFAULT_CONTEXT_LINES, Span, TokenizeError, write_source_excerpt};
use bcl_tree::ariadne_config;

/// A fatal error found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Label of the parsed source, e.g. a file path.
    pub source: String,
    /// Location of the error.
    pub span: Span,
    pub message: String,
    /// Earlier declaration conflicting with the erroneous one, for
    /// duplicate elements.
    pub previous: Option<Span>,
}

impl SyntaxError {
    pub fn new(source: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        SyntaxError {
            source: source.into(),
            span,
            message: message.into(),
            previous: None,
        }
    }

    pub(crate) fn from_tokenize_error(source: &str, error: TokenizeError) -> Self {
        SyntaxError::new(source, error.span, error.kind.to_string())
    }

    pub(crate) fn with_previous(mut self, previous: Span) -> Self {
        self.previous = Some(previous);
        self
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
        source_len: usize,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let clamp = |span: Span| {
            let range = span.char_range();
            let start = range.start.min(source_len);
            start..range.end.min(source_len).max(start)
        };
        let range = clamp(self.span);

        let mut report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_config(ariadne_config())
            .with_message(&self.message);

        if let Some(previous) = self.previous {
            report = report.with_label(
                Label::new((filename, clamp(previous)))
                    .with_message("first declared here")
                    .with_color(Color::Blue),
            );
        }

        report.with_label(
            Label::new((filename, range))
                .with_message(&self.message)
                .with_color(Color::Red),
        )
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.source, self.span, self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// The error returned by [`parse`](crate::parse).
///
/// Parsing stops at the first error, so there is always exactly one
/// error in practice.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub errors: Vec<SyntaxError>,
    /// Source text split into lines, for diagnostics.
    pub lines: Vec<String>,
}

impl ParseError {
    /// The first syntax error.
    pub fn first(&self) -> Option<&SyntaxError> {
        self.errors.first()
    }

    /// Render every error with a source excerpt of `context_lines` lines
    /// around the error.
    pub fn render_with_context(&self, context_lines: usize) -> String {
        let mut out = String::new();
        for error in &self.errors {
            let _ = writeln!(out, "{error}");
            let _ = write_source_excerpt(&mut out, &self.lines, error.span, "  ", context_lines);
        }
        out.truncate(out.trim_end_matches('\n').len());
        out
    }

    /// Render every error with ariadne.
    pub fn render(&self, source_text: &str) -> String {
        let mut output = Vec::new();
        self.write_report(source_text, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.to_string())
    }

    /// Write an ariadne report for every error.
    pub fn write_report<W: std::io::Write>(&self, source_text: &str, mut writer: W) {
        let source_len = source_text.chars().count();
        for error in &self.errors {
            let report = error.build_report(&error.source, source_len);
            let _ = report
                .finish()
                .write((error.source.as_str(), Source::from(source_text)), &mut writer);
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with_context(DEFAULT_CONTEXT_LINES))
    }
}

impl std::error::Error for ParseError {}
