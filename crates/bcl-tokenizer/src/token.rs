//! Token types for the BCL tokenizer.

use std::fmt;

use crate::Span;

/// The quoting convention used to write a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sigil {
    /// Quoted string `"..."`, with escape sequences.
    #[default]
    Quoted,
    /// Raw string `r"..."` or `r#"..."#`, without escape sequences.
    Raw,
}

/// The kind of a token, carrying its decoded content.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Bare identifier: `server`, `log-level`, `true`.
    Symbol(String),
    /// String after escape processing.
    String {
        /// Decoded text.
        text: String,
        /// Quoting convention.
        sigil: Sigil,
    },
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// `{`
    OpeningBracket,
    /// `}`
    ClosingBracket,
    /// End of line: `\n` or `\r\n`.
    Eol,
}

impl TokenKind {
    /// Human-readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Symbol(_) => "symbol",
            TokenKind::String { .. } => "string",
            TokenKind::Integer(_) => "integer",
            TokenKind::Float(_) => "float",
            TokenKind::OpeningBracket => "opening bracket",
            TokenKind::ClosingBracket => "closing bracket",
            TokenKind::Eol => "end of line",
        }
    }

    /// Whether this token ends a line.
    pub fn is_eol(&self) -> bool {
        matches!(self, TokenKind::Eol)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token with its kind and span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}
