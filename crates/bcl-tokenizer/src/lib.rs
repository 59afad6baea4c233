//! A tokenizer for BCL, plus the source positions shared by every BCL crate.

mod span;
pub use span::{Point, Span};

mod source;
pub use source::{DEFAULT_CONTEXT_LINES, split_lines, write_source_excerpt};

mod token;
pub use token::{Sigil, Token, TokenKind};

mod tokenizer;
pub use tokenizer::{TokenizeError, TokenizeErrorKind, Tokenizer, tokenize};
