//! Parser for the BCL configuration language.
//!
//! ```ignore
//! let doc = bcl_parse::parse(b"server \"main\" {\n  port 8080\n}\n", "server.bcl")?;
//! ```

pub use bcl_tokenizer::{Point, Span, Token, TokenKind, Tokenizer};
pub use bcl_tree::Document;

mod error;
pub use error::{ParseError, SyntaxError};

mod parser;


use bcl_tokenizer::split_lines;
use tracing::debug;

/// Parse a document.
///
/// `source` labels the input in error messages, e.g. a file path or
/// `<stdin>`. Parsing stops at the first error.
pub fn parse(data: &[u8], source: &str) -> Result<Document, ParseError> {
    let text = match std::str::from_utf8(data) {
        Ok(text) => text,
        Err(err) => {
            let valid = String::from_utf8_lossy(&data[..err.valid_up_to()]);
            let point = end_of(&valid);
            let error = SyntaxError::new(source, Span::point(point), "invalid UTF-8 sequence");
            return Err(ParseError {
                errors: vec![error],
                lines: split_lines(&String::from_utf8_lossy(data)),
            });
        }
    };

    debug!("Parsing {} ({} bytes)", source, data.len());

    let result = bcl_tokenizer::tokenize(text)
        .map_err(|err| SyntaxError::from_tokenize_error(source, err))
        .and_then(|tokens| parser::Parser::new(source, tokens).parse_document());

    match result {
        Ok(root) => Ok(Document::new(source, text, root)),
        Err(error) => {
            debug!("Parsing {} failed: {}", source, error);
            Err(ParseError {
                errors: vec![error],
                lines: split_lines(text),
            })
        }
    }
}

/// The point just after `text`.
fn end_of(text: &str) -> Point {
    let mut point = Point::origin();
    for c in text.chars() {
        point.offset += 1;
        if c == '\n' {
            point.line += 1;
            point.column = 1;
        } else {
            point.column += 1;
        }
    }
    point
}
