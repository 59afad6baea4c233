//! Recursive-descent parser building the document tree from tokens.

use std::collections::HashMap;

use bcl_tokenizer::{Point, Span, Token, TokenKind};
use bcl_tree::{Block, Content, Element, Entry, Value, ValueContent};
use tracing::{debug, trace};

use crate::SyntaxError;

type Result<T> = std::result::Result<T, SyntaxError>;

/// Parser over a fully tokenized source.
pub(crate) struct Parser<'a> {
    /// Label of the source, used in errors.
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Parser {
            source,
            tokens,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    fn error(&self, span: Span, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.source, span, message)
    }

    /// The point just past the last token, where errors about a premature
    /// end of input are located.
    fn end_point(&self) -> Point {
        match self.tokens.last() {
            Some(token) => {
                let end = token.span.end;
                Point::new(end.offset + 1, end.line, end.column + 1)
            }
            None => Point::origin(),
        }
    }

    /// Consume end of line tokens and return how many were consumed.
    fn skip_eols(&mut self) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(|token| token.kind.is_eol()) {
            self.pos += 1;
            count += 1;
        }
        count
    }

    /// Parse the whole document into the root element.
    pub(crate) fn parse_document(mut self) -> Result<Element> {
        let span = match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => first.span.union(last.span),
            _ => Span::default(),
        };

        let (elements, _) = self.parse_block_content(true)?;
        debug!("Parsed {} top-level element(s) in {}", elements.len(), self.source);

        Ok(Element::new(
            Content::Block(Block {
                block_type: String::new(),
                name: String::new(),
                elements,
            }),
            span,
        ))
    }

    /// Parse elements until the closing bracket of the current block, or
    /// until the end of input at the top level. Returns the elements and
    /// the span of the closing bracket.
    fn parse_block_content(&mut self, top_level: bool) -> Result<(Vec<Element>, Span)> {
        let mut elements = Vec::new();
        let mut declarations: HashMap<String, Span> = HashMap::new();

        loop {
            self.skip_eols();

            let Some(token) = self.peek() else {
                if top_level {
                    return Ok((elements, Span::point(self.end_point())));
                }
                return Err(self.error(Span::point(self.end_point()), "truncated block"));
            };

            if token.kind == TokenKind::ClosingBracket {
                let span = token.span;
                if top_level {
                    return Err(self.error(span, "unexpected closing bracket"));
                }
                self.pos += 1;
                return Ok((elements, span));
            }

            let (element, name_span) = self.parse_element()?;

            let identity = element.identity();
            if let Some(previous) = declarations.get(&identity) {
                let message = format!(
                    "duplicate {} {:?} (previously declared at line {})",
                    element.element_type(),
                    identity,
                    previous.start.line
                );
                return Err(self.error(name_span, message).with_previous(*previous));
            }
            declarations.insert(identity, name_span);

            elements.push(element);
        }
    }

    /// Parse a block or an entry, with the end of line tokens following
    /// it. Returns the element and the span of its name.
    fn parse_element(&mut self) -> Result<(Element, Span)> {
        let Some(token) = self.advance() else {
            return Err(self.error(Span::point(self.end_point()), "expected block name or entry name"));
        };
        let TokenKind::Symbol(name) = token.kind else {
            return Err(self.error(token.span, "expected block name or entry name"));
        };
        let name_span = token.span;

        // A string is a block label only when directly followed by `{`,
        // otherwise it is the first value of an entry.
        let label = match (
            self.peek().map(|token| &token.kind),
            self.peek_nth(1).map(|token| &token.kind),
        ) {
            (Some(TokenKind::String { text, .. }), Some(TokenKind::OpeningBracket)) => {
                Some(text.clone())
            }
            _ => None,
        };
        if label.is_some() {
            self.pos += 1;
        }

        let opens_block = self
            .peek()
            .is_some_and(|token| token.kind == TokenKind::OpeningBracket);

        if opens_block {
            self.pos += 1;
            trace!("Block {:?} {:?} at {}", name, label, name_span);
            let (elements, closing) = self.parse_block_content(false)?;
            let nb_eols = self.skip_eols();

            let block = Block {
                block_type: name,
                name: label.unwrap_or_default(),
                elements,
            };
            let element = Element::new(Content::Block(block), name_span.union(closing))
                .with_empty_line(nb_eols > 1);
            return Ok((element, name_span));
        }

        let mut values = Vec::new();
        let mut span = name_span;
        while let Some(token) = self.peek() {
            if token.kind.is_eol() {
                break;
            }
            let value = self.token_value(token)?;
            span = span.union(value.span);
            values.push(value);
            self.pos += 1;
        }
        trace!("Entry {:?} with {} value(s) at {}", name, values.len(), span);

        // The first end of line terminates the entry, any other one is a
        // blank line.
        let nb_eols = self.skip_eols();

        let entry = Entry { name, values };
        let element = Element::new(Content::Entry(entry), span).with_empty_line(nb_eols > 1);
        Ok((element, name_span))
    }

    fn token_value(&self, token: &Token) -> Result<Value> {
        let content = match &token.kind {
            TokenKind::Symbol(text) => match text.as_str() {
                "true" => ValueContent::Bool(true),
                "false" => ValueContent::Bool(false),
                "null" => ValueContent::Null,
                _ => ValueContent::Symbol(text.clone()),
            },
            TokenKind::String { text, sigil } => ValueContent::String {
                text: text.clone(),
                sigil: *sigil,
            },
            TokenKind::Integer(i) => ValueContent::Integer(*i),
            TokenKind::Float(x) => ValueContent::Float(*x),
            TokenKind::OpeningBracket | TokenKind::ClosingBracket | TokenKind::Eol => {
                return Err(self.error(
                    token.span,
                    format!("expected symbol, string, integer or float, found {}", token.kind),
                ));
            }
        };
        Ok(Value::with_span(content, token.span))
    }
}
