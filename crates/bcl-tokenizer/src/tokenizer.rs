//! Tokenizer for the BCL configuration language.

use std::fmt;

use tracing::trace;

use crate::{Point, Sigil, Span, Token, TokenKind};

/// The kind of a lexical error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeErrorKind {
    /// A character that cannot start any token.
    UnexpectedCharacter(char),
    /// A string without its closing quote.
    UnterminatedString,
    /// An unknown or malformed escape sequence in a quoted string.
    InvalidEscape(String),
    /// A malformed number, e.g. `12ab` or `1.`.
    InvalidNumeral(String),
    /// An integer which does not fit in 64 bits.
    IntegerOutOfRange(String),
    /// A float which is not finite.
    FloatOutOfRange(String),
}

impl fmt::Display for TokenizeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeErrorKind::UnexpectedCharacter(c) => write!(f, "unexpected character {c:?}"),
            TokenizeErrorKind::UnterminatedString => write!(f, "unterminated string"),
            TokenizeErrorKind::InvalidEscape(seq) => {
                write!(f, "invalid escape sequence {seq:?}")
            }
            TokenizeErrorKind::InvalidNumeral(text) => write!(f, "invalid numeral {text:?}"),
            TokenizeErrorKind::IntegerOutOfRange(text) => {
                write!(f, "integer {text} is out of range")
            }
            TokenizeErrorKind::FloatOutOfRange(text) => write!(f, "float {text} is out of range"),
        }
    }
}

/// A lexical error with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeError {
    /// The kind of error.
    pub kind: TokenizeErrorKind,
    /// The offending character(s).
    pub span: Span,
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}

impl std::error::Error for TokenizeError {}

/// A tokenizer that produces tokens from BCL source text.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Position of the next character.
    point: Point,
    /// Position of the last consumed character.
    last: Point,
    /// Whether a token was produced since the last end of line.
    line_has_tokens: bool,
}

/// Tokenize a whole source text.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizeError> {
    Tokenizer::new(source).collect()
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            point: Point::origin(),
            last: Point::origin(),
            line_has_tokens: false,
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    #[inline]
    fn byte_pos(&self) -> usize {
        self.source.len() - self.remaining.len()
    }

    /// Advance by one character and return it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.last = self.point;
        self.point.offset += 1;
        if c == '\n' {
            self.point.line += 1;
            self.point.column = 1;
        } else {
            self.point.column += 1;
        }
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Create a token from the given start position to the last consumed character.
    fn token(&mut self, kind: TokenKind, start: Point) -> Token {
        let span = Span::new(start, self.last);
        trace!("Token {:?} at {}", kind, span);
        self.line_has_tokens = !kind.is_eol();
        Token::new(kind, span)
    }

    fn error(&mut self, kind: TokenizeErrorKind, span: Span) -> TokenizeError {
        // Stop producing tokens after the first error.
        self.remaining = "";
        TokenizeError { kind, span }
    }

    /// Get the next token, or `None` at the end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, TokenizeError> {
        loop {
            let Some(c) = self.peek() else {
                return Ok(None);
            };
            let start = self.point;

            match c {
                ' ' | '\t' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    return Ok(Some(self.token(TokenKind::Eol, start)));
                }
                '\r' if self.peek_nth(1) == Some('\n') => {
                    self.advance();
                    self.advance();
                    return Ok(Some(self.token(TokenKind::Eol, start)));
                }
                '\r' => {
                    self.advance();
                }
                '#' => self.skip_comment(),
                '{' => {
                    self.advance();
                    return Ok(Some(self.token(TokenKind::OpeningBracket, start)));
                }
                '}' => {
                    self.advance();
                    return Ok(Some(self.token(TokenKind::ClosingBracket, start)));
                }
                '"' => return self.tokenize_quoted_string().map(Some),
                'r' if self.raw_string_ahead() => return self.tokenize_raw_string().map(Some),
                '+' | '-' if matches!(self.peek_nth(1), Some(d) if d.is_ascii_digit()) => {
                    return self.tokenize_number().map(Some);
                }
                _ if c.is_ascii_digit() => return self.tokenize_number().map(Some),
                _ if is_symbol_start(c) => return Ok(Some(self.tokenize_symbol())),
                _ => {
                    self.advance();
                    let span = Span::point(start);
                    return Err(self.error(TokenizeErrorKind::UnexpectedCharacter(c), span));
                }
            }
        }
    }

    /// Skip a `#` comment. A line containing nothing but a comment is
    /// dropped with its line break, so it does not read as a blank line.
    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' || (c == '\r' && self.peek_nth(1) == Some('\n')) {
                break;
            }
            self.advance();
        }

        if !self.line_has_tokens {
            if self.peek() == Some('\r') {
                self.advance();
            }
            if self.peek() == Some('\n') {
                self.advance();
            }
        }
    }

    fn tokenize_symbol(&mut self) -> Token {
        let start = self.point;
        let byte_start = self.byte_pos();
        while let Some(c) = self.peek() {
            if is_symbol_char(c) {
                self.advance();
            } else {
                break;
            }
        }
        let text = self.source[byte_start..self.byte_pos()].to_string();
        self.token(TokenKind::Symbol(text), start)
    }

    /// Tokenize a quoted string: `"..."`.
    fn tokenize_quoted_string(&mut self) -> Result<Token, TokenizeError> {
        let start = self.point;
        let mut text = String::new();

        // Opening quote
        self.advance();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(self.error(TokenizeErrorKind::UnterminatedString, Span::point(start)));
                }
                Some('\r') if self.peek_nth(1) == Some('\n') => {
                    return Err(self.error(TokenizeErrorKind::UnterminatedString, Span::point(start)));
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let c = self.tokenize_escape()?;
                    text.push(c);
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }

        Ok(self.token(
            TokenKind::String {
                text,
                sigil: Sigil::Quoted,
            },
            start,
        ))
    }

    /// Decode an escape sequence starting at the current backslash.
    fn tokenize_escape(&mut self) -> Result<char, TokenizeError> {
        let start = self.point;
        let byte_start = self.byte_pos();
        self.advance();

        let decoded = match self.advance() {
            Some('n') => Some('\n'),
            Some('r') => Some('\r'),
            Some('t') => Some('\t'),
            Some('0') => Some('\0'),
            Some('\\') => Some('\\'),
            Some('"') => Some('"'),
            Some('u') => self.tokenize_unicode_escape(),
            Some('\r') if self.peek() == Some('\n') => {
                return Err(self.error(TokenizeErrorKind::UnterminatedString, Span::point(start)));
            }
            Some('\n') | None => {
                return Err(self.error(TokenizeErrorKind::UnterminatedString, Span::point(start)));
            }
            Some(_) => None,
        };

        match decoded {
            Some(c) => Ok(c),
            None => {
                let seq = self.source[byte_start..self.byte_pos()].to_string();
                let span = Span::new(start, self.last);
                Err(self.error(TokenizeErrorKind::InvalidEscape(seq), span))
            }
        }
    }

    /// Decode the digits of `\uXXXX` or `\u{X...}`.
    fn tokenize_unicode_escape(&mut self) -> Option<char> {
        let mut hex = String::new();

        if self.peek() == Some('{') {
            self.advance();
            loop {
                match self.peek() {
                    Some('}') => {
                        self.advance();
                        break;
                    }
                    Some(c) if c.is_ascii_hexdigit() && hex.len() < 6 => {
                        self.advance();
                        hex.push(c);
                    }
                    _ => return None,
                }
            }
        } else {
            for _ in 0..4 {
                match self.peek() {
                    Some(c) if c.is_ascii_hexdigit() => {
                        self.advance();
                        hex.push(c);
                    }
                    _ => return None,
                }
            }
        }

        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
    }

    /// Whether the input starts with `r`, any number of `#`, then `"`.
    fn raw_string_ahead(&self) -> bool {
        let mut chars = self.remaining.chars().skip(1);
        loop {
            match chars.next() {
                Some('#') => continue,
                Some('"') => return true,
                _ => return false,
            }
        }
    }

    /// Tokenize a raw string: `r#*"..."#*`.
    fn tokenize_raw_string(&mut self) -> Result<Token, TokenizeError> {
        let start = self.point;

        // `r`
        self.advance();

        let mut hash_count = 0usize;
        while self.peek() == Some('#') {
            hash_count += 1;
            self.advance();
        }

        // Opening `"`, guaranteed by raw_string_ahead
        self.advance();

        let mut text = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(self.error(TokenizeErrorKind::UnterminatedString, Span::point(start)));
                }
                Some('"') if (1..=hash_count).all(|i| self.peek_nth(i) == Some('#')) => {
                    for _ in 0..=hash_count {
                        self.advance();
                    }
                    break;
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }

        Ok(self.token(
            TokenKind::String {
                text,
                sigil: Sigil::Raw,
            },
            start,
        ))
    }

    /// Tokenize an integer or a float.
    fn tokenize_number(&mut self) -> Result<Token, TokenizeError> {
        let start = self.point;
        let byte_start = self.byte_pos();
        let mut is_float = false;
        let mut malformed = false;

        if matches!(self.peek(), Some('+' | '-')) {
            self.advance();
        }
        self.skip_digits();

        if self.peek() == Some('.') {
            if matches!(self.peek_nth(1), Some(d) if d.is_ascii_digit()) {
                self.advance();
                self.skip_digits();
                is_float = true;
            } else {
                malformed = true;
            }
        }

        if !malformed && matches!(self.peek(), Some('e' | 'E')) {
            let digit_at = if matches!(self.peek_nth(1), Some('+' | '-')) {
                2
            } else {
                1
            };
            if matches!(self.peek_nth(digit_at), Some(d) if d.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.advance();
                }
                self.skip_digits();
                is_float = true;
            } else {
                malformed = true;
            }
        }

        if malformed || matches!(self.peek(), Some(c) if is_symbol_char(c) || c == '.') {
            while let Some(c) = self.peek() {
                if is_symbol_char(c) || c == '.' || c == '+' {
                    self.advance();
                } else {
                    break;
                }
            }
            let text = self.source[byte_start..self.byte_pos()].to_string();
            let span = Span::new(start, self.last);
            return Err(self.error(TokenizeErrorKind::InvalidNumeral(text), span));
        }

        let source = self.source;
        let text = &source[byte_start..self.byte_pos()];
        let span = Span::new(start, self.last);

        if is_float {
            match text.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(self.token(TokenKind::Float(f), start)),
                _ => {
                    let kind = TokenizeErrorKind::FloatOutOfRange(text.to_string());
                    Err(self.error(kind, span))
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(i) => Ok(self.token(TokenKind::Integer(i), start)),
                Err(_) => {
                    let kind = TokenizeErrorKind::IntegerOutOfRange(text.to_string());
                    Err(self.error(kind, span))
                }
            }
        }
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Check if a character can start a symbol.
fn is_symbol_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Check if a character can continue a symbol.
fn is_symbol_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}
