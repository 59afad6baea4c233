//! Scalar values held by entries.
//!
//! Every value carries its source span and one of six kinds of content:
//! - `null` is `ValueContent::Null`
//! - `true` / `false` are `ValueContent::Bool`
//! - `localhost` is `ValueContent::Symbol("localhost")`
//! - `"localhost"` and `r"localhost"` are `ValueContent::String` with a
//!   [`Sigil`] recording the quoting convention
//! - `8080` is `ValueContent::Integer`, `0.5` is `ValueContent::Float`

use std::fmt;

use bcl_tokenizer::{Sigil, Span};

/// The type of a value, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Symbol,
    Bool,
    String,
    Integer,
    Float,
}

impl ValueType {
    /// Name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Symbol => "symbol",
            ValueType::Bool => "boolean",
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
        }
    }

    /// Name of the type preceded by an article, e.g. "an integer".
    pub fn with_article(&self) -> String {
        match self {
            ValueType::Null => "null".to_string(),
            _ => crate::text::with_article(self.name()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The content of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueContent {
    /// The `null` keyword.
    Null,
    /// A bare identifier.
    Symbol(String),
    /// The `true` and `false` keywords.
    Bool(bool),
    /// A quoted or raw string.
    String {
        /// Decoded text.
        text: String,
        /// Quoting convention used in the source.
        sigil: Sigil,
    },
    /// A 64 bit signed integer.
    Integer(i64),
    /// A 64 bit float.
    Float(f64),
}

impl ValueContent {
    /// Create a quoted string.
    pub fn string(text: impl Into<String>) -> Self {
        ValueContent::String {
            text: text.into(),
            sigil: Sigil::Quoted,
        }
    }

    /// Create a raw string.
    pub fn raw_string(text: impl Into<String>) -> Self {
        ValueContent::String {
            text: text.into(),
            sigil: Sigil::Raw,
        }
    }

    /// Create a symbol.
    pub fn symbol(text: impl Into<String>) -> Self {
        ValueContent::Symbol(text.into())
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            ValueContent::Null => ValueType::Null,
            ValueContent::Symbol(_) => ValueType::Symbol,
            ValueContent::Bool(_) => ValueType::Bool,
            ValueContent::String { .. } => ValueType::String,
            ValueContent::Integer(_) => ValueType::Integer,
            ValueContent::Float(_) => ValueType::Float,
        }
    }

    /// Text of a string or symbol.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ValueContent::Symbol(text) | ValueContent::String { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Whether a value with this content satisfies `candidate`.
    ///
    /// String candidates match both strings, whatever their sigil, and
    /// symbols with the same text.
    pub fn matches(&self, candidate: &ValueContent) -> bool {
        match (self, candidate) {
            (
                ValueContent::String { text, .. } | ValueContent::Symbol(text),
                ValueContent::String { text: expected, .. },
            ) => text == expected,
            _ => self == candidate,
        }
    }
}

impl fmt::Display for ValueContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueContent::Null => f.write_str("null"),
            ValueContent::Symbol(text) => f.write_str(text),
            ValueContent::Bool(b) => write!(f, "{b}"),
            ValueContent::String { text, .. } => write!(f, "{text:?}"),
            ValueContent::Integer(i) => write!(f, "{i}"),
            ValueContent::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl From<&str> for ValueContent {
    fn from(text: &str) -> Self {
        ValueContent::string(text)
    }
}

impl From<String> for ValueContent {
    fn from(text: String) -> Self {
        ValueContent::string(text)
    }
}

impl From<bool> for ValueContent {
    fn from(b: bool) -> Self {
        ValueContent::Bool(b)
    }
}

impl From<i64> for ValueContent {
    fn from(i: i64) -> Self {
        ValueContent::Integer(i)
    }
}

impl From<f64> for ValueContent {
    fn from(x: f64) -> Self {
        ValueContent::Float(x)
    }
}

/// A value with its location in the source.
///
/// Values compare by content only.
#[derive(Debug, Clone)]
pub struct Value {
    /// Source span (the origin if programmatically constructed).
    pub span: Span,
    /// The content.
    pub content: ValueContent,
}

impl Value {
    /// Create a value without a meaningful location.
    pub fn new(content: impl Into<ValueContent>) -> Self {
        Value {
            span: Span::default(),
            content: content.into(),
        }
    }

    /// Create a value located at `span`.
    pub fn with_span(content: impl Into<ValueContent>, span: Span) -> Self {
        Value {
            span,
            content: content.into(),
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.content.value_type()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.content, ValueContent::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl From<ValueContent> for Value {
    fn from(content: ValueContent) -> Self {
        Value::new(content)
    }
}

/// A symbol extracted from a value, as opposed to any string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcl_tokenizer::Point;

    #[test]
    fn test_equality_ignores_span() {
        let a = Value::with_span(42i64, Span::point(Point::new(3, 1, 4)));
        let b = Value::new(42i64);
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_compares_sigil() {
        assert_ne!(
            Value::new(ValueContent::string("a")),
            Value::new(ValueContent::raw_string("a"))
        );
        assert_ne!(
            Value::new(ValueContent::string("a")),
            Value::new(ValueContent::symbol("a"))
        );
    }

    #[test]
    fn test_matches() {
        let candidate = ValueContent::from("http");
        assert!(ValueContent::symbol("http").matches(&candidate));
        assert!(ValueContent::raw_string("http").matches(&candidate));
        assert!(!ValueContent::symbol("https").matches(&candidate));
        assert!(ValueContent::Integer(3).matches(&ValueContent::from(3i64)));
        assert!(!ValueContent::Integer(3).matches(&ValueContent::from(3.0f64)));
        assert!(!ValueContent::symbol("true").matches(&ValueContent::from(true)));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(ValueType::Integer.with_article(), "an integer");
        assert_eq!(ValueType::Bool.with_article(), "a boolean");
        assert_eq!(ValueType::Null.with_article(), "null");
    }
}
