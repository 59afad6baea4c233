//! Validation errors.
//!
//! Queries and value extraction never fail: they record a
//! [`ValidationErrorKind`] on the element being queried and return nothing.
//! [`Document::validation_errors`](crate::Document::validation_errors)
//! collects them afterwards as [`ValidationErrors`].

use std::fmt::{self, Write as _};

use ariadne::{Color, Label, Report, ReportKind, Source};
use bcl_tokenizer::{DEFAULT_CONTEXT_LINES, Span, write_source_excerpt};

use crate::text::{enumeration_and, enumeration_or, pluralize, quoted};
use crate::{ElementType, ValueContent, ValueType, ariadne_config};

/// Why a value could not be used.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueError {
    /// The value has the wrong type.
    InvalidType {
        value_type: ValueType,
        expected: Vec<ValueType>,
    },
    MinInteger {
        min: i64,
    },
    MaxInteger {
        max: i64,
    },
    /// The integer does not fit in the requested range, usually the range
    /// of the destination type.
    MinMaxInteger {
        min: i64,
        max: i64,
    },
    /// The value is not one of the allowed values.
    NotOneOf {
        allowed: Vec<ValueContent>,
    },
    /// Any other reason.
    Custom(String),
}

impl ValueError {
    /// Build a type error for a value of type `value_type`.
    pub fn invalid_type(value_type: ValueType, expected: &[ValueType]) -> Self {
        ValueError::InvalidType {
            value_type,
            expected: expected.to_vec(),
        }
    }

    pub fn custom(message: impl Into<String>) -> Self {
        ValueError::Custom(message.into())
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::InvalidType {
                value_type,
                expected,
            } => {
                let expected: Vec<String> = expected.iter().map(|t| t.with_article()).collect();
                write!(
                    f,
                    "value is {} but should be {}",
                    value_type.with_article(),
                    enumeration_or(&expected)
                )
            }
            ValueError::MinInteger { min } => {
                write!(f, "integer must be greater or equal to {min}")
            }
            ValueError::MaxInteger { max } => write!(f, "integer must be lower or equal to {max}"),
            ValueError::MinMaxInteger { min, max } => {
                write!(f, "integer must be between {min} and {max}")
            }
            ValueError::NotOneOf { allowed } => {
                let allowed: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                write!(f, "value must be {}", enumeration_or(&allowed))
            }
            ValueError::Custom(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for ValueError {}

/// A validation error recorded on an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorKind {
    /// Free-form message.
    Simple(String),
    /// A mandatory child is absent.
    MissingElement {
        name: String,
        expected_type: ElementType,
    },
    /// None of a set of alternative children is present.
    MissingOneOfElements { names: Vec<String> },
    /// The element is a block where an entry is expected, or the opposite.
    InvalidElementType { expected_type: ElementType },
    /// The entry does not have one of the expected numbers of values.
    InvalidEntryNbValues {
        nb_values: usize,
        expected: Vec<usize>,
    },
    InvalidEntryMinNbValues { nb_values: usize, min: usize },
    InvalidEntryMinMaxNbValues {
        nb_values: usize,
        min: usize,
        max: usize,
    },
    /// Several mutually exclusive children are present.
    ElementConflict { names: Vec<String> },
    /// The block has no label.
    MissingBlockName,
    /// The element was never read during validation.
    UnknownElement {
        element_type: ElementType,
        name: String,
    },
    /// The element repeats one that was already read and was skipped.
    IgnoredElement {
        element_type: ElementType,
        name: String,
    },
    /// A value of the entry is invalid.
    InvalidValue { span: Span, cause: ValueError },
}

impl ValidationErrorKind {
    /// Whether the message stands on its own, without the
    /// "invalid block" / "invalid entry" prefix.
    pub fn is_bare(&self) -> bool {
        matches!(
            self,
            ValidationErrorKind::UnknownElement { .. } | ValidationErrorKind::IgnoredElement { .. }
        )
    }

    /// Location more specific than the element, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            ValidationErrorKind::InvalidValue { span, .. } => Some(*span),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErrorKind::Simple(description) => f.write_str(description),
            ValidationErrorKind::MissingElement {
                name,
                expected_type,
            } => write!(f, "missing child {expected_type} {name:?}"),
            ValidationErrorKind::MissingOneOfElements { names } => {
                write!(f, "missing child element {}", enumeration_or(&quoted(names)))
            }
            ValidationErrorKind::InvalidElementType { expected_type } => {
                write!(
                    f,
                    "element should be {}",
                    crate::text::with_article(expected_type.name())
                )
            }
            ValidationErrorKind::InvalidEntryNbValues {
                nb_values,
                expected,
            } => {
                let ns: Vec<String> = expected.iter().map(|n| n.to_string()).collect();
                let max = expected.iter().copied().max().unwrap_or(0);
                write!(
                    f,
                    "entry has {nb_values} {} but should have {} {}",
                    pluralize("value", *nb_values),
                    enumeration_or(&ns),
                    pluralize("value", max)
                )
            }
            ValidationErrorKind::InvalidEntryMinNbValues { nb_values, min } => write!(
                f,
                "entry has {nb_values} {} but should have at least {min} {}",
                pluralize("value", *nb_values),
                pluralize("value", *min)
            ),
            ValidationErrorKind::InvalidEntryMinMaxNbValues {
                nb_values,
                min,
                max,
            } => write!(
                f,
                "entry has {nb_values} {} but should have between {min} and {max} values",
                pluralize("value", *nb_values)
            ),
            ValidationErrorKind::ElementConflict { names } => {
                write!(
                    f,
                    "conflicting child elements {}",
                    enumeration_and(&quoted(names))
                )
            }
            ValidationErrorKind::MissingBlockName => f.write_str("missing block name"),
            ValidationErrorKind::UnknownElement { element_type, name } => {
                write!(f, "unknown {element_type} {name:?}")
            }
            ValidationErrorKind::IgnoredElement { element_type, name } => {
                write!(f, "duplicate {element_type} {name:?} ignored")
            }
            ValidationErrorKind::InvalidValue { cause, .. } => write!(f, "{cause}"),
        }
    }
}

/// A validation error located in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// Type of the element holding the error, `None` for the document root
    /// and for bare messages.
    pub element_type: Option<ElementType>,
    /// Location of the error; `None` for errors on the document root.
    pub span: Option<Span>,
}

impl ValidationError {
    /// The full message, e.g. `invalid entry: entry has 2 values but should
    /// have 3 values`.
    pub fn message(&self) -> String {
        match self.element_type {
            Some(element_type) => format!("invalid {element_type}: {}", self.kind),
            None => self.kind.to_string(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Every validation error of a document, with the source lines needed to
/// render them.
#[derive(Debug, Clone)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
    pub lines: Vec<String>,
}

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Render every error followed by a source excerpt with
    /// `context_lines` lines around the error.
    pub fn render_with_context(&self, context_lines: usize) -> String {
        let mut out = String::new();
        for error in &self.errors {
            let _ = writeln!(out, "  - {}", error.message());
            if let Some(span) = error.span {
                let _ = write_source_excerpt(&mut out, &self.lines, span, "      ", context_lines);
            }
        }
        out.truncate(out.trim_end_matches('\n').len());
        out
    }

    /// Render every error with ariadne.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.to_string())
    }

    /// Write an ariadne report for every error.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, mut writer: W) {
        for error in &self.errors {
            let range = error.span.map(|span| span.char_range()).unwrap_or(0..0);
            let mut report =
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_config(ariadne_config())
                    .with_message(error.message());
            if error.span.is_some() {
                report = report.with_label(
                    Label::new((filename, range))
                        .with_message(error.kind.to_string())
                        .with_color(Color::Red),
                );
            }
            let _ = report
                .finish()
                .write((filename, Source::from(source)), &mut writer);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with_context(DEFAULT_CONTEXT_LINES))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;
    use bcl_tokenizer::Point;

    #[test]
    fn test_value_error_messages() {
        let err = ValueError::invalid_type(ValueType::String, &[ValueType::Integer]);
        assert_eq!(err.to_string(), "value is a string but should be an integer");

        let err = ValueError::invalid_type(ValueType::Bool, &[ValueType::String, ValueType::Symbol]);
        assert_eq!(
            err.to_string(),
            "value is a boolean but should be a string or a symbol"
        );

        let err = ValueError::MinMaxInteger { min: -128, max: 127 };
        assert_eq!(err.to_string(), "integer must be between -128 and 127");

        let err = ValueError::NotOneOf {
            allowed: vec!["http".into(), "https".into(), ValueContent::Integer(3)],
        };
        assert_eq!(err.to_string(), r#"value must be "http", "https" or 3"#);
    }

    #[test]
    fn test_nb_values_messages() {
        let err = ValidationErrorKind::InvalidEntryNbValues {
            nb_values: 2,
            expected: vec![3],
        };
        assert_eq!(err.to_string(), "entry has 2 values but should have 3 values");

        let err = ValidationErrorKind::InvalidEntryNbValues {
            nb_values: 0,
            expected: vec![1],
        };
        assert_eq!(err.to_string(), "entry has 0 values but should have 1 value");

        let err = ValidationErrorKind::InvalidEntryNbValues {
            nb_values: 1,
            expected: vec![2, 4],
        };
        assert_eq!(err.to_string(), "entry has 1 value but should have 2 or 4 values");

        let err = ValidationErrorKind::InvalidEntryNbValues {
            nb_values: 3,
            expected: vec![2, 1],
        };
        assert_eq!(err.to_string(), "entry has 3 values but should have 2 or 1 values");

        let err = ValidationErrorKind::InvalidEntryMinNbValues {
            nb_values: 1,
            min: 2,
        };
        assert_eq!(
            err.to_string(),
            "entry has 1 value but should have at least 2 values"
        );

        let err = ValidationErrorKind::InvalidEntryMinMaxNbValues {
            nb_values: 5,
            min: 1,
            max: 3,
        };
        assert_eq!(
            err.to_string(),
            "entry has 5 values but should have between 1 and 3 values"
        );
    }

    #[test]
    fn test_element_messages() {
        let err = ValidationErrorKind::MissingElement {
            name: "port".to_string(),
            expected_type: ElementType::Entry,
        };
        assert_eq!(err.to_string(), r#"missing child entry "port""#);

        let err = ValidationErrorKind::InvalidElementType {
            expected_type: ElementType::Block,
        };
        assert_eq!(err.to_string(), "element should be a block");

        let err = ValidationErrorKind::ElementConflict {
            names: vec!["x".to_string(), "y".to_string()],
        };
        assert_eq!(err.to_string(), r#"conflicting child elements "x" and "y""#);

        let err = ValidationErrorKind::IgnoredElement {
            element_type: ElementType::Block,
            name: "listener".to_string(),
        };
        assert_eq!(err.to_string(), r#"duplicate block "listener" ignored"#);
        assert!(err.is_bare());
    }

    #[test]
    fn test_render_with_context() {
        let errors = ValidationErrors {
            errors: vec![
                ValidationError {
                    kind: ValidationErrorKind::MissingBlockName,
                    element_type: Some(ElementType::Block),
                    span: Some(Span::new(Point::new(4, 2, 1), Point::new(9, 2, 6))),
                },
                ValidationError {
                    kind: ValidationErrorKind::Simple("bad document".to_string()),
                    element_type: None,
                    span: None,
                },
            ],
            lines: vec!["a 1".to_string(), "server {}".to_string()],
        };

        assert_eq!(
            errors.render_with_context(0),
            "  - invalid block: missing block name\n      2 | server {}\n        | ^^^^^^\n  - bad document"
        );
        assert_eq!(
            errors.to_string(),
            "  - invalid block: missing block name\n      1 | a 1\n      2 | server {}\n        | ^^^^^^\n  - bad document"
        );
    }

    #[test]
    fn test_ariadne_report() {
        let source = "port http";
        let errors = ValidationErrors {
            errors: vec![ValidationError {
                kind: ValidationErrorKind::InvalidValue {
                    span: Span::new(Point::new(5, 1, 6), Point::new(8, 1, 9)),
                    cause: ValueError::invalid_type(ValueType::Symbol, &[ValueType::Integer]),
                },
                element_type: Some(ElementType::Entry),
                span: Some(Span::new(Point::new(5, 1, 6), Point::new(8, 1, 9))),
            }],
            lines: vec![source.to_string()],
        };
        let rendered = errors.render("test.bcl", source);
        let stripped = String::from_utf8(strip_ansi_escapes::strip(rendered)).unwrap();
        assert!(stripped.contains(
            "invalid entry: value is a symbol but should be an integer"
        ));
        assert!(stripped.contains("test.bcl"));
        assert!(stripped.contains("port http"));
    }
}
