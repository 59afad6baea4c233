use bcl_tokenizer::split_lines;
use tracing::debug;

use crate::{
    Content, Element, ReadStatus, ValidationError, ValidationErrorKind,
    ValidationErrors,
};

/// A parsed BCL document.
///
/// The root element is an implicit block with an empty type and name
/// holding the top-level elements.
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the document comes from, e.g. a file path or `<stdin>`.
    pub source: String,
    /// Source text split into lines, for diagnostics.
    pub lines: Vec<String>,
    pub root: Element,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Document {
    /// Create a document from its root element and source text.
    pub fn new(source: impl Into<String>, text: &str, mut root: Element) -> Self {
        root.read_status = ReadStatus::Read;
        Document {
            source: source.into(),
            lines: split_lines(text),
            root,
        }
    }

    /// Create a document from top-level elements, without source text.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        Document::new("", "", Element::new_block("", "", elements))
    }

    /// Top-level elements.
    pub fn elements(&self) -> &[Element] {
        self.root.children()
    }

    /// Mark every element unread, except the root, and forget all
    /// validation errors, before a new validation pass.
    pub fn reset_read_status(&mut self) {
        self.root.walk_mut(&mut |element: &mut Element| {
            element.read_status = ReadStatus::Unread;
            element.validation_errors.clear();
        });
        self.root.read_status = ReadStatus::Read;
    }

    /// Record an unknown element error on every element still unread, and a
    /// duplicate error on every element ignored by a single lookup.
    ///
    /// Children of unread and ignored blocks are not reported on their own.
    /// Returns the number of elements reported.
    pub fn check_unread_elements(&mut self) -> usize {
        fn check(element: &mut Element) -> usize {
            let Content::Block(block) = &mut element.content else {
                return 0;
            };
            let mut count = 0;
            for child in &mut block.elements {
                match child.read_status {
                    ReadStatus::Unread => {
                        let error = ValidationErrorKind::UnknownElement {
                            element_type: child.element_type(),
                            name: child.name().to_string(),
                        };
                        child.add_validation_error(error);
                        count += 1;
                    }
                    ReadStatus::Read => count += check(child),
                    ReadStatus::Ignored => {
                        let error = ValidationErrorKind::IgnoredElement {
                            element_type: child.element_type(),
                            name: child.name().to_string(),
                        };
                        child.add_validation_error(error);
                        count += 1;
                    }
                }
            }
            count
        }

        let count = check(&mut self.root);
        debug!("Found {} unread or ignored element(s) in {}", count, self.source);
        count
    }

    /// Every validation error recorded in the tree, in document order, or
    /// `None` if there is none.
    pub fn validation_errors(&self) -> Option<ValidationErrors> {
        fn collect(element: &Element, is_root: bool, errors: &mut Vec<ValidationError>) {
            for kind in &element.validation_errors {
                let element_type = if is_root || kind.is_bare() {
                    None
                } else {
                    Some(element.element_type())
                };
                let span = kind
                    .span()
                    .or(if is_root { None } else { Some(element.span) });
                errors.push(ValidationError {
                    kind: kind.clone(),
                    element_type,
                    span,
                });
            }
            for child in element.children() {
                collect(child, false, errors);
            }
        }

        let mut errors = Vec::new();
        collect(&self.root, true, &mut errors);
        if errors.is_empty() {
            return None;
        }

        debug!("Collected {} validation error(s) in {}", errors.len(), self.source);
        Some(ValidationErrors {
            errors,
            lines: self.lines.clone(),
        })
    }
}
