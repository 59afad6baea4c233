//! Elements of a document: blocks and entries.

use std::fmt;

use bcl_tokenizer::Span;
use tracing::debug;

use crate::{Value, ValidationErrorKind};

/// Whether an element is a block or an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Block,
    Entry,
}

impl ElementType {
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Block => "block",
            ElementType::Entry => "entry",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether an element was reached during a validation pass.
///
/// Elements start `Unread`. A lookup marks the element it returns `Read`;
/// a single-result lookup marks the extra matches `Ignored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadStatus {
    #[default]
    Unread,
    Read,
    Ignored,
}

/// A block: `type "name" { ... }`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Block type, e.g. `server`.
    pub block_type: String,
    /// Block label; empty for an unnamed block.
    pub name: String,
    /// Child elements, in source order.
    pub elements: Vec<Element>,
}

impl Block {
    /// Key used to detect duplicate blocks: `type` or `type.name`.
    pub fn identity(&self) -> String {
        if self.name.is_empty() {
            self.block_type.clone()
        } else {
            format!("{}.{}", self.block_type, self.name)
        }
    }
}

/// An entry: `name value...`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entry {
    pub name: String,
    pub values: Vec<Value>,
}

/// What an element holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Block(Block),
    Entry(Entry),
}

/// A node of the document tree.
///
/// Two elements are equal when their content is equal; spans, read status,
/// validation errors and blank-line flags are ignored.
#[derive(Debug, Clone)]
pub struct Element {
    /// Source span of the whole element.
    pub span: Span,
    /// Block or entry.
    pub content: Content,
    /// Whether the element is followed by a blank line in the source.
    pub followed_by_empty_line: bool,
    pub(crate) read_status: ReadStatus,
    pub(crate) validation_errors: Vec<ValidationErrorKind>,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl Element {
    /// Create an element located at `span`.
    pub fn new(content: Content, span: Span) -> Self {
        Element {
            span,
            content,
            followed_by_empty_line: false,
            read_status: ReadStatus::Unread,
            validation_errors: Vec::new(),
        }
    }

    /// Create a block element.
    pub fn new_block(
        block_type: impl Into<String>,
        name: impl Into<String>,
        elements: Vec<Element>,
    ) -> Self {
        Element::new(
            Content::Block(Block {
                block_type: block_type.into(),
                name: name.into(),
                elements,
            }),
            Span::default(),
        )
    }

    /// Create an entry element.
    pub fn new_entry(name: impl Into<String>, values: Vec<Value>) -> Self {
        Element::new(
            Content::Entry(Entry {
                name: name.into(),
                values,
            }),
            Span::default(),
        )
    }

    /// Set the span of this element.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Set the blank-line flag of this element.
    pub fn with_empty_line(mut self, followed_by_empty_line: bool) -> Self {
        self.followed_by_empty_line = followed_by_empty_line;
        self
    }

    pub fn element_type(&self) -> ElementType {
        match self.content {
            Content::Block(_) => ElementType::Block,
            Content::Entry(_) => ElementType::Entry,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self.content, Content::Block(_))
    }

    pub fn is_entry(&self) -> bool {
        matches!(self.content, Content::Entry(_))
    }

    pub fn as_block(&self) -> Option<&Block> {
        match &self.content {
            Content::Block(block) => Some(block),
            Content::Entry(_) => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match &mut self.content {
            Content::Block(block) => Some(block),
            Content::Entry(_) => None,
        }
    }

    pub fn as_entry(&self) -> Option<&Entry> {
        match &self.content {
            Content::Entry(entry) => Some(entry),
            Content::Block(_) => None,
        }
    }

    pub fn as_entry_mut(&mut self) -> Option<&mut Entry> {
        match &mut self.content {
            Content::Entry(entry) => Some(entry),
            Content::Block(_) => None,
        }
    }

    /// Block type or entry name.
    pub fn name(&self) -> &str {
        match &self.content {
            Content::Block(block) => &block.block_type,
            Content::Entry(entry) => &entry.name,
        }
    }

    /// Key used to detect duplicates among siblings.
    pub fn identity(&self) -> String {
        match &self.content {
            Content::Block(block) => block.identity(),
            Content::Entry(entry) => entry.name.clone(),
        }
    }

    /// Child elements; empty for an entry.
    pub fn children(&self) -> &[Element] {
        match &self.content {
            Content::Block(block) => &block.elements,
            Content::Entry(_) => &[],
        }
    }

    pub fn read_status(&self) -> ReadStatus {
        self.read_status
    }

    pub fn set_read_status(&mut self, status: ReadStatus) {
        self.read_status = status;
    }

    /// Validation errors recorded on this element since the last reset.
    pub fn validation_errors(&self) -> &[ValidationErrorKind] {
        &self.validation_errors
    }

    /// Record a validation error on this element.
    pub fn add_validation_error(&mut self, error: ValidationErrorKind) {
        debug!("Validation error on {} {:?}: {}", self.element_type(), self.name(), error);
        self.validation_errors.push(error);
    }

    /// Record a free-form validation error on this element.
    pub fn add_simple_validation_error(&mut self, description: impl Into<String>) {
        self.add_validation_error(ValidationErrorKind::Simple(description.into()));
    }

    /// Visit this element and all its descendants, parents first.
    pub(crate) fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        if let Content::Block(block) = &mut self.content {
            for child in &mut block.elements {
                child.walk_mut(f);
            }
        }
    }
}
