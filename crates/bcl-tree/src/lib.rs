//! Document tree for BCL configuration files.
//!
//! This crate provides the tree produced by the parser, plus the API used to
//! validate it: lookups which record validation errors on the elements they
//! query, read-status tracking to detect unknown elements, and typed value
//! extraction.
//!
//! ```ignore
//! let mut doc = bcl_parse::parse(text.as_bytes(), "server.bcl")?;
//! doc.reset_read_status();
//!
//! if let Some(server) = doc.root.block("server") {
//!     let port: Option<u16> = server.entry("port").and_then(|e| e.value());
//!     let hosts: Option<Vec<String>> = server.maybe_entry("hosts").and_then(|e| e.values());
//! }
//!
//! doc.check_unread_elements();
//! if let Some(errors) = doc.validation_errors() {
//!     eprintln!("{errors}");
//! }
//! ```

mod document;
mod element;
mod error;
mod extract;
mod query;
mod report;
mod text;
mod value;

pub use bcl_tokenizer::{DEFAULT_CONTEXT_LINES, Point, Sigil, Span};
pub use document::Document;
pub use element::{Block, Content, Element, ElementType, Entry, ReadStatus};
pub use error::{ValidationError, ValidationErrorKind, ValidationErrors, ValueError};
pub use extract::{ReadValue, ReadValues};
pub use report::ariadne_config;
pub use value::{Symbol, Value, ValueContent, ValueType};
