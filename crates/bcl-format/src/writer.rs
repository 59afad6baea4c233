//! Document writer.

use bcl_tree::{Content, Element};

use crate::options::FormatOptions;
use crate::scalar::{escape_quoted, format_value};

/// Writes elements as BCL text, one element per line.
pub struct DocumentWriter<'o> {
    out: String,
    options: &'o FormatOptions,
}

impl<'o> DocumentWriter<'o> {
    pub fn new(options: &'o FormatOptions) -> Self {
        Self {
            out: String::new(),
            options,
        }
    }

    /// Consume the writer and return the output.
    pub fn finish(self) -> String {
        self.out
    }

    fn write_indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(self.options.indent);
        }
    }

    /// Write sibling elements. A blank line separates an element flagged
    /// `followed_by_empty_line` from the next sibling.
    pub fn write_elements(&mut self, elements: &[Element], depth: usize) {
        for (i, element) in elements.iter().enumerate() {
            self.write_element(element, depth);
            if element.followed_by_empty_line && i + 1 < elements.len() {
                self.out.push('\n');
            }
        }
    }

    pub fn write_element(&mut self, element: &Element, depth: usize) {
        self.write_indent(depth);

        match &element.content {
            Content::Block(block) => {
                self.out.push_str(&block.block_type);
                if !block.name.is_empty() {
                    self.out.push_str(" \"");
                    self.out.push_str(&escape_quoted(&block.name));
                    self.out.push('"');
                }
                if block.elements.is_empty() {
                    self.out.push_str(" {}\n");
                } else {
                    self.out.push_str(" {\n");
                    self.write_elements(&block.elements, depth + 1);
                    self.write_indent(depth);
                    self.out.push_str("}\n");
                }
            }
            Content::Entry(entry) => {
                self.out.push_str(&entry.name);
                for value in &entry.values {
                    self.out.push(' ');
                    self.out.push_str(&format_value(&value.content));
                }
                self.out.push('\n');
            }
        }
    }
}
