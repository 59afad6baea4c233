//! Lookups and structural checks on elements.
//!
//! Every operation doubles as a validation rule: when an expectation is
//! not met, a [`ValidationErrorKind`] is recorded on the queried element and
//! the operation returns an empty result, so checks can be chained and all
//! problems collected in a single pass.

use crate::{Content, Element, ElementType, ReadStatus, ValidationErrorKind};

fn is_block_of(element: &Element, block_type: &str) -> bool {
    matches!(&element.content, Content::Block(block) if block.block_type == block_type)
}

fn is_named_block_of(element: &Element, block_type: &str, name: &str) -> bool {
    matches!(&element.content,
        Content::Block(block) if block.block_type == block_type && block.name == name)
}

fn is_entry_of(element: &Element, name: &str) -> bool {
    matches!(&element.content, Content::Entry(entry) if entry.name == name)
}

impl Element {
    /// Check that this element is a block.
    pub fn check_block(&mut self) -> bool {
        self.check_element_type(ElementType::Block)
    }

    /// Check that this element is an entry.
    pub fn check_entry(&mut self) -> bool {
        self.check_element_type(ElementType::Entry)
    }

    fn check_element_type(&mut self, expected_type: ElementType) -> bool {
        if self.element_type() == expected_type {
            return true;
        }
        self.add_validation_error(ValidationErrorKind::InvalidElementType { expected_type });
        false
    }

    /// Mark and return every child matching `pred`.
    fn find_all(&mut self, pred: impl Fn(&Element) -> bool) -> Vec<&mut Element> {
        if !self.check_block() {
            return Vec::new();
        }
        let Content::Block(block) = &mut self.content else {
            return Vec::new();
        };
        block
            .elements
            .iter_mut()
            .filter(|child| pred(child))
            .map(|child| {
                child.read_status = ReadStatus::Read;
                child
            })
            .collect()
    }

    /// Mark the first child matching `pred` as read and the other unread
    /// matches as ignored; return the index of the first match.
    fn find_first(&mut self, pred: impl Fn(&Element) -> bool) -> Option<usize> {
        if !self.check_block() {
            return None;
        }
        let block = self.as_block_mut()?;
        let mut found = None;
        for (i, child) in block.elements.iter_mut().enumerate() {
            if !pred(child) {
                continue;
            }
            if found.is_none() {
                child.read_status = ReadStatus::Read;
                found = Some(i);
            } else if child.read_status == ReadStatus::Unread {
                child.read_status = ReadStatus::Ignored;
            }
        }
        found
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.as_block_mut()?.elements.get_mut(index)
    }

    /// Like `find_first`, recording a missing element error when nothing
    /// matches.
    fn find_mandatory(
        &mut self,
        name: String,
        expected_type: ElementType,
        pred: impl Fn(&Element) -> bool,
    ) -> Option<&mut Element> {
        match self.find_first(pred) {
            Some(index) => self.child_mut(index),
            None => {
                if self.is_block() {
                    self.add_validation_error(ValidationErrorKind::MissingElement {
                        name,
                        expected_type,
                    });
                }
                None
            }
        }
    }

    /// All child blocks of type `block_type`.
    pub fn blocks(&mut self, block_type: &str) -> Vec<&mut Element> {
        self.find_all(|child| is_block_of(child, block_type))
    }

    /// The first child block of type `block_type`, which must exist.
    pub fn block(&mut self, block_type: &str) -> Option<&mut Element> {
        self.find_mandatory(block_type.to_string(), ElementType::Block, |child| {
            is_block_of(child, block_type)
        })
    }

    /// The first child block of type `block_type`, if any.
    pub fn maybe_block(&mut self, block_type: &str) -> Option<&mut Element> {
        let index = self.find_first(|child| is_block_of(child, block_type))?;
        self.child_mut(index)
    }

    /// The child block `block_type "name"`, which must exist.
    pub fn named_block(&mut self, block_type: &str, name: &str) -> Option<&mut Element> {
        self.find_mandatory(format!("{block_type}.{name}"), ElementType::Block, |child| {
            is_named_block_of(child, block_type, name)
        })
    }

    /// The child block `block_type "name"`, if any.
    pub fn maybe_named_block(&mut self, block_type: &str, name: &str) -> Option<&mut Element> {
        let index = self.find_first(|child| is_named_block_of(child, block_type, name))?;
        self.child_mut(index)
    }

    /// All child entries named `name`.
    pub fn entries(&mut self, name: &str) -> Vec<&mut Element> {
        self.find_all(|child| is_entry_of(child, name))
    }

    /// The first child entry named `name`, which must exist.
    pub fn entry(&mut self, name: &str) -> Option<&mut Element> {
        self.find_mandatory(name.to_string(), ElementType::Entry, |child| {
            is_entry_of(child, name)
        })
    }

    /// The first child entry named `name`, if any.
    pub fn maybe_entry(&mut self, name: &str) -> Option<&mut Element> {
        let index = self.find_first(|child| is_entry_of(child, name))?;
        self.child_mut(index)
    }

    /// Candidates present among the children, in the order of `names`.
    fn present_children(&mut self, names: &[&str]) -> Option<Vec<String>> {
        if !self.check_block() {
            return None;
        }
        let children = self.children();
        Some(
            names
                .iter()
                .filter(|name| children.iter().any(|child| child.name() == **name))
                .map(|name| name.to_string())
                .collect(),
        )
    }

    /// Check that exactly one of `names` is present among the children,
    /// blocks by type and entries by name. Returns the one found.
    pub fn check_exactly_one_of(&mut self, names: &[&str]) -> Option<String> {
        let mut found = self.present_children(names)?;
        match found.len() {
            0 => {
                self.add_validation_error(ValidationErrorKind::MissingOneOfElements {
                    names: names.iter().map(|name| name.to_string()).collect(),
                });
                None
            }
            1 => found.pop(),
            _ => {
                self.add_validation_error(ValidationErrorKind::ElementConflict { names: found });
                None
            }
        }
    }

    /// Check that at most one of `names` is present among the children.
    pub fn check_at_most_one_of(&mut self, names: &[&str]) -> bool {
        let Some(found) = self.present_children(names) else {
            return false;
        };
        if found.len() > 1 {
            self.add_validation_error(ValidationErrorKind::ElementConflict { names: found });
            return false;
        }
        true
    }

    fn nb_values(&mut self) -> Option<usize> {
        if !self.check_entry() {
            return None;
        }
        self.as_entry().map(|entry| entry.values.len())
    }

    /// Check that this entry has exactly `n` values.
    pub fn check_nb_values(&mut self, n: usize) -> bool {
        self.check_nb_values_one_of(&[n])
    }

    /// Check that the number of values of this entry is one of `ns`.
    pub fn check_nb_values_one_of(&mut self, ns: &[usize]) -> bool {
        let Some(nb_values) = self.nb_values() else {
            return false;
        };
        if ns.contains(&nb_values) {
            return true;
        }
        self.add_validation_error(ValidationErrorKind::InvalidEntryNbValues {
            nb_values,
            expected: ns.to_vec(),
        });
        false
    }

    pub fn check_min_nb_values(&mut self, min: usize) -> bool {
        let Some(nb_values) = self.nb_values() else {
            return false;
        };
        if nb_values >= min {
            return true;
        }
        self.add_validation_error(ValidationErrorKind::InvalidEntryMinNbValues { nb_values, min });
        false
    }

    pub fn check_min_max_nb_values(&mut self, min: usize, max: usize) -> bool {
        let Some(nb_values) = self.nb_values() else {
            return false;
        };
        if (min..=max).contains(&nb_values) {
            return true;
        }
        self.add_validation_error(ValidationErrorKind::InvalidEntryMinMaxNbValues {
            nb_values,
            min,
            max,
        });
        false
    }

    /// The label of this block, which must not be empty.
    pub fn block_name(&mut self) -> Option<&str> {
        if !self.check_block() {
            return None;
        }
        if self.as_block().is_some_and(|block| block.name.is_empty()) {
            self.add_validation_error(ValidationErrorKind::MissingBlockName);
            return None;
        }
        self.as_block().map(|block| block.name.as_str())
    }
}
