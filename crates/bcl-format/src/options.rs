//! Formatting options for BCL output.

/// Options for BCL output.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Indentation string (default: "    " - 4 spaces)
    pub indent: &'static str,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { indent: "    " }
    }
}

impl FormatOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom indentation string.
    pub fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }

    /// Indent with tabs.
    pub fn tabs(self) -> Self {
        self.indent("\t")
    }
}
