//! Code builder utility for generating properly indented code.

use super::Indent;

/// Fluent API for building code with proper indentation.
///
/// Indentation is written lazily at the start of a line, so blank lines never
/// carry trailing whitespace and raw fragments can continue the current line.
///
/// # Example
///
/// ```
/// use mga_codegen::builder::CodeBuilder;
///
/// let mut builder = CodeBuilder::go();
/// builder
///     .push_line("func main() {")
///     .push_indent()
///     .push_line("run()")
///     .push_dedent()
///     .push_line("}");
///
/// assert_eq!(builder.build(), "func main() {\n\trun()\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
    at_line_start: bool,
}

impl CodeBuilder {
    /// Create a new CodeBuilder with the specified indentation.
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
            at_line_start: true,
        }
    }

    /// Create a new CodeBuilder with tab indentation (Go default).
    pub fn go() -> Self {
        Self::new(Indent::GO)
    }

    /// Add a line of code with current indentation.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        self.push_raw(s);
        self.push_newline()
    }

    /// End the current line.
    pub fn push_newline(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self.at_line_start = true;
        self
    }

    /// Add a blank line (no indentation).
    pub fn push_blank(&mut self) -> &mut Self {
        if !self.at_line_start {
            self.push_newline();
        }
        self.push_newline()
    }

    /// Add raw text, indenting it first when it starts a line.
    ///
    /// Embedded newlines are kept as is.
    pub fn push_raw(&mut self, s: &str) -> &mut Self {
        if s.is_empty() {
            return self;
        }
        if self.at_line_start {
            self.write_indent();
            self.at_line_start = false;
        }
        self.buffer.push_str(s);
        if s.ends_with('\n') {
            self.at_line_start = true;
        }
        self
    }

    /// Increase indentation level.
    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level.
    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a `//` comment, one line per line of `text`.
    ///
    /// Text that already starts with `//` or `/*` is written verbatim.
    pub fn push_comment(&mut self, text: &str) -> &mut Self {
        let text = text.trim_end_matches('\n');
        if text.starts_with("//") || text.starts_with("/*") {
            for line in text.lines() {
                self.push_line(line);
            }
            return self;
        }
        for line in text.lines() {
            if line.is_empty() {
                self.push_line("//");
            } else {
                self.push_line(&format!("// {line}"));
            }
        }
        self
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    /// Get a reference to the current buffer content.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::go()
    }
}
