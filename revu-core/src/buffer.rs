//! The editable source buffer.
//!
//! Owns the document as an ordered sequence of physical lines. The joined
//! form (`serialize`) is the exact payload sent to the analysis service, so
//! line splitting and joining must round-trip without loss.

/// An ordered sequence of source lines.
///
/// Invariant: there is always at least one line (an empty document is a
/// single empty line). The two mutation paths are single-line replacement
/// (in-place editing) and wholesale replacement (after a successful file
/// load); nothing else changes the line count.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    lines: Vec<String>,
}

impl SourceBuffer {
    /// Creates a buffer from an initial document.
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self { lines: Vec::new() };
        buffer.replace_all(text);
        buffer
    }

    /// Replaces line `index` (0-based) with `text`.
    ///
    /// Out-of-bounds indices are a silent no-op, never a panic.
    pub fn set_line(&mut self, index: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(index) {
            *line = text.to_owned();
        }
    }

    /// Replaces the whole document with `text`, split on newline boundaries.
    ///
    /// An empty string yields a single empty line, preserving the invariant.
    pub fn replace_all(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_owned).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }

    /// Joins the lines with `\n`. This is the canonical analyze payload.
    pub fn serialize(&self) -> String {
        self.lines.join("\n")
    }

    /// Returns line `index`, or `None` when out of bounds.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// All lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of physical lines (always >= 1).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl Default for SourceBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_line_in_bounds_reflects_in_serialize() {
        let mut buffer = SourceBuffer::from_text("a\nb\nc");
        buffer.set_line(1, "B");
        assert_eq!(buffer.serialize(), "a\nB\nc");
    }

    #[test]
    fn set_line_out_of_bounds_is_a_no_op() {
        let mut buffer = SourceBuffer::from_text("a\nb");
        buffer.set_line(2, "never");
        buffer.set_line(usize::MAX, "never");
        assert_eq!(buffer.serialize(), "a\nb");
    }

    #[test]
    fn empty_document_is_one_empty_line() {
        let buffer = SourceBuffer::from_text("");
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(0), Some(""));
        assert_eq!(buffer.serialize(), "");
    }

    #[test]
    fn replace_all_round_trips() {
        // replace_all(serialize(replace_all(x))) == replace_all(x)
        for text in ["", "one", "a\nb\nc", "trailing\n", "\n\n", "// x\n"] {
            let mut first = SourceBuffer::default();
            first.replace_all(text);
            let mut second = SourceBuffer::default();
            second.replace_all(&first.serialize());
            assert_eq!(first.lines(), second.lines(), "input {:?}", text);
        }
    }

    #[test]
    fn trailing_newline_yields_trailing_empty_line() {
        let buffer = SourceBuffer::from_text("// Paste your Java code here\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(1), Some(""));
    }
}
