//! Per-file source context used to quote code in diagnostics.
//!
//! A `SourceFile` is created when a file enters the transform and dropped
//! when it leaves, so one file's text never appears in another file's error.

use oxc_span::Span;

#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'s> {
    pub name: &'s str,
    pub text: &'s str,
}

impl<'s> SourceFile<'s> {
    pub fn new(name: &'s str, text: &'s str) -> Self {
        Self { name, text }
    }

    /// Source text covered by `span`, or an empty string if the span does
    /// not fall on this file's char boundaries.
    pub fn slice(&self, span: Span) -> &'s str {
        self.text
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }

    /// Renders the lines around `span` with a `>` gutter marker on the
    /// offending lines and carets under the offending columns.
    pub fn code_frame(&self, span: Span) -> String {
        let lines: Vec<&str> = self.text.lines().collect();
        if lines.is_empty() {
            return String::new();
        }

        let index = LineIndex::new(self.text);
        let last_line = lines.len() - 1;
        let (start_line, start_col) = index.line_column(span.start, self.text);
        let (end_line, end_col) = index.line_column(span.end, self.text);
        let start_line = start_line.min(last_line);
        let end_line = end_line.clamp(start_line, last_line);

        let first = start_line.saturating_sub(2);
        let last = (end_line + 3).min(last_line);
        let width = (last + 1).to_string().len();

        let mut frame = Vec::new();
        for (line_no, line) in lines.iter().enumerate().take(last + 1).skip(first) {
            let marked = (start_line..=end_line).contains(&line_no);
            let gutter = if marked { '>' } else { ' ' };
            let separator = if line.is_empty() { "" } else { " " };
            frame.push(format!(
                "{} {:>width$} |{}{}",
                gutter,
                line_no + 1,
                separator,
                line
            ));

            if marked {
                let from = if line_no == start_line { start_col } else { 0 };
                let to = if line_no == end_line {
                    end_col
                } else {
                    line.chars().count()
                };
                let carets = to.saturating_sub(from).max(1);
                frame.push(format!(
                    "  {:>width$} | {}{}",
                    "",
                    " ".repeat(from),
                    "^".repeat(carets)
                ));
            }
        }

        frame.join("\n")
    }
}

/// Byte offsets of line starts, for offset → (line, column) lookups.
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Zero-based line and zero-based column (in chars) of a byte offset.
    pub fn line_column(&self, offset: u32, source: &str) -> (usize, usize) {
        let offset = (offset as usize).min(source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(0) => 0,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line];
        let column = source
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        (line, column)
    }
}
