//! Line-oriented text files
//!
//! Generated and patched files are handled as line lists. `SourceText`
//! keeps the terminator of every line and whether the last one had one, so
//! a patched file differs from its source only in the lines that changed,
//! even when its line endings are mixed.

use std::ops::Range;

/// Line ending style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A text file split into lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    lines: Vec<String>,
    /// Terminator of each line; an unterminated last line holds the
    /// ending it gets if more lines are appended
    endings: Vec<LineEnding>,
    trailing_newline: bool,
}

impl SourceText {
    /// Split file contents into lines
    pub fn parse(contents: &str) -> Self {
        let mut lines = Vec::new();
        let mut endings = Vec::new();

        for piece in contents.split_inclusive('\n') {
            if let Some(line) = piece.strip_suffix("\r\n") {
                lines.push(line.to_string());
                endings.push(LineEnding::CrLf);
            } else if let Some(line) = piece.strip_suffix('\n') {
                lines.push(line.to_string());
                endings.push(LineEnding::Lf);
            } else {
                lines.push(piece.to_string());
                endings.push(endings.last().copied().unwrap_or_default());
            }
        }

        Self {
            lines,
            endings,
            trailing_newline: contents.ends_with('\n'),
        }
    }

    /// Build a `\n`-terminated text from lines
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            endings: vec![LineEnding::Lf; lines.len()],
            lines,
            trailing_newline: true,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Insert `line` before `index`, terminated like the line above it
    pub fn insert(&mut self, index: usize, line: String) {
        let ending = index
            .checked_sub(1)
            .and_then(|above| self.endings.get(above))
            .or_else(|| self.endings.get(index))
            .copied()
            .unwrap_or_default();
        self.lines.insert(index, line);
        self.endings.insert(index, ending);
    }

    /// Replace the text of a line, keeping its terminator
    pub fn replace(&mut self, index: usize, line: String) {
        if let Some(slot) = self.lines.get_mut(index) {
            *slot = line;
        }
    }

    /// Remove a range of lines together with their terminators
    pub fn remove(&mut self, range: Range<usize>) {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        self.lines.drain(start..end);
        self.endings.drain(start..end);
    }

    /// Join the lines back into file contents
    pub fn render(&self) -> String {
        let mut out = String::new();
        let last = self.lines.len().saturating_sub(1);
        for (index, (line, ending)) in self.lines.iter().zip(&self.endings).enumerate() {
            out.push_str(line);
            if index < last || self.trailing_newline {
                out.push_str(ending.as_str());
            }
        }
        out
    }
}
