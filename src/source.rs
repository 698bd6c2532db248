//! Whole-file source buffering, a byte cursor, and line/column lookup for
//! diagnostics.
//!
//! The entire source file is read into memory once. A [`Loc`] is a byte
//! offset into that buffer; [`SourceManager::loc_to_line_col`] turns a `Loc`
//! into a zero-based `(line, col)` pair by binary-searching a table of
//! line-start offsets collected during loading.

use std::fmt::Display;
use std::fs;
use std::io;
use std::path::Path;

/// A byte offset into the source buffer.
pub type Loc = usize;

/// A half-open `[start, end)` span of bytes within the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct Span {
    pub start: Loc,
    pub end: Loc,
}

impl Span {
    pub fn new(start: Loc, end: Loc) -> Self {
        Self { start, end }
    }

    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end)
    }
}

/// Severity of a diagnostic produced while lexing or parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        })
    }
}

/// A single diagnostic anchored to a source location.
///
/// Formats as `KIND at (Line L, Col C): MSG`, per spec §4.1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub loc: Loc,
    pub message: String,
}

impl Diagnostic {
    pub fn error(loc: Loc, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            loc,
            message: message.into(),
        }
    }

    pub fn warning(loc: Loc, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            loc,
            message: message.into(),
        }
    }

    /// Render this diagnostic against a [`SourceManager`] for `(line, col)`
    /// information.
    pub fn render(&self, source: &SourceManager) -> String {
        let (line, col) = source.loc_to_line_col(self.loc);
        format!(
            "{} at (Line {}, Col {}): {}",
            self.severity,
            line + 1,
            col + 1,
            self.message
        )
    }
}

/// How diagnostics raised during lexing/parsing are delivered: printed the
/// moment they are raised, or accumulated for a single end-of-run dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticMode {
    Instant,
    Queued,
}

/// Owns the full contents of a loaded source file plus everything needed to
/// map a byte offset back to a human-readable location.
pub struct SourceManager {
    name: String,
    buffer: Vec<u8>,
    line_starts: Vec<Loc>,
    cursor: Loc,
    mode: DiagnosticMode,
    queued: Vec<Diagnostic>,
}

impl SourceManager {
    /// Load `path` into memory, failing the process on error (spec §4.1:
    /// "Fatal open failure prints to standard error and terminates the
    /// process with failure").
    pub fn load(path: impl AsRef<Path>, mode: DiagnosticMode) -> Self {
        let path = path.as_ref();
        match fs::read(path) {
            Ok(buffer) => Self::from_bytes(path.to_string_lossy().into_owned(), buffer, mode),
            Err(err) => {
                eprintln!("CMM: could not open '{}': {}", path.display(), err);
                std::process::exit(1);
            }
        }
    }

    pub fn from_bytes(name: String, buffer: Vec<u8>, mode: DiagnosticMode) -> Self {
        let line_starts = Self::compute_line_starts(&buffer);
        Self {
            name,
            buffer,
            line_starts,
            cursor: 0,
            mode,
            queued: Vec::new(),
        }
    }

    fn compute_line_starts(buffer: &[u8]) -> Vec<Loc> {
        let mut starts = vec![0];
        for (i, &byte) in buffer.iter().enumerate() {
            if byte == b'\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn pos(&self) -> Loc {
        self.cursor
    }

    /// Advance the cursor and return the next byte, or `EOF` at end of input.
    pub fn get(&mut self) -> Option<u8> {
        let byte = self.buffer.get(self.cursor).copied();
        if byte.is_some() {
            self.cursor += 1;
        }
        byte
    }

    /// Return the next byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.buffer.get(self.cursor).copied()
    }

    /// Look ahead `n` bytes past the current cursor without advancing.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.buffer.get(self.cursor + n).copied()
    }

    /// Retreat the cursor by one byte.
    pub fn unget(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn set_pos(&mut self, pos: Loc) {
        self.cursor = pos;
    }

    /// Map a byte offset to a zero-based `(line, column)` pair in
    /// O(log number-of-lines) via binary search over line-start offsets.
    pub fn loc_to_line_col(&self, loc: Loc) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&loc) {
            Ok(exact) => exact,
            Err(insertion) => insertion - 1,
        };
        let col = loc - self.line_starts[line];
        (line, col)
    }

    /// Raise a diagnostic: prints immediately in [`DiagnosticMode::Instant`]
    /// mode, otherwise queues it for [`SourceManager::flush_diagnostics`].
    pub fn raise(&mut self, diagnostic: Diagnostic) {
        match self.mode {
            DiagnosticMode::Instant => eprintln!("{}", diagnostic.render(self)),
            DiagnosticMode::Queued => self.queued.push(diagnostic),
        }
    }

    pub fn flush_diagnostics(&mut self) {
        let pending = std::mem::take(&mut self.queued);
        for diagnostic in &pending {
            eprintln!("{}", diagnostic.render(self));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> SourceManager {
        SourceManager::from_bytes("test".into(), text.as_bytes().to_vec(), DiagnosticMode::Queued)
    }

    #[test]
    fn cursor_advances_and_stops_at_eof() {
        let mut src = source("ab");
        assert_eq!(src.get(), Some(b'a'));
        assert_eq!(src.get(), Some(b'b'));
        assert_eq!(src.get(), None);
    }

    #[test]
    fn peek_does_not_advance() {
        let mut src = source("xy");
        assert_eq!(src.peek(), Some(b'x'));
        assert_eq!(src.peek(), Some(b'x'));
        assert_eq!(src.get(), Some(b'x'));
    }

    #[test]
    fn unget_retreats_one_byte() {
        let mut src = source("ab");
        src.get();
        src.get();
        src.unget();
        assert_eq!(src.get(), Some(b'b'));
    }

    #[test]
    fn loc_to_line_col_is_zero_based() {
        let src = source("ab\ncd\nef");
        assert_eq!(src.loc_to_line_col(0), (0, 0));
        assert_eq!(src.loc_to_line_col(3), (1, 0));
        assert_eq!(src.loc_to_line_col(4), (1, 1));
        assert_eq!(src.loc_to_line_col(6), (2, 0));
    }

    #[test]
    fn diagnostic_renders_with_one_based_line_col() {
        let src = source("ab\ncd");
        let diag = Diagnostic::error(3, "boom");
        assert_eq!(diag.render(&src), "Error at (Line 2, Col 1): boom");
    }
}
