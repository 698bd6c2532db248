//! Parse error type (spec §4.3, §7).
//!
//! A parse error is a pure control-flow signal: the accompanying
//! diagnostic is raised on the [`crate::source::SourceManager`] at the
//! point of failure (so it honours the manager's instant/queued mode),
//! and `ParseError` itself just unwinds the recursive-descent call stack
//! back to the caller, the way the teacher's `ParseState`/`FromTokens`
//! machinery does.

use std::fmt;

use crate::source::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.span.start)
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;
