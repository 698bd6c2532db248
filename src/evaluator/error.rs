//! Runtime errors (spec §4.8, §7). All runtime errors are fatal: there is
//! no `try`/`catch` in the language, so a `RuntimeError` always unwinds
//! straight out of the interpreter to the process boundary.

use std::fmt;

use crate::value::TypeMismatch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub message: String,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CMM Runtime Error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

impl From<TypeMismatch> for RuntimeError {
    fn from(value: TypeMismatch) -> Self {
        RuntimeError::new(value.message)
    }
}

pub type EvalResult<T> = Result<T, RuntimeError>;
