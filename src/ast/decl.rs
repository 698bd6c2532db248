//! Declarations and function parameters (spec §3.4, §4.2, §4.5).

use crate::source::Span;

use super::expr::Expression;
use super::types::BaseType;

/// One name inside a `DeclList`, e.g. the `b = 2` in `int a, b = 2, c[3];`.
///
/// `dims` holds one size expression per `[...]` suffix in declaration
/// order; an empty `dims` means a plain scalar. `init` is only legal on a
/// scalar declaration (spec §4.2, §9: arrays are never literal-initialised).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Declaration {
    pub name: String,
    pub base: BaseType,
    pub dims: Vec<Expression>,
    pub init: Option<Expression>,
    pub span: Span,
}

/// A formal parameter: name, base type, source location (spec §3.4).
///
/// Arrays are pass-by-reference values already tagged with their own base
/// type (`Value::Array { base, .. }`), so a parameter does not need to
/// declare array-ness itself: binding an array argument to an `int`
/// parameter just means the argument's `base` must be `int` (checked at
/// call time, spec §4.6).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Parameter {
    pub name: String,
    pub base: BaseType,
    pub span: Span,
}
