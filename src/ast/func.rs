//! Function and user-defined infix operator definitions (spec §3.4, §4.4,
//! §4.6, §4.8).

use crate::source::Span;

use super::decl::Parameter;
use super::stmt::Statement;
use super::types::BaseType;

/// User-defined infix operators all bind at one fixed precedence level,
/// the single tightest-binding tier in the table — above `* / %` at level
/// 11, not below it (spec §4.3's table, level 12).
pub const INFIX_PRECEDENCE: u8 = 12;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub return_type: BaseType,
    pub params: Vec<Parameter>,
    pub body: Statement,
    pub span: Span,
}

/// `infix LHS SYM RHS = body` (spec §4.3, §6.1). Unlike a function
/// definition, an infix operator declares no types at all: `left`/`right`
/// are plain parameter names bound to whatever the two operand
/// expressions evaluate to, and the body's return value supplies the
/// result — returning void from it is a runtime error (spec §4.6).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct InfixOpDefinition {
    pub symbol: String,
    pub left: String,
    pub right: String,
    pub body: Statement,
    pub span: Span,
}
