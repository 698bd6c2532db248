//! Abstract syntax tree: node definitions (one file per node family,
//! mirroring the lexer's token/keyword split) plus the constant folder
//! that runs as the parser builds each node.

pub mod decl;
pub mod expr;
pub mod fold;
pub mod func;
pub mod program;
pub mod stmt;
pub mod types;

pub use decl::{Declaration, Parameter};
pub use expr::{BinaryOperator, Expression, UnaryOperator};
pub use func::{FunctionDefinition, InfixOpDefinition, INFIX_PRECEDENCE};
pub use program::Program;
pub use stmt::Statement;
pub use types::BaseType;
