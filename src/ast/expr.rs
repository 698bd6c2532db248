//! Expression AST nodes (spec §3.4).

use crate::source::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum UnaryOperator {
    Plus,
    Neg,
    Not,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Less,
    LessEq,
    Eq,
    NotEq,
    Greater,
    GreaterEq,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Assign,
    Index,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Expression {
    IntLit(i32, Span),
    DoubleLit(f64, Span),
    BoolLit(bool, Span),
    StringLit(String, Span),
    Identifier(String, Span),
    Call {
        callee: String,
        args: Vec<Expression>,
        dynamic_bound: bool,
        span: Span,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
        span: Span,
    },
    BinaryOp {
        op: BinaryOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        span: Span,
    },
    InfixOp {
        symbol: String,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        span: Span,
    },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::IntLit(_, span)
            | Expression::DoubleLit(_, span)
            | Expression::BoolLit(_, span)
            | Expression::StringLit(_, span)
            | Expression::Identifier(_, span) => *span,
            Expression::Call { span, .. }
            | Expression::UnaryOp { span, .. }
            | Expression::BinaryOp { span, .. }
            | Expression::InfixOp { span, .. } => *span,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::IntLit(..)
                | Expression::DoubleLit(..)
                | Expression::BoolLit(..)
                | Expression::StringLit(..)
        )
    }
}
