//! Constant folding: evaluating an expression at parse time when all of
//! its operands are literals (spec §4.3, §9).
//!
//! These constructors are called by the parser every time it builds a
//! unary/binary/infix expression node, an `if`, a `while`, or a `for`. They
//! share the exact arithmetic in [`crate::value::Value`] with the evaluator
//! so the two can never disagree about what an operator does.

use crate::source::Span;
use crate::value::Value;

use super::expr::{BinaryOperator, Expression, UnaryOperator};
use super::stmt::Statement;

/// Read a literal expression as a [`Value`], or `None` if it is not (yet)
/// a compile-time constant.
fn literal_value(expr: &Expression) -> Option<Value> {
    match expr {
        Expression::IntLit(v, _) => Some(Value::Int(*v)),
        Expression::DoubleLit(v, _) => Some(Value::Double(*v)),
        Expression::BoolLit(v, _) => Some(Value::Bool(*v)),
        Expression::StringLit(v, _) => Some(Value::Str(v.clone())),
        _ => None,
    }
}

fn value_to_literal(value: Value, span: Span) -> Option<Expression> {
    match value {
        Value::Int(v) => Some(Expression::IntLit(v, span)),
        Value::Double(v) => Some(Expression::DoubleLit(v, span)),
        Value::Bool(v) => Some(Expression::BoolLit(v, span)),
        Value::Str(v) => Some(Expression::StringLit(v, span)),
        Value::Void | Value::Array { .. } => None,
    }
}

/// Build a unary-operator node, folding it immediately if the operand is a
/// literal.
pub fn fold_unary(op: UnaryOperator, operand: Expression, span: Span) -> Expression {
    if let Some(value) = literal_value(&operand) {
        let folded = match op {
            UnaryOperator::Plus => value.pos().ok(),
            UnaryOperator::Neg => value.neg().ok(),
            UnaryOperator::Not => Some(value.not()),
            UnaryOperator::BitNot => value.bitnot().ok(),
        };
        if let Some(folded) = folded.and_then(|v| value_to_literal(v, span)) {
            return folded;
        }
    }

    Expression::UnaryOp {
        op,
        operand: Box::new(operand),
        span,
    }
}

/// Build a binary-operator node, folding it immediately if both operands
/// are literals. `Assign` and `Index` are never folded (they are not pure
/// in the constant-expression sense: the former mutates storage, the
/// latter depends on runtime array identity).
pub fn fold_binary(op: BinaryOperator, lhs: Expression, rhs: Expression, span: Span) -> Expression {
    if !matches!(op, BinaryOperator::Assign | BinaryOperator::Index) {
        if let (Some(l), Some(r)) = (literal_value(&lhs), literal_value(&rhs)) {
            if let Some(folded) = eval_binary(op, &l, &r).and_then(|v| value_to_literal(v, span)) {
                return folded;
            }
        }
    }

    Expression::BinaryOp {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        span,
    }
}

/// Shared by the constant folder and the evaluator: apply a binary
/// operator to two already-evaluated values. Returns `None` on a type
/// mismatch or division/modulo by zero (the caller decides whether that
/// means "don't fold" or "raise a runtime error").
pub fn eval_binary(op: BinaryOperator, lhs: &Value, rhs: &Value) -> Option<Value> {
    use BinaryOperator::*;
    match op {
        Add => lhs.add(rhs).ok(),
        Sub => lhs.sub(rhs).ok(),
        Mul => lhs.mul(rhs).ok(),
        Div => {
            if rhs.is_zero() && matches!((lhs, rhs), (Value::Int(_), Value::Int(_))) {
                None
            } else {
                lhs.div(rhs).ok()
            }
        }
        Mod => {
            if rhs.is_zero() && matches!((lhs, rhs), (Value::Int(_), Value::Int(_))) {
                None
            } else {
                lhs.rem(rhs).ok()
            }
        }
        And => Some(Value::Bool(lhs.to_bool() && rhs.to_bool())),
        Or => Some(Value::Bool(lhs.to_bool() || rhs.to_bool())),
        Less => lhs.compare(rhs).ok().map(|o| Value::Bool(o.is_lt())),
        LessEq => lhs.compare(rhs).ok().map(|o| Value::Bool(o.is_le())),
        Greater => lhs.compare(rhs).ok().map(|o| Value::Bool(o.is_gt())),
        GreaterEq => lhs.compare(rhs).ok().map(|o| Value::Bool(o.is_ge())),
        Eq => lhs.values_eq(rhs).ok().map(Value::Bool),
        NotEq => lhs.values_eq(rhs).ok().map(|b| Value::Bool(!b)),
        BitAnd => lhs.bitand(rhs).ok(),
        BitOr => lhs.bitor(rhs).ok(),
        BitXor => lhs.bitxor(rhs).ok(),
        Shl => lhs.shl(rhs).ok(),
        Shr => lhs.shr(rhs).ok(),
        Assign | Index => None,
    }
}

/// Collapse an `if` whose condition is a compile-time constant to its
/// selected branch (spec §4.3).
pub fn fold_if(
    condition: Expression,
    then_branch: Statement,
    else_branch: Option<Statement>,
    span: Span,
) -> Statement {
    if let Some(value) = literal_value(&condition) {
        return if value.to_bool() {
            then_branch
        } else {
            else_branch.unwrap_or(Statement::Block(vec![], span))
        };
    }

    Statement::If {
        condition,
        then_branch: Box::new(then_branch),
        else_branch: else_branch.map(Box::new),
        span,
    }
}

/// A `while` whose condition folds to constant `false` never executes and
/// collapses to an empty block; a condition-less `while` (or one folding
/// to constant `true`) retains a `None` condition as the "loop forever"
/// marker (spec §4.3).
pub fn fold_while(condition: Option<Expression>, body: Statement, span: Span) -> Statement {
    if let Some(value) = condition.as_ref().and_then(literal_value) {
        if !value.to_bool() {
            return Statement::Block(vec![], span);
        }
        return Statement::While {
            condition: None,
            body: Box::new(body),
            span,
        };
    }

    Statement::While {
        condition,
        body: Box::new(body),
        span,
    }
}

/// A `for` whose condition folds to constant `false` never executes; its
/// `init`, if present, still has to run once (for side effects), so it is
/// retained as a standalone statement (spec §4.3).
pub fn fold_for(
    init: Option<Statement>,
    condition: Option<Expression>,
    post: Option<Expression>,
    body: Statement,
    span: Span,
) -> Statement {
    if let Some(value) = condition.as_ref().and_then(literal_value) {
        if !value.to_bool() {
            return match init {
                Some(init) => Statement::Block(vec![init], span),
                None => Statement::Block(vec![], span),
            };
        }
        return Statement::For {
            init: init.map(Box::new),
            condition: None,
            post,
            body: Box::new(body),
            span,
        };
    }

    Statement::For {
        init: init.map(Box::new),
        condition,
        post,
        body: Box::new(body),
        span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::new(0, 0)
    }

    #[test]
    fn folds_constant_arithmetic() {
        let expr = fold_binary(
            BinaryOperator::Add,
            Expression::IntLit(2, span()),
            fold_binary(
                BinaryOperator::Mul,
                Expression::IntLit(3, span()),
                Expression::IntLit(4, span()),
                span(),
            ),
            span(),
        );
        assert_eq!(expr, Expression::IntLit(14, span()));
    }

    #[test]
    fn folding_is_idempotent() {
        let once = fold_unary(UnaryOperator::Neg, Expression::IntLit(5, span()), span());
        let twice = fold_unary(UnaryOperator::Neg, once.clone(), span());
        assert_eq!(once, Expression::IntLit(-5, span()));
        assert_eq!(twice, Expression::IntLit(5, span()));
    }

    #[test]
    fn non_literal_operand_is_not_folded() {
        let expr = fold_binary(
            BinaryOperator::Add,
            Expression::Identifier("x".into(), span()),
            Expression::IntLit(1, span()),
            span(),
        );
        assert!(matches!(expr, Expression::BinaryOp { .. }));
    }

    #[test]
    fn constant_false_while_elides_body() {
        let stmt = fold_while(
            Some(Expression::BoolLit(false, span())),
            Statement::Block(vec![], span()),
            span(),
        );
        assert_eq!(stmt, Statement::Block(vec![], span()));
    }

    #[test]
    fn constant_true_if_becomes_then_branch() {
        let then_branch = Statement::Break(span());
        let stmt = fold_if(
            Expression::BoolLit(true, span()),
            then_branch.clone(),
            Some(Statement::Continue(span())),
            span(),
        );
        assert_eq!(stmt, then_branch);
    }
}
