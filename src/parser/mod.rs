//! Recursive-descent parser with Pratt-style precedence climbing for
//! expressions (spec §4.3).

pub mod error;

use std::rc::Rc;

use crate::ast::fold::{fold_binary, fold_for, fold_if, fold_unary, fold_while};
use crate::ast::{
    BaseType, BinaryOperator, Declaration, Expression, FunctionDefinition, InfixOpDefinition,
    Parameter, Program, Statement, UnaryOperator,
};
use crate::lexer::{Keyword, Lexer, Punctuator, Token, TokenKind};
use crate::source::{Diagnostic, Span};

pub use error::{ParseError, ParseResult};

/// Binding power of every token that can appear as a binary operator
/// (spec §4.3's precedence table). `None` means the token cannot start a
/// binary operator, so the Pratt loop stops there.
fn binding_power(kind: &TokenKind) -> Option<u8> {
    use Punctuator::*;
    match kind {
        TokenKind::Punctuator(Assign) => Some(1),
        TokenKind::Punctuator(OrOr) => Some(2),
        TokenKind::Punctuator(AndAnd) => Some(3),
        TokenKind::Punctuator(Pipe) => Some(4),
        TokenKind::Punctuator(Caret) => Some(5),
        TokenKind::Punctuator(Amp) => Some(6),
        TokenKind::Punctuator(Eq) | TokenKind::Punctuator(NotEq) => Some(7),
        TokenKind::Punctuator(Less)
        | TokenKind::Punctuator(LessEq)
        | TokenKind::Punctuator(Greater)
        | TokenKind::Punctuator(GreaterEq) => Some(8),
        TokenKind::Punctuator(Shl) | TokenKind::Punctuator(Shr) => Some(9),
        TokenKind::Punctuator(Plus) | TokenKind::Punctuator(Minus) => Some(10),
        TokenKind::Punctuator(Star) | TokenKind::Punctuator(Slash) | TokenKind::Punctuator(Percent) => {
            Some(11)
        }
        TokenKind::InfixOp(_) => Some(crate::ast::INFIX_PRECEDENCE),
        _ => None,
    }
}

fn builtin_binary_op(punct: Punctuator) -> Option<BinaryOperator> {
    use BinaryOperator as B;
    use Punctuator::*;
    Some(match punct {
        Plus => B::Add,
        Minus => B::Sub,
        Star => B::Mul,
        Slash => B::Div,
        Percent => B::Mod,
        AndAnd => B::And,
        OrOr => B::Or,
        Less => B::Less,
        LessEq => B::LessEq,
        Eq => B::Eq,
        NotEq => B::NotEq,
        Greater => B::Greater,
        GreaterEq => B::GreaterEq,
        Amp => B::BitAnd,
        Pipe => B::BitOr,
        Caret => B::BitXor,
        Shl => B::Shl,
        Shr => B::Shr,
        _ => return None,
    })
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self { lexer }
    }

    fn current(&self) -> &Token {
        self.lexer.current()
    }

    fn error<T>(&mut self, message: impl Into<String>) -> ParseResult<T> {
        let span = self.current().span;
        let message = message.into();
        self.lexer.raise(Diagnostic::error(span.start, message.clone()));
        Err(ParseError::new(span, message))
    }

    fn bump(&mut self) -> Token {
        self.lexer.lex()
    }

    fn expect_punct(&mut self, p: Punctuator) -> ParseResult<Span> {
        if self.current().is_punctuator(p) {
            Ok(self.bump().span)
        } else {
            self.error(format!("expected '{p:?}'"))
        }
    }

    fn expect_keyword(&mut self, k: Keyword) -> ParseResult<Span> {
        if self.current().is_keyword(k) {
            Ok(self.bump().span)
        } else {
            self.error(format!("expected keyword '{k:?}'"))
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<(String, Span)> {
        match self.current().kind.clone() {
            TokenKind::Identifier(name) => {
                let span = self.bump().span;
                Ok((name, span))
            }
            _ => self.error("expected an identifier"),
        }
    }

    fn expect_infix_symbol(&mut self) -> ParseResult<(String, Span)> {
        match self.current().kind.clone() {
            TokenKind::InfixOp(symbol) => {
                let span = self.bump().span;
                Ok((symbol, span))
            }
            _ => self.error("expected an infix operator symbol"),
        }
    }

    fn parse_base_type(&mut self) -> ParseResult<(BaseType, Span)> {
        let span = self.current().span;
        let base = match &self.current().kind {
            TokenKind::Keyword(Keyword::Int) => BaseType::Int,
            TokenKind::Keyword(Keyword::Double) => BaseType::Double,
            TokenKind::Keyword(Keyword::Bool) => BaseType::Bool,
            TokenKind::Keyword(Keyword::String) => BaseType::String,
            TokenKind::Keyword(Keyword::Void) => BaseType::Void,
            _ => return self.error("expected a type keyword"),
        };
        self.bump();
        Ok((base, span))
    }

    /// Top-level loop: function definitions, infix definitions, and plain
    /// statements freely interleave until EOF (spec §4.3).
    pub fn parse_program(mut self) -> ParseResult<Program> {
        let mut program = Program::new();

        while !self.current().is_eof() {
            if self.current().is_keyword(Keyword::Infix) {
                let def = self.parse_infix_def()?;
                if program.infix_ops.contains_key(&def.symbol) {
                    self.lexer.raise(Diagnostic::warning(
                        def.span.start,
                        format!("infix operator '{}' redefined", def.symbol),
                    ));
                }
                program.infix_ops.insert(def.symbol.clone(), Rc::new(def));
                continue;
            }

            if self.current().is_type_keyword() {
                let checkpoint = self.lexer.checkpoint();
                let (base, start_span) = self.parse_base_type()?;
                let (name, _) = self.expect_identifier()?;

                if self.current().is_punctuator(Punctuator::LParen) {
                    let def = self.parse_function_rest(base, name, start_span)?;
                    if program.functions.contains_key(&def.name) {
                        self.lexer.raise(Diagnostic::warning(
                            def.span.start,
                            format!("function '{}' redefined", def.name),
                        ));
                    }
                    program.functions.insert(def.name.clone(), Rc::new(def));
                } else {
                    self.lexer.restore(checkpoint);
                    let stmt = self.parse_decl_list_statement(base, start_span)?;
                    program.top_level.push(stmt);
                }
                continue;
            }

            program.top_level.push(self.parse_statement()?);
        }

        Ok(program)
    }

    fn parse_function_rest(
        &mut self,
        return_type: BaseType,
        name: String,
        start: Span,
    ) -> ParseResult<FunctionDefinition> {
        self.expect_punct(Punctuator::LParen)?;
        let mut params = Vec::new();

        if !self.current().is_punctuator(Punctuator::RParen) {
            loop {
                let (base, span) = self.parse_base_type()?;
                if base == BaseType::Void
                    && params.is_empty()
                    && self.current().is_punctuator(Punctuator::RParen)
                {
                    break;
                }
                let (pname, _) = self.expect_identifier()?;
                params.push(Parameter {
                    name: pname,
                    base,
                    span,
                });
                if self.current().is_punctuator(Punctuator::Comma) {
                    self.bump();
                    continue;
                }
                break;
            }
        }
        self.expect_punct(Punctuator::RParen)?;

        let body = self.parse_statement()?;
        let span = start.to(body.span());
        Ok(FunctionDefinition {
            name,
            return_type,
            params,
            body,
            span,
        })
    }

    fn parse_infix_def(&mut self) -> ParseResult<InfixOpDefinition> {
        let start = self.expect_keyword(Keyword::Infix)?;
        let (left, _) = self.expect_identifier()?;
        let (symbol, _) = self.expect_infix_symbol()?;
        let (right, _) = self.expect_identifier()?;
        self.expect_punct(Punctuator::Assign)?;
        let body = self.parse_statement()?;
        let span = start.to(body.span());
        Ok(InfixOpDefinition {
            symbol,
            left,
            right,
            body,
            span,
        })
    }

    // ---- statements ----------------------------------------------------

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        if self.current().is_punctuator(Punctuator::LBrace) {
            return self.parse_block();
        }
        if self.current().is_keyword(Keyword::If) {
            return self.parse_if();
        }
        if self.current().is_keyword(Keyword::While) {
            return self.parse_while();
        }
        if self.current().is_keyword(Keyword::For) {
            return self.parse_for();
        }
        if self.current().is_keyword(Keyword::Return) {
            return self.parse_return();
        }
        if self.current().is_keyword(Keyword::Break) {
            let span = self.bump().span;
            self.expect_punct(Punctuator::Semicolon)?;
            return Ok(Statement::Break(span));
        }
        if self.current().is_keyword(Keyword::Continue) {
            let span = self.bump().span;
            self.expect_punct(Punctuator::Semicolon)?;
            return Ok(Statement::Continue(span));
        }
        if self.current().is_type_keyword() {
            let (base, span) = self.parse_base_type()?;
            return self.parse_decl_list_statement(base, span);
        }

        let expr = self.parse_expr(1)?;
        let span = expr.span();
        self.expect_punct(Punctuator::Semicolon)?;
        Ok(Statement::ExprStmt(expr, span))
    }

    fn parse_block(&mut self) -> ParseResult<Statement> {
        let start = self.expect_punct(Punctuator::LBrace)?;
        let mut stmts = Vec::new();
        while !self.current().is_punctuator(Punctuator::RBrace) && !self.current().is_eof() {
            stmts.push(self.parse_statement()?);
        }
        let end = self.expect_punct(Punctuator::RBrace)?;
        Ok(Statement::Block(stmts, start.to(end)))
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        let start = self.expect_keyword(Keyword::If)?;
        self.expect_punct(Punctuator::LParen)?;
        let condition = self.parse_expr(1)?;
        self.expect_punct(Punctuator::RParen)?;
        let then_branch = self.parse_statement()?;
        let else_branch = if self.current().is_keyword(Keyword::Else) {
            self.bump();
            Some(self.parse_statement()?)
        } else {
            None
        };
        let end = else_branch.as_ref().unwrap_or(&then_branch).span();
        Ok(fold_if(condition, then_branch, else_branch, start.to(end)))
    }

    /// `while (cond) body` or `while () body` for a condition-less "loop
    /// forever" (spec §3.4, §4.5: absence of a condition means forever).
    fn parse_while(&mut self) -> ParseResult<Statement> {
        let start = self.expect_keyword(Keyword::While)?;
        self.expect_punct(Punctuator::LParen)?;
        let condition = if self.current().is_punctuator(Punctuator::RParen) {
            None
        } else {
            Some(self.parse_expr(1)?)
        };
        self.expect_punct(Punctuator::RParen)?;
        let body = self.parse_statement()?;
        let span = start.to(body.span());
        Ok(fold_while(condition, body, span))
    }

    fn parse_for(&mut self) -> ParseResult<Statement> {
        let start = self.expect_keyword(Keyword::For)?;
        self.expect_punct(Punctuator::LParen)?;

        let init = if self.current().is_punctuator(Punctuator::Semicolon) {
            None
        } else if self.current().is_type_keyword() {
            let (base, span) = self.parse_base_type()?;
            let decls = self.parse_declarations(base)?;
            Some(Statement::DeclList { base, decls, span })
        } else {
            let expr = self.parse_expr(1)?;
            let span = expr.span();
            Some(Statement::ExprStmt(expr, span))
        };
        self.expect_punct(Punctuator::Semicolon)?;

        let condition = if self.current().is_punctuator(Punctuator::Semicolon) {
            None
        } else {
            Some(self.parse_expr(1)?)
        };
        self.expect_punct(Punctuator::Semicolon)?;

        let post = if self.current().is_punctuator(Punctuator::RParen) {
            None
        } else {
            Some(self.parse_expr(1)?)
        };
        self.expect_punct(Punctuator::RParen)?;

        let body = self.parse_statement()?;
        let span = start.to(body.span());
        Ok(fold_for(init, condition, post, body, span))
    }

    fn parse_return(&mut self) -> ParseResult<Statement> {
        let start = self.expect_keyword(Keyword::Return)?;
        let value = if self.current().is_punctuator(Punctuator::Semicolon) {
            None
        } else {
            Some(self.parse_expr(1)?)
        };
        let end = self.expect_punct(Punctuator::Semicolon)?;
        Ok(Statement::Return(value, start.to(end)))
    }

    fn parse_decl_list_statement(&mut self, base: BaseType, start: Span) -> ParseResult<Statement> {
        let decls = self.parse_declarations(base)?;
        let end = self.expect_punct(Punctuator::Semicolon)?;
        Ok(Statement::DeclList {
            base,
            decls,
            span: start.to(end),
        })
    }

    /// One or more comma-separated declaration names sharing `base`,
    /// without consuming a terminator (the caller decides whether that's
    /// `;` or the first `;` of a `for` header, spec §3.4/§4.2).
    fn parse_declarations(&mut self, base: BaseType) -> ParseResult<Vec<Declaration>> {
        let mut decls = Vec::new();
        loop {
            let (name, start) = self.expect_identifier()?;
            let mut dims = Vec::new();
            while self.current().is_punctuator(Punctuator::LBracket) {
                self.bump();
                dims.push(self.parse_expr(1)?);
                self.expect_punct(Punctuator::RBracket)?;
            }
            let init = if dims.is_empty() && self.current().is_punctuator(Punctuator::Assign) {
                self.bump();
                Some(self.parse_expr(1)?)
            } else {
                None
            };
            let end = init
                .as_ref()
                .map(Expression::span)
                .or_else(|| dims.last().map(Expression::span))
                .unwrap_or(start);
            decls.push(Declaration {
                name,
                base,
                dims,
                init,
                span: start.to(end),
            });
            if self.current().is_punctuator(Punctuator::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        Ok(decls)
    }

    // ---- expressions -----------------------------------------------------

    fn parse_expr(&mut self, min_bp: u8) -> ParseResult<Expression> {
        let mut lhs = self.parse_unary()?;

        loop {
            let Some(bp) = binding_power(&self.current().kind) else {
                break;
            };
            if bp < min_bp {
                break;
            }

            if self.current().is_punctuator(Punctuator::Assign) {
                self.bump();
                let rhs = self.parse_expr(bp)?; // right-associative
                let full_span = lhs.span().to(rhs.span());
                lhs = fold_binary(BinaryOperator::Assign, lhs, rhs, full_span);
                continue;
            }

            let op_token = self.bump();
            let rhs = self.parse_expr(bp + 1)?;
            let span = lhs.span().to(rhs.span());

            lhs = match op_token.kind {
                TokenKind::InfixOp(symbol) => Expression::InfixOp {
                    symbol,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                    span,
                },
                TokenKind::Punctuator(p) => {
                    let op = builtin_binary_op(p).expect("binding_power/builtin_binary_op in sync");
                    fold_binary(op, lhs, rhs, span)
                }
                _ => unreachable!("binding_power only matches InfixOp/Punctuator tokens"),
            };
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        let (op, start) = match &self.current().kind {
            TokenKind::Punctuator(Punctuator::Plus) => (UnaryOperator::Plus, self.current().span),
            TokenKind::Punctuator(Punctuator::Minus) => (UnaryOperator::Neg, self.current().span),
            TokenKind::Punctuator(Punctuator::Bang) => (UnaryOperator::Not, self.current().span),
            TokenKind::Punctuator(Punctuator::Tilde) => (UnaryOperator::BitNot, self.current().span),
            _ => return self.parse_postfix(),
        };
        self.bump();
        let operand = self.parse_unary()?;
        let span = start.to(operand.span());
        Ok(fold_unary(op, operand, span))
    }

    fn parse_postfix(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.current().is_punctuator(Punctuator::LBracket) {
                self.bump();
                let index = self.parse_expr(1)?;
                let end = self.expect_punct(Punctuator::RBracket)?;
                let span = expr.span().to(end);
                expr = Expression::BinaryOp {
                    op: BinaryOperator::Index,
                    lhs: Box::new(expr),
                    rhs: Box::new(index),
                    span,
                };
                continue;
            }
            break;
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let span = self.current().span;
        match self.current().kind.clone() {
            TokenKind::Integer(v) => {
                self.bump();
                Ok(Expression::IntLit(v, span))
            }
            TokenKind::Double(v) => {
                self.bump();
                Ok(Expression::DoubleLit(v, span))
            }
            TokenKind::Boolean(v) => {
                self.bump();
                Ok(Expression::BoolLit(v, span))
            }
            TokenKind::String(v) => {
                self.bump();
                Ok(Expression::StringLit(v, span))
            }
            TokenKind::Identifier(name) => {
                self.bump();
                if self.current().is_punctuator(Punctuator::LParen) {
                    self.parse_call(name, span)
                } else {
                    Ok(Expression::Identifier(name, span))
                }
            }
            TokenKind::Punctuator(Punctuator::LParen) => {
                self.bump();
                let expr = self.parse_expr(1)?;
                self.expect_punct(Punctuator::RParen)?;
                Ok(expr)
            }
            _ => self.error("expected an expression"),
        }
    }

    fn parse_call(&mut self, callee: String, start: Span) -> ParseResult<Expression> {
        self.expect_punct(Punctuator::LParen)?;
        let mut args = Vec::new();
        if !self.current().is_punctuator(Punctuator::RParen) {
            loop {
                args.push(self.parse_expr(1)?);
                if self.current().is_punctuator(Punctuator::Comma) {
                    self.bump();
                    continue;
                }
                break;
            }
        }
        let end = self.expect_punct(Punctuator::RParen)?;
        Ok(Expression::Call {
            callee,
            args,
            dynamic_bound: false,
            span: start.to(end),
        })
    }
}

/// Parse a complete program from a freshly constructed lexer.
pub fn parse(lexer: Lexer<'_>) -> ParseResult<Program> {
    Parser::new(lexer).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DiagnosticMode, SourceManager};

    fn parse_src(src: &str) -> ParseResult<Program> {
        let mut source = SourceManager::from_bytes("t".into(), src.as_bytes().to_vec(), DiagnosticMode::Queued);
        let lexer = Lexer::new(&mut source);
        parse(lexer)
    }

    #[test]
    fn constant_folds_through_parsing() {
        let program = parse_src("int x = 2 + 3 * 4;").unwrap();
        match &program.top_level[0] {
            Statement::DeclList { decls, .. } => {
                assert_eq!(decls[0].init, Some(Expression::IntLit(14, decls[0].init.as_ref().unwrap().span())));
            }
            other => panic!("expected DeclList, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_definition_vs_declaration() {
        let program = parse_src("int add(int a, int b) { return a + b; } int x;").unwrap();
        assert!(program.functions.contains_key("add"));
        assert_eq!(program.top_level.len(), 1);
    }

    #[test]
    fn parses_infix_definition_and_use() {
        let program = parse_src(
            "infix a ** b = { int r = 1; int i; for (i = 0; i < b; i = i + 1) r = r * a; return r; }",
        )
        .unwrap();
        assert!(program.infix_ops.contains_key("**"));
    }

    #[test]
    fn parses_array_declaration_and_index_assignment() {
        let program = parse_src("int a[3]; a[0] = 10;").unwrap();
        assert_eq!(program.top_level.len(), 2);
        match &program.top_level[0] {
            Statement::DeclList { decls, .. } => assert_eq!(decls[0].dims.len(), 1),
            other => panic!("expected DeclList, got {other:?}"),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        let program = parse_src("int a; int b; int c; a = b = c;").unwrap();
        match program.top_level.last().unwrap() {
            Statement::ExprStmt(Expression::BinaryOp { op, rhs, .. }, _) => {
                assert_eq!(*op, BinaryOperator::Assign);
                assert!(matches!(**rhs, Expression::BinaryOp { op: BinaryOperator::Assign, .. }));
            }
            other => panic!("expected nested assignment, got {other:?}"),
        }
    }

    #[test]
    fn constant_false_while_elides_to_empty_block() {
        let program = parse_src("while (false) { print(1); }").unwrap();
        assert_eq!(program.top_level[0], Statement::Block(vec![], program.top_level[0].span()));
    }

    #[test]
    fn forever_while_keeps_none_condition() {
        let program = parse_src("while () { break; }").unwrap();
        match &program.top_level[0] {
            Statement::While { condition, .. } => assert!(condition.is_none()),
            other => panic!("expected While, got {other:?}"),
        }
    }
}
