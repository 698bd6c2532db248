//! Tree-walking evaluation (spec §4.5-§4.8).
//!
//! Statement execution returns an [`ExecutionResult`] that bubbles
//! `Return`/`Break`/`Continue` up through nested blocks until something
//! that understands it (a loop, a function call, the top level) catches
//! it — mirroring the original `CMMInterpreter.cpp`'s tagged
//! `ExecutionResult` rather than using Rust exceptions/panics for control
//! flow.

pub mod environment;
pub mod error;

use std::rc::Rc;

use crate::ast::{
    BaseType, BinaryOperator, Declaration, Expression, FunctionDefinition, InfixOpDefinition,
    Program, Statement, UnaryOperator,
};
use crate::natives::NativeTable;
use crate::value::Value;

use environment::{Environment, EnvRef};
use error::{EvalResult, RuntimeError};

#[derive(Debug)]
pub enum ExecutionResult {
    Normal,
    Return(Option<Value>),
    Break,
    Continue,
}

pub struct Interpreter<'a> {
    program: &'a Program,
    natives: &'a NativeTable,
    globals: EnvRef,
}

impl<'a> Interpreter<'a> {
    pub fn new(program: &'a Program, natives: &'a NativeTable) -> Self {
        Self {
            program,
            natives,
            globals: Environment::root(),
        }
    }

    /// Run the top-level statements, then dispatch to `main` if one is
    /// defined (spec §4.7). Returns the process exit code.
    pub fn run(&mut self, main_args: Vec<String>) -> EvalResult<i32> {
        let globals = Rc::clone(&self.globals);
        match self.exec_statements(&self.program.top_level, &globals)? {
            ExecutionResult::Normal => {}
            ExecutionResult::Return(value) => return Self::top_level_exit_code(value),
            ExecutionResult::Break | ExecutionResult::Continue => {
                return Err(RuntimeError::new("'break'/'continue' used outside of a loop"));
            }
        }

        let Some(main_fn) = self.program.find_function("main").cloned() else {
            return Ok(0);
        };

        let args = self.build_main_arguments(&main_fn, main_args)?;
        let result = self.call_user_function(&main_fn, args, false, &globals)?;
        Ok(result.to_int())
    }

    fn top_level_exit_code(value: Option<Value>) -> EvalResult<i32> {
        match value {
            None => Ok(0),
            Some(Value::Int(code)) => Ok(code),
            Some(other) => Err(RuntimeError::new(format!(
                "top-level 'return' must yield an 'int' exit code, got '{}'",
                other.type_name()
            ))),
        }
    }

    fn build_main_arguments(
        &self,
        main_fn: &FunctionDefinition,
        main_args: Vec<String>,
    ) -> EvalResult<Vec<Value>> {
        match main_fn.params.len() {
            0 => Ok(Vec::new()),
            1 => {
                let elements = main_args.into_iter().map(Value::Str).collect();
                Ok(vec![Value::Array {
                    elements: Rc::new(std::cell::RefCell::new(elements)),
                    base: BaseType::String,
                }])
            }
            n => Err(RuntimeError::new(format!(
                "'main' must take zero parameters or a single string array, found {n}"
            ))),
        }
    }

    // ---- statements --------------------------------------------------

    fn exec_statements(&mut self, stmts: &[Statement], env: &EnvRef) -> EvalResult<ExecutionResult> {
        for stmt in stmts {
            match self.exec_statement(stmt, env)? {
                ExecutionResult::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(ExecutionResult::Normal)
    }

    fn exec_statement(&mut self, stmt: &Statement, env: &EnvRef) -> EvalResult<ExecutionResult> {
        match stmt {
            Statement::ExprStmt(expr, _) => {
                self.eval_expr(expr, env)?;
                Ok(ExecutionResult::Normal)
            }
            Statement::Block(stmts, _) => {
                let inner = Environment::child_of(env);
                self.exec_statements(stmts, &inner)
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.eval_expr(condition, env)?.to_bool() {
                    self.exec_statement(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.exec_statement(else_branch, env)
                } else {
                    Ok(ExecutionResult::Normal)
                }
            }
            Statement::While { condition, body, .. } => self.exec_while(condition, body, env),
            Statement::For {
                init,
                condition,
                post,
                body,
                ..
            } => self.exec_for(init, condition, post, body, env),
            Statement::Return(expr, _) => {
                let value = expr.as_ref().map(|e| self.eval_expr(e, env)).transpose()?;
                Ok(ExecutionResult::Return(value))
            }
            Statement::Break(_) => Ok(ExecutionResult::Break),
            Statement::Continue(_) => Ok(ExecutionResult::Continue),
            Statement::DeclList { base, decls, .. } => {
                self.exec_decl_list(*base, decls, env)?;
                Ok(ExecutionResult::Normal)
            }
        }
    }

    fn exec_decl_list(&mut self, base: BaseType, decls: &[Declaration], env: &EnvRef) -> EvalResult<()> {
        for decl in decls {
            let value = if !decl.dims.is_empty() {
                let mut dims = Vec::with_capacity(decl.dims.len());
                for dim in &decl.dims {
                    let n = self.eval_expr(dim, env)?;
                    let Value::Int(n) = n else {
                        return Err(RuntimeError::new("array dimension must be an 'int'"));
                    };
                    if n <= 0 {
                        return Err(RuntimeError::new("array dimension must be a positive 'int'"));
                    }
                    dims.push(n as usize);
                }
                Value::new_array(base, &dims)
            } else if let Some(init) = &decl.init {
                let value = self.eval_expr(init, env)?;
                value.coerce_to(base)?
            } else {
                Value::default_for(base)
            };
            env.borrow_mut().declare(&decl.name, value)?;
        }
        Ok(())
    }

    fn exec_while(&mut self, condition: &Option<Expression>, body: &Statement, env: &EnvRef) -> EvalResult<ExecutionResult> {
        loop {
            let keep_going = match condition {
                Some(cond) => self.eval_expr(cond, env)?.to_bool(),
                None => true,
            };
            if !keep_going {
                return Ok(ExecutionResult::Normal);
            }
            match self.exec_statement(body, env)? {
                ExecutionResult::Normal | ExecutionResult::Continue => {}
                ExecutionResult::Break => return Ok(ExecutionResult::Normal),
                returning @ ExecutionResult::Return(_) => return Ok(returning),
            }
        }
    }

    fn exec_for(
        &mut self,
        init: &Option<Box<Statement>>,
        condition: &Option<Expression>,
        post: &Option<Expression>,
        body: &Statement,
        env: &EnvRef,
    ) -> EvalResult<ExecutionResult> {
        let loop_env = Environment::child_of(env);
        if let Some(init) = init {
            match self.exec_statement(init, &loop_env)? {
                ExecutionResult::Normal => {}
                other => return Ok(other),
            }
        }
        loop {
            let keep_going = match condition {
                Some(cond) => self.eval_expr(cond, &loop_env)?.to_bool(),
                None => true,
            };
            if !keep_going {
                return Ok(ExecutionResult::Normal);
            }
            match self.exec_statement(body, &loop_env)? {
                ExecutionResult::Normal | ExecutionResult::Continue => {}
                ExecutionResult::Break => return Ok(ExecutionResult::Normal),
                returning @ ExecutionResult::Return(_) => return Ok(returning),
            }
            if let Some(post) = post {
                self.eval_expr(post, &loop_env)?;
            }
        }
    }

    // ---- expressions ---------------------------------------------------

    fn eval_expr(&mut self, expr: &Expression, env: &EnvRef) -> EvalResult<Value> {
        match expr {
            Expression::IntLit(v, _) => Ok(Value::Int(*v)),
            Expression::DoubleLit(v, _) => Ok(Value::Double(*v)),
            Expression::BoolLit(v, _) => Ok(Value::Bool(*v)),
            Expression::StringLit(v, _) => Ok(Value::Str(v.clone())),
            Expression::Identifier(name, _) => environment::lookup(env, name),
            Expression::Call {
                callee,
                args,
                dynamic_bound,
                ..
            } => self.eval_call(callee, args, *dynamic_bound, env),
            Expression::UnaryOp { op, operand, .. } => {
                let value = self.eval_expr(operand, env)?;
                Ok(match op {
                    UnaryOperator::Plus => value.pos()?,
                    UnaryOperator::Neg => value.neg()?,
                    UnaryOperator::Not => value.not(),
                    UnaryOperator::BitNot => value.bitnot()?,
                })
            }
            Expression::BinaryOp { op, lhs, rhs, .. } => self.eval_binary(*op, lhs, rhs, env),
            Expression::InfixOp { symbol, lhs, rhs, .. } => {
                let Some(def) = self.program.find_infix_op(symbol).cloned() else {
                    return Err(RuntimeError::new(format!("undefined infix operator '{symbol}'")));
                };
                let lhs = self.eval_expr(lhs, env)?;
                let rhs = self.eval_expr(rhs, env)?;
                self.call_infix_op(&def, lhs, rhs)
            }
        }
    }

    fn eval_binary(&mut self, op: BinaryOperator, lhs: &Expression, rhs: &Expression, env: &EnvRef) -> EvalResult<Value> {
        match op {
            BinaryOperator::Assign => self.eval_assign(lhs, rhs, env),
            BinaryOperator::Index => {
                let (array, idx) = self.resolve_index(lhs, rhs, env)?;
                let elements = array.borrow();
                elements
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| RuntimeError::new(format!("array index {idx} out of bounds")))
            }
            BinaryOperator::And => {
                let l = self.eval_expr(lhs, env)?;
                if !l.to_bool() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval_expr(rhs, env)?.to_bool()))
            }
            BinaryOperator::Or => {
                let l = self.eval_expr(lhs, env)?;
                if l.to_bool() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval_expr(rhs, env)?.to_bool()))
            }
            _ => {
                let l = self.eval_expr(lhs, env)?;
                let r = self.eval_expr(rhs, env)?;
                self.eval_binary_values(op, &l, &r)
            }
        }
    }

    fn eval_binary_values(&self, op: BinaryOperator, l: &Value, r: &Value) -> EvalResult<Value> {
        use BinaryOperator::*;
        Ok(match op {
            Add => l.add(r)?,
            Sub => l.sub(r)?,
            Mul => l.mul(r)?,
            Div => {
                self.check_integer_division_by_zero(l, r)?;
                l.div(r)?
            }
            Mod => {
                self.check_integer_division_by_zero(l, r)?;
                l.rem(r)?
            }
            Eq => Value::Bool(l.values_eq(r)?),
            NotEq => Value::Bool(!l.values_eq(r)?),
            Less => Value::Bool(l.compare(r)?.is_lt()),
            LessEq => Value::Bool(l.compare(r)?.is_le()),
            Greater => Value::Bool(l.compare(r)?.is_gt()),
            GreaterEq => Value::Bool(l.compare(r)?.is_ge()),
            BitAnd => l.bitand(r)?,
            BitOr => l.bitor(r)?,
            BitXor => l.bitxor(r)?,
            Shl => l.shl(r)?,
            Shr => l.shr(r)?,
            And | Or | Assign | Index => unreachable!("handled in eval_binary"),
        })
    }

    fn check_integer_division_by_zero(&self, l: &Value, r: &Value) -> EvalResult<()> {
        if matches!((l, r), (Value::Int(_), Value::Int(_))) && r.is_zero() {
            return Err(RuntimeError::new("division by zero"));
        }
        Ok(())
    }

    fn eval_assign(&mut self, lhs: &Expression, rhs: &Expression, env: &EnvRef) -> EvalResult<Value> {
        match lhs {
            Expression::Identifier(name, _) => {
                let existing = environment::lookup(env, name)?;
                if existing.is_array() {
                    return Err(RuntimeError::new(format!(
                        "cannot assign to array variable '{name}' directly; assign to an element instead"
                    )));
                }
                let value = self.eval_expr(rhs, env)?.coerce_to(value_base_type(&existing))?;
                environment::assign(env, name, value.clone())?;
                Ok(value)
            }
            Expression::BinaryOp {
                op: BinaryOperator::Index,
                lhs: array_expr,
                rhs: index_expr,
                ..
            } => {
                let (array, idx) = self.resolve_index(array_expr, index_expr, env)?;
                let current = array
                    .borrow()
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| RuntimeError::new(format!("array index {idx} out of bounds")))?;
                if current.is_array() {
                    return Err(RuntimeError::new("cannot assign directly to an array element that is itself an array"));
                }
                let value = self.eval_expr(rhs, env)?.coerce_to(value_base_type(&current))?;
                array.borrow_mut()[idx] = value.clone();
                Ok(value)
            }
            _ => Err(RuntimeError::new("left-hand side of an assignment must be a variable or array element")),
        }
    }

    /// Evaluate `array_expr[index_expr]`'s base array and index together
    /// (shared by both reads and assignments).
    fn resolve_index(
        &mut self,
        array_expr: &Expression,
        index_expr: &Expression,
        env: &EnvRef,
    ) -> EvalResult<(crate::value::ArrayRef, usize)> {
        let array_value = self.eval_expr(array_expr, env)?;
        let Value::Array { elements, .. } = array_value else {
            return Err(RuntimeError::new(format!(
                "cannot index a value of type '{}'",
                array_value.type_name()
            )));
        };
        let index_value = self.eval_expr(index_expr, env)?;
        let Value::Int(idx) = index_value else {
            return Err(RuntimeError::new("array index must be an 'int'"));
        };
        if idx < 0 {
            return Err(RuntimeError::new("array index must not be negative"));
        }
        Ok((elements, idx as usize))
    }

    fn eval_call(&mut self, callee: &str, args: &[Expression], dynamic_bound: bool, env: &EnvRef) -> EvalResult<Value> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg, env)?);
        }
        if let Some(func) = self.program.find_function(callee).cloned() {
            return self.call_user_function(&func, values, dynamic_bound, env);
        }
        if let Some(result) = self.natives.call(callee, &values) {
            return result;
        }
        Err(RuntimeError::new(format!("call to undefined function '{callee}'")))
    }

    /// Bind `args` into a fresh frame and execute `func`'s body.
    ///
    /// A dynamic-bound call's frame links back to the *caller's* frame
    /// (`env`) rather than the top level, so the callee can see the
    /// caller's locals — spec §3.5/§9. Nothing in the current grammar can
    /// set `dynamic_bound: true` (see DESIGN.md); this path exists so the
    /// capability is ready regardless.
    fn call_user_function(
        &mut self,
        func: &Rc<FunctionDefinition>,
        args: Vec<Value>,
        dynamic_bound: bool,
        env: &EnvRef,
    ) -> EvalResult<Value> {
        if args.len() != func.params.len() {
            return Err(RuntimeError::new(format!(
                "function '{}' takes {} argument(s), got {}",
                func.name,
                func.params.len(),
                args.len()
            )));
        }
        let parent = if dynamic_bound { env } else { &self.globals };
        let frame = Environment::child_of(parent);
        for (param, arg) in func.params.iter().zip(args) {
            let bound = arg.coerce_to(param.base)?;
            frame.borrow_mut().bind(&param.name, bound);
        }
        match self.exec_statement(&func.body, &frame)? {
            ExecutionResult::Normal => {
                if func.return_type == BaseType::Void {
                    Ok(Value::Void)
                } else {
                    Err(RuntimeError::new(format!("function '{}' did not return a value", func.name)))
                }
            }
            ExecutionResult::Return(Some(value)) => Ok(value.coerce_to(func.return_type)?),
            ExecutionResult::Return(None) => {
                if func.return_type == BaseType::Void {
                    Ok(Value::Void)
                } else {
                    Err(RuntimeError::new(format!("function '{}' did not return a value", func.name)))
                }
            }
            ExecutionResult::Break | ExecutionResult::Continue => {
                Err(RuntimeError::new("'break'/'continue' used outside of a loop"))
            }
        }
    }

    fn call_infix_op(&mut self, def: &Rc<InfixOpDefinition>, lhs: Value, rhs: Value) -> EvalResult<Value> {
        let frame = Environment::child_of(&self.globals);
        frame.borrow_mut().bind(&def.left, lhs);
        frame.borrow_mut().bind(&def.right, rhs);
        match self.exec_statement(&def.body, &frame)? {
            ExecutionResult::Return(Some(value)) => Ok(value),
            ExecutionResult::Return(None) | ExecutionResult::Normal => Err(RuntimeError::new(format!(
                "infix operator '{}' did not return a value",
                def.symbol
            ))),
            ExecutionResult::Break | ExecutionResult::Continue => {
                Err(RuntimeError::new("'break'/'continue' used outside of a loop"))
            }
        }
    }
}

fn value_base_type(value: &Value) -> BaseType {
    match value {
        Value::Void => BaseType::Void,
        Value::Bool(_) => BaseType::Bool,
        Value::Int(_) => BaseType::Int,
        Value::Double(_) => BaseType::Double,
        Value::Str(_) => BaseType::String,
        Value::Array { base, .. } => *base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Declaration, Parameter};
    use crate::source::Span;

    fn span() -> Span {
        Span::new(0, 0)
    }

    fn empty_program() -> Program {
        Program::new()
    }

    #[test]
    fn top_level_decl_then_return_sets_exit_code() {
        let mut program = empty_program();
        program.top_level.push(Statement::DeclList {
            base: BaseType::Int,
            decls: vec![Declaration {
                name: "x".into(),
                base: BaseType::Int,
                dims: vec![],
                init: Some(Expression::IntLit(41, span())),
                span: span(),
            }],
            span: span(),
        });
        program.top_level.push(Statement::Return(
            Some(Expression::BinaryOp {
                op: BinaryOperator::Add,
                lhs: Box::new(Expression::Identifier("x".into(), span())),
                rhs: Box::new(Expression::IntLit(1, span())),
                span: span(),
            }),
            span(),
        ));
        let natives = NativeTable::new();
        let mut interp = Interpreter::new(&program, &natives);
        assert_eq!(interp.run(vec![]).unwrap(), 42);
    }

    #[test]
    fn main_returning_a_double_coerces_to_an_int_exit_code() {
        let mut program = empty_program();
        program.functions.insert(
            "main".into(),
            Rc::new(FunctionDefinition {
                name: "main".into(),
                return_type: BaseType::Double,
                params: vec![],
                body: Statement::Block(
                    vec![Statement::Return(Some(Expression::DoubleLit(3.9, span())), span())],
                    span(),
                ),
                span: span(),
            }),
        );
        let natives = NativeTable::new();
        let mut interp = Interpreter::new(&program, &natives);
        assert_eq!(interp.run(vec![]).unwrap(), 3);
    }

    #[test]
    fn while_loop_with_break_runs_to_completion() {
        let mut program = empty_program();
        // int i = 0; while (i < 3) { i = i + 1; } return i;
        program.top_level.push(Statement::DeclList {
            base: BaseType::Int,
            decls: vec![Declaration {
                name: "i".into(),
                base: BaseType::Int,
                dims: vec![],
                init: Some(Expression::IntLit(0, span())),
                span: span(),
            }],
            span: span(),
        });
        program.top_level.push(Statement::While {
            condition: Some(Expression::BinaryOp {
                op: BinaryOperator::Less,
                lhs: Box::new(Expression::Identifier("i".into(), span())),
                rhs: Box::new(Expression::IntLit(3, span())),
                span: span(),
            }),
            body: Box::new(Statement::Block(
                vec![Statement::ExprStmt(
                    Expression::BinaryOp {
                        op: BinaryOperator::Assign,
                        lhs: Box::new(Expression::Identifier("i".into(), span())),
                        rhs: Box::new(Expression::BinaryOp {
                            op: BinaryOperator::Add,
                            lhs: Box::new(Expression::Identifier("i".into(), span())),
                            rhs: Box::new(Expression::IntLit(1, span())),
                            span: span(),
                        }),
                        span: span(),
                    },
                    span(),
                )],
                span(),
            )),
            span: span(),
        });
        program
            .top_level
            .push(Statement::Return(Some(Expression::Identifier("i".into(), span())), span()));
        let natives = NativeTable::new();
        let mut interp = Interpreter::new(&program, &natives);
        assert_eq!(interp.run(vec![]).unwrap(), 3);
    }

    #[test]
    fn integer_division_by_zero_is_a_runtime_error() {
        let mut program = empty_program();
        program.top_level.push(Statement::Return(
            Some(Expression::BinaryOp {
                op: BinaryOperator::Div,
                lhs: Box::new(Expression::IntLit(1, span())),
                rhs: Box::new(Expression::IntLit(0, span())),
                span: span(),
            }),
            span(),
        ));
        let natives = NativeTable::new();
        let mut interp = Interpreter::new(&program, &natives);
        assert!(interp.run(vec![]).is_err());
    }

    #[test]
    fn user_function_call_binds_parameters_in_a_fresh_frame() {
        let mut program = empty_program();
        program.functions.insert(
            "add".into(),
            Rc::new(FunctionDefinition {
                name: "add".into(),
                return_type: BaseType::Int,
                params: vec![
                    Parameter {
                        name: "a".into(),
                        base: BaseType::Int,
                        span: span(),
                    },
                    Parameter {
                        name: "b".into(),
                        base: BaseType::Int,
                        span: span(),
                    },
                ],
                body: Statement::Block(
                    vec![Statement::Return(
                        Some(Expression::BinaryOp {
                            op: BinaryOperator::Add,
                            lhs: Box::new(Expression::Identifier("a".into(), span())),
                            rhs: Box::new(Expression::Identifier("b".into(), span())),
                            span: span(),
                        }),
                        span(),
                    )],
                    span(),
                ),
                span: span(),
            }),
        );
        program.top_level.push(Statement::Return(
            Some(Expression::Call {
                callee: "add".into(),
                args: vec![Expression::IntLit(2, span()), Expression::IntLit(3, span())],
                dynamic_bound: false,
                span: span(),
            }),
            span(),
        ));
        let natives = NativeTable::new();
        let mut interp = Interpreter::new(&program, &natives);
        assert_eq!(interp.run(vec![]).unwrap(), 5);
    }

    #[test]
    fn assigning_directly_to_an_array_variable_is_an_error() {
        let mut program = empty_program();
        program.top_level.push(Statement::DeclList {
            base: BaseType::Int,
            decls: vec![
                Declaration {
                    name: "a".into(),
                    base: BaseType::Int,
                    dims: vec![Expression::IntLit(3, span())],
                    init: None,
                    span: span(),
                },
                Declaration {
                    name: "b".into(),
                    base: BaseType::Int,
                    dims: vec![Expression::IntLit(3, span())],
                    init: None,
                    span: span(),
                },
            ],
            span: span(),
        });
        program.top_level.push(Statement::ExprStmt(
            Expression::BinaryOp {
                op: BinaryOperator::Assign,
                lhs: Box::new(Expression::Identifier("a".into(), span())),
                rhs: Box::new(Expression::Identifier("b".into(), span())),
                span: span(),
            },
            span(),
        ));
        let natives = NativeTable::new();
        let mut interp = Interpreter::new(&program, &natives);
        assert!(interp.run(vec![]).is_err());
    }

    #[test]
    fn assigning_to_a_rank_two_array_element_is_an_error() {
        let mut program = empty_program();
        program.top_level.push(Statement::DeclList {
            base: BaseType::Int,
            decls: vec![Declaration {
                name: "m".into(),
                base: BaseType::Int,
                dims: vec![Expression::IntLit(2, span()), Expression::IntLit(2, span())],
                init: None,
                span: span(),
            }],
            span: span(),
        });
        // m[0] = 5; — m[0] is itself a rank-one array, not a scalar.
        program.top_level.push(Statement::ExprStmt(
            Expression::BinaryOp {
                op: BinaryOperator::Assign,
                lhs: Box::new(Expression::BinaryOp {
                    op: BinaryOperator::Index,
                    lhs: Box::new(Expression::Identifier("m".into(), span())),
                    rhs: Box::new(Expression::IntLit(0, span())),
                    span: span(),
                }),
                rhs: Box::new(Expression::IntLit(5, span())),
                span: span(),
            },
            span(),
        ));
        let natives = NativeTable::new();
        let mut interp = Interpreter::new(&program, &natives);
        assert!(interp.run(vec![]).is_err());
    }

    #[test]
    fn function_falling_off_the_end_without_returning_is_an_error() {
        let mut program = empty_program();
        program.functions.insert(
            "f".into(),
            Rc::new(FunctionDefinition {
                name: "f".into(),
                return_type: BaseType::Int,
                params: vec![],
                body: Statement::Block(vec![], span()),
                span: span(),
            }),
        );
        program.top_level.push(Statement::ExprStmt(
            Expression::Call {
                callee: "f".into(),
                args: vec![],
                dynamic_bound: false,
                span: span(),
            },
            span(),
        ));
        let natives = NativeTable::new();
        let mut interp = Interpreter::new(&program, &natives);
        assert!(interp.run(vec![]).is_err());
    }
}
