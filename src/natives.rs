//! Native function table (spec §4.6, §6.1).
//!
//! Grounded on `include/NativeFunctions.h`/`src/NativeFunctions.cpp`: a
//! fixed set of built-ins the evaluator falls back to once a call's name
//! is not found in the user function table. `print`/`println` reproduce
//! the original's trailing-space-after-every-argument behavior exactly
//! (spec §8 scenario 1).
//!
//! `random`/`srand` need mutable state across calls (the PRNG seed) and
//! `read`/`readln`/`readint` need a stdin token buffer that can span
//! multiple native calls; no crate in the example pack supplies a PRNG or
//! a buffered-token reader, so both are hand-rolled here rather than
//! fabricating a dependency (see DESIGN.md).

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::evaluator::error::{EvalResult, RuntimeError};
use crate::value::Value;

pub struct NativeTable {
    rng_state: Cell<u64>,
    token_buffer: RefCell<VecDeque<String>>,
}

impl Default for NativeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeTable {
    pub fn new() -> Self {
        Self {
            rng_state: Cell::new(0x2545_F491_4F6C_DD1D),
            token_buffer: RefCell::new(VecDeque::new()),
        }
    }

    /// Dispatch `name(args)`. Returns `None` when `name` is not a native,
    /// letting the evaluator report "undefined function" itself.
    pub fn call(&self, name: &str, args: &[Value]) -> Option<EvalResult<Value>> {
        Some(match name {
            "print" => self.native_print(args, false),
            "println" => self.native_print(args, true),
            "system" => self.native_system(args),
            "read" => self.native_read(args),
            "readln" => self.native_readln(args),
            "readint" => self.native_readint(args),
            "random" => self.native_random(args),
            "srand" => self.native_srand(args),
            "time" => self.native_time(args),
            "exit" => self.native_exit(args),
            "toint" => self.native_toint(args),
            "todouble" => self.native_todouble(args),
            "tostring" => self.native_tostring(args),
            "tobool" => self.native_tobool(args),
            "typeof" => self.native_typeof(args),
            "len" => self.native_len(args),
            "strlen" => self.native_strlen(args),
            "sqrt" => self.native_math1(args, f64::sqrt),
            "exp" => self.native_math1(args, f64::exp),
            "log" => self.native_math1(args, f64::ln),
            "log10" => self.native_math1(args, f64::log10),
            "pow" => self.native_pow(args),
            _ => return None,
        })
    }

    fn arg<'a>(&self, args: &'a [Value], name: &str, index: usize) -> EvalResult<&'a Value> {
        args.get(index)
            .ok_or_else(|| RuntimeError::new(format!("'{name}' expects at least {} argument(s)", index + 1)))
    }

    fn native_print(&self, args: &[Value], newline: bool) -> EvalResult<Value> {
        let mut out = String::new();
        for value in args {
            out.push_str(&value.to_display_string());
            out.push(' ');
        }
        if newline {
            out.push('\n');
        }
        print!("{out}");
        let _ = std::io::stdout().flush();
        Ok(Value::Void)
    }

    fn native_system(&self, args: &[Value]) -> EvalResult<Value> {
        let command = self.arg(args, "system", 0)?.to_display_string();
        let status = std::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .map_err(|e| RuntimeError::new(format!("failed to run command: {e}")))?;
        Ok(Value::Int(status.code().unwrap_or(-1)))
    }

    fn refill_tokens(&self) -> EvalResult<()> {
        loop {
            let mut line = String::new();
            let n = std::io::stdin()
                .read_line(&mut line)
                .map_err(|e| RuntimeError::new(format!("failed to read stdin: {e}")))?;
            if n == 0 {
                return Err(RuntimeError::new("unexpected end of input"));
            }
            let tokens: VecDeque<String> = line.split_whitespace().map(str::to_string).collect();
            if !tokens.is_empty() {
                *self.token_buffer.borrow_mut() = tokens;
                return Ok(());
            }
        }
    }

    fn next_token(&self) -> EvalResult<String> {
        if self.token_buffer.borrow().is_empty() {
            self.refill_tokens()?;
        }
        self.token_buffer
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| RuntimeError::new("unexpected end of input"))
    }

    fn native_read(&self, _args: &[Value]) -> EvalResult<Value> {
        Ok(Value::Str(self.next_token()?))
    }

    fn native_readln(&self, _args: &[Value]) -> EvalResult<Value> {
        let mut line = String::new();
        let n = std::io::stdin()
            .read_line(&mut line)
            .map_err(|e| RuntimeError::new(format!("failed to read stdin: {e}")))?;
        if n == 0 {
            return Err(RuntimeError::new("unexpected end of input"));
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Value::Str(line))
    }

    fn native_readint(&self, _args: &[Value]) -> EvalResult<Value> {
        let token = self.next_token()?;
        token
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|_| RuntimeError::new(format!("'{token}' is not a valid int")))
    }

    fn next_rand_u64(&self) -> u64 {
        let mut x = self.rng_state.get();
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state.set(x);
        x
    }

    fn native_random(&self, args: &[Value]) -> EvalResult<Value> {
        match args.first() {
            None => Ok(Value::Int((self.next_rand_u64() & 0x7FFF_FFFF) as i32)),
            Some(Value::Int(bound)) if *bound > 0 => {
                Ok(Value::Int((self.next_rand_u64() % *bound as u64) as i32))
            }
            Some(other) => Err(RuntimeError::new(format!(
                "'random' expects a positive 'int' bound, got '{}'",
                other.type_name()
            ))),
        }
    }

    fn native_srand(&self, args: &[Value]) -> EvalResult<Value> {
        let seed = self.arg(args, "srand", 0)?.to_int();
        self.rng_state.set((seed as u64).max(1));
        Ok(Value::Void)
    }

    fn native_time(&self, _args: &[Value]) -> EvalResult<Value> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Ok(Value::Int(secs as i32))
    }

    fn native_exit(&self, args: &[Value]) -> EvalResult<Value> {
        let code = args.first().map(|v| v.to_int()).unwrap_or(0);
        std::process::exit(code);
    }

    fn native_toint(&self, args: &[Value]) -> EvalResult<Value> {
        Ok(Value::Int(self.arg(args, "toint", 0)?.to_int()))
    }

    fn native_todouble(&self, args: &[Value]) -> EvalResult<Value> {
        Ok(Value::Double(self.arg(args, "todouble", 0)?.to_double()))
    }

    fn native_tostring(&self, args: &[Value]) -> EvalResult<Value> {
        Ok(Value::Str(self.arg(args, "tostring", 0)?.to_display_string()))
    }

    fn native_tobool(&self, args: &[Value]) -> EvalResult<Value> {
        Ok(Value::Bool(self.arg(args, "tobool", 0)?.to_bool()))
    }

    fn native_typeof(&self, args: &[Value]) -> EvalResult<Value> {
        Ok(Value::Str(self.arg(args, "typeof", 0)?.type_name().to_string()))
    }

    fn native_len(&self, args: &[Value]) -> EvalResult<Value> {
        match self.arg(args, "len", 0)? {
            Value::Array { elements, .. } => Ok(Value::Int(elements.borrow().len() as i32)),
            other => Err(RuntimeError::new(format!(
                "'len' expects an array, got '{}'",
                other.type_name()
            ))),
        }
    }

    fn native_strlen(&self, args: &[Value]) -> EvalResult<Value> {
        match self.arg(args, "strlen", 0)? {
            Value::Str(s) => Ok(Value::Int(s.len() as i32)),
            other => Err(RuntimeError::new(format!(
                "'strlen' expects a string, got '{}'",
                other.type_name()
            ))),
        }
    }

    fn native_math1(&self, args: &[Value], f: fn(f64) -> f64) -> EvalResult<Value> {
        let value = self.arg(args, "math function", 0)?;
        Ok(Value::Double(f(value.to_double())))
    }

    fn native_pow(&self, args: &[Value]) -> EvalResult<Value> {
        let base = self.arg(args, "pow", 0)?.to_double();
        let exp = self.arg(args, "pow", 1)?.to_double();
        Ok(Value::Double(base.powf(exp)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_reports_array_element_count() {
        let table = NativeTable::new();
        let array = Value::new_array(crate::ast::BaseType::Int, &[3]);
        let result = table.call("len", &[array]).unwrap().unwrap();
        assert!(matches!(result, Value::Int(3)));
    }

    #[test]
    fn random_with_bound_stays_in_range() {
        let table = NativeTable::new();
        for _ in 0..50 {
            let v = table.call("random", &[Value::Int(10)]).unwrap().unwrap();
            match v {
                Value::Int(n) => assert!((0..10).contains(&n)),
                _ => panic!("expected int"),
            }
        }
    }

    #[test]
    fn unknown_native_returns_none() {
        let table = NativeTable::new();
        assert!(table.call("not_a_native", &[]).is_none());
    }

    #[test]
    fn typeof_reports_the_dynamic_tag() {
        let table = NativeTable::new();
        let result = table.call("typeof", &[Value::Bool(true)]).unwrap().unwrap();
        assert!(matches!(result, Value::Str(s) if s == "bool"));
    }
}
