//! The dynamic runtime value (spec §3.3) and the arithmetic/comparison
//! rules shared between constant folding (`ast::fold`) and the evaluator.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::ast::types::BaseType;

/// Shared, mutable array storage. Arrays are reference-counted rather than
/// garbage-collected: the language has no construct that could write an
/// array reference into one of its own elements, so cycles are impossible
/// (spec §5, §9).
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

#[derive(Debug, Clone)]
pub enum Value {
    Void,
    Bool(bool),
    Int(i32),
    Double(f64),
    Str(String),
    Array { elements: ArrayRef, base: BaseType },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub message: String,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl TypeMismatch {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ValueResult<T> = Result<T, TypeMismatch>;

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Array { .. } => "array",
        }
    }

    pub fn default_for(base: BaseType) -> Value {
        match base {
            BaseType::Bool => Value::Bool(false),
            BaseType::Int => Value::Int(0),
            BaseType::Double => Value::Double(0.0),
            BaseType::String => Value::Str(String::new()),
            BaseType::Void => Value::Void,
        }
    }

    /// Build an array of `dims.len()` dimensions, every leaf initialised to
    /// `base`'s default value (spec §4.6).
    pub fn new_array(base: BaseType, dims: &[usize]) -> Value {
        fn build(base: BaseType, dims: &[usize]) -> Value {
            match dims.split_first() {
                None => Value::default_for(base),
                Some((&n, rest)) => {
                    let elements = (0..n).map(|_| build(base, rest)).collect();
                    Value::Array {
                        elements: Rc::new(RefCell::new(elements)),
                        base,
                    }
                }
            }
        }
        build(base, dims)
    }

    pub fn to_int(&self) -> i32 {
        match self {
            Value::Void => 0,
            Value::Bool(b) => *b as i32,
            Value::Int(i) => *i,
            Value::Double(d) => *d as i32,
            Value::Str(s) => s.parse().unwrap_or(0),
            Value::Array { .. } => 0,
        }
    }

    pub fn to_double(&self) -> f64 {
        match self {
            Value::Void => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Int(i) => *i as f64,
            Value::Double(d) => *d,
            Value::Str(s) => s.parse().unwrap_or(0.0),
            Value::Array { .. } => 0.0,
        }
    }

    pub fn to_bool(&self) -> bool {
        match self {
            Value::Void => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Double(d) => *d != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Array { elements, .. } => !elements.borrow().is_empty(),
        }
    }

    pub fn to_display_string(&self) -> String {
        self.to_display_string_guarded(&mut Vec::new())
    }

    fn to_display_string_guarded(&self, seen: &mut Vec<*const RefCell<Vec<Value>>>) -> String {
        match self {
            Value::Void => "void".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Double(d) => format!("{d}"),
            Value::Str(s) => s.clone(),
            Value::Array { elements, .. } => {
                let ptr = Rc::as_ptr(elements);
                if seen.contains(&ptr) {
                    return "[...]".to_string();
                }
                seen.push(ptr);
                let rendered: Vec<String> = elements
                    .borrow()
                    .iter()
                    .map(|v| v.to_display_string_guarded(seen))
                    .collect();
                seen.pop();
                format!("[{}]", rendered.join(", "))
            }
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array { .. })
    }

    /// Same-type-only equality (spec §9: the historical cross-type
    /// `BasicValue::operator==` bug is not reproduced). Unlike `compare`,
    /// equality never promotes int/double against each other: `1 == 1.0`
    /// is a type mismatch, not `true`.
    pub fn values_eq(&self, other: &Value) -> ValueResult<bool> {
        match (self, other) {
            (Value::Void, Value::Void) => Ok(true),
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            (Value::Int(a), Value::Int(b)) => Ok(a == b),
            (Value::Double(a), Value::Double(b)) => Ok(a == b),
            (Value::Str(a), Value::Str(b)) => Ok(a == b),
            _ => Err(TypeMismatch::new(format!(
                "cannot compare values of type '{}' and '{}'",
                self.type_name(),
                other.type_name()
            ))),
        }
    }

    pub fn compare(&self, other: &Value) -> ValueResult<std::cmp::Ordering> {
        use std::cmp::Ordering;
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => Ok(a
                .to_double()
                .partial_cmp(&b.to_double())
                .unwrap_or(Ordering::Equal)),
            _ => Err(TypeMismatch::new(format!(
                "cannot compare values of type '{}' and '{}'",
                self.type_name(),
                other.type_name()
            ))),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Double(_))
    }

    /// `+`: string concatenation if either side is a string, numeric
    /// addition (int if both int, double otherwise) otherwise.
    pub fn add(&self, other: &Value) -> ValueResult<Value> {
        if matches!(self, Value::Str(_)) || matches!(other, Value::Str(_)) {
            return Ok(Value::Str(format!(
                "{}{}",
                self.to_display_string(),
                other.to_display_string()
            )));
        }
        self.numeric_op(other, i32::wrapping_add, |a, b| a + b)
    }

    pub fn sub(&self, other: &Value) -> ValueResult<Value> {
        self.numeric_op(other, i32::wrapping_sub, |a, b| a - b)
    }

    pub fn mul(&self, other: &Value) -> ValueResult<Value> {
        self.numeric_op(other, i32::wrapping_mul, |a, b| a * b)
    }

    /// `/`: int division by zero is a runtime error (the caller must check
    /// via [`Value::is_zero`] before calling); double division by zero
    /// yields IEEE infinity/NaN, which plain `f64` division already does.
    pub fn div(&self, other: &Value) -> ValueResult<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_div(*b))),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                Ok(Value::Double(a.to_double() / b.to_double()))
            }
            _ => Err(self.numeric_mismatch(other)),
        }
    }

    /// `%`: integer modulo for two ints, floating modulo otherwise (spec
    /// §9: the floating-modulo interpretation is the one kept).
    pub fn rem(&self, other: &Value) -> ValueResult<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_rem(*b))),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                Ok(Value::Double(a.to_double() % b.to_double()))
            }
            _ => Err(self.numeric_mismatch(other)),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(i) => *i == 0,
            Value::Double(d) => *d == 0.0,
            _ => false,
        }
    }

    fn numeric_op(
        &self,
        other: &Value,
        int_op: impl Fn(i32, i32) -> i32,
        double_op: impl Fn(f64, f64) -> f64,
    ) -> ValueResult<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(int_op(*a, *b))),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                Ok(Value::Double(double_op(a.to_double(), b.to_double())))
            }
            _ => Err(self.numeric_mismatch(other)),
        }
    }

    fn numeric_mismatch(&self, other: &Value) -> TypeMismatch {
        TypeMismatch::new(format!(
            "arithmetic requires numeric operands, got '{}' and '{}'",
            self.type_name(),
            other.type_name()
        ))
    }

    pub fn bitand(&self, other: &Value) -> ValueResult<Value> {
        self.int_op(other, |a, b| a & b)
    }

    pub fn bitor(&self, other: &Value) -> ValueResult<Value> {
        self.int_op(other, |a, b| a | b)
    }

    pub fn bitxor(&self, other: &Value) -> ValueResult<Value> {
        self.int_op(other, |a, b| a ^ b)
    }

    pub fn shl(&self, other: &Value) -> ValueResult<Value> {
        self.int_op(other, |a, b| a.wrapping_shl(b as u32))
    }

    pub fn shr(&self, other: &Value) -> ValueResult<Value> {
        self.int_op(other, |a, b| a.wrapping_shr(b as u32))
    }

    fn int_op(&self, other: &Value, op: impl Fn(i32, i32) -> i32) -> ValueResult<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(op(*a, *b))),
            _ => Err(TypeMismatch::new(format!(
                "bitwise/shift operators require int operands, got '{}' and '{}'",
                self.type_name(),
                other.type_name()
            ))),
        }
    }

    pub fn neg(&self) -> ValueResult<Value> {
        match self {
            Value::Int(i) => Ok(Value::Int(i.wrapping_neg())),
            Value::Double(d) => Ok(Value::Double(-d)),
            _ => Err(TypeMismatch::new(format!(
                "unary '-' requires a numeric operand, got '{}'",
                self.type_name()
            ))),
        }
    }

    pub fn pos(&self) -> ValueResult<Value> {
        match self {
            Value::Int(_) | Value::Double(_) => Ok(self.clone()),
            _ => Err(TypeMismatch::new(format!(
                "unary '+' requires a numeric operand, got '{}'",
                self.type_name()
            ))),
        }
    }

    pub fn bitnot(&self) -> ValueResult<Value> {
        match self {
            Value::Int(i) => Ok(Value::Int(!i)),
            _ => Err(TypeMismatch::new(format!(
                "unary '~' requires an int operand, got '{}'",
                self.type_name()
            ))),
        }
    }

    pub fn not(&self) -> Value {
        Value::Bool(!self.to_bool())
    }

    /// Coerce `self` to match `target` for assignment/parameter binding:
    /// int -> double auto-promotes, anything else must already match.
    pub fn coerce_to(&self, target: BaseType) -> ValueResult<Value> {
        match (self, target) {
            (Value::Bool(_), BaseType::Bool) => Ok(self.clone()),
            (Value::Int(_), BaseType::Int) => Ok(self.clone()),
            (Value::Double(_), BaseType::Double) => Ok(self.clone()),
            (Value::Int(i), BaseType::Double) => Ok(Value::Double(*i as f64)),
            (Value::Str(_), BaseType::String) => Ok(self.clone()),
            (Value::Void, BaseType::Void) => Ok(self.clone()),
            (Value::Array { base, .. }, target) if *base == target => Ok(self.clone()),
            _ => Err(TypeMismatch::new(format!(
                "cannot assign value of type '{}' to a '{:?}' destination",
                self.type_name(),
                target
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_int_of_to_string_round_trips() {
        for i in [-1, 0, 1, 42, i32::MIN, i32::MAX] {
            let v = Value::Int(i);
            assert_eq!(v.to_display_string().parse::<i32>().unwrap(), i);
        }
    }

    #[test]
    fn to_bool_is_idempotent() {
        for v in [Value::Int(0), Value::Int(5), Value::Str("".into()), Value::Str("x".into())] {
            let once = Value::Bool(v.to_bool());
            assert_eq!(once.to_bool(), v.to_bool());
        }
    }

    #[test]
    fn string_plus_int_concatenates() {
        let result = Value::Str("n=".into()).add(&Value::Int(42)).unwrap();
        match result {
            Value::Str(s) => assert_eq!(s, "n=42"),
            _ => panic!("expected string"),
        }
    }

    #[test]
    fn mixed_numeric_add_promotes_to_double() {
        let result = Value::Int(1).add(&Value::Double(2.5)).unwrap();
        assert!(matches!(result, Value::Double(d) if d == 3.5));
    }

    #[test]
    fn cross_type_equality_is_a_type_mismatch() {
        assert!(Value::Int(1).values_eq(&Value::Bool(true)).is_err());
    }

    #[test]
    fn int_and_double_equality_is_a_type_mismatch_unlike_relational_compare() {
        assert!(Value::Int(1).values_eq(&Value::Double(1.0)).is_err());
        assert!(Value::Int(1).compare(&Value::Double(1.0)).is_ok());
    }

    #[test]
    fn array_to_string_renders_recursively() {
        let elements = Rc::new(RefCell::new(vec![Value::Int(1), Value::Int(2)]));
        let array = Value::Array {
            elements,
            base: BaseType::Int,
        };
        assert_eq!(array.to_display_string(), "[1, 2]");
    }

    #[test]
    fn array_cycle_guard_renders_ellipsis() {
        let elements = Rc::new(RefCell::new(vec![]));
        let array = Value::Array {
            elements: elements.clone(),
            base: BaseType::Int,
        };
        elements.borrow_mut().push(array.clone());
        assert_eq!(array.to_display_string(), "[[...]]");
    }
}
