use crate::ast::BinaryOp;
use crate::value::{ListPtr, Value};
use super::error::RuntimeError;
use std::cmp::Ordering;
use std::rc::Rc;

/// Language-level `==`: numbers compare by value across int and float,
/// lists element-wise, different kinds are never equal.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    equal_inner(a, b, &mut Vec::new())
}

// A pair of lists already under comparison counts as equal, which ends the
// walk on self-referencing lists.
fn equal_inner(a: &Value, b: &Value, open: &mut Vec<(ListPtr, ListPtr)>) -> bool {
    match (a, b) {
        (Value::None, Value::None) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => (*a as f64) == *b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            let pair = (Rc::as_ptr(a), Rc::as_ptr(b));
            if Rc::ptr_eq(a, b) || open.contains(&pair) {
                return true;
            }
            open.push(pair);
            let equal = {
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| equal_inner(x, y, open))
            };
            open.pop();
            equal
        }
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        _ => None,
    }
}

fn unsupported(op: BinaryOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::type_error(format!(
        "unsupported operand types for {}: '{}' and '{}'",
        op,
        left.type_name(),
        right.type_name()
    ))
}

fn overflow(op: BinaryOp) -> RuntimeError {
    RuntimeError::invalid_operation(format!("integer overflow in '{}'", op))
}

/// Applies an arithmetic operator (`+ - * / %`).
pub fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_arithmetic(op, *a, *b),
        (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::str(joined))
        }
        (Value::List(a), Value::List(b)) if op == BinaryOp::Add => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        _ => match (as_float(left), as_float(right)) {
            (Some(a), Some(b)) => float_arithmetic(op, a, b),
            _ => Err(unsupported(op, left, right)),
        },
    }
}

fn int_arithmetic(op: BinaryOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => return float_arithmetic(op, a as f64, b as f64),
        BinaryOp::Mod => {
            if b == 0 {
                return Err(RuntimeError::division_by_zero());
            }
            // `MIN % -1` is 0; only the intermediate quotient overflows.
            if b == -1 {
                return Ok(Value::Int(0));
            }
            // Result takes the sign of the divisor.
            a.checked_rem_euclid(b).map(|r| if b < 0 && r != 0 { r + b } else { r })
        }
        _ => return Err(RuntimeError::invalid_operation(format!("'{}' is not arithmetic", op))),
    };
    result.map(Value::Int).ok_or_else(|| overflow(op))
}

fn float_arithmetic(op: BinaryOp, a: f64, b: f64) -> Result<Value, RuntimeError> {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(RuntimeError::division_by_zero());
            }
            a / b
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                return Err(RuntimeError::division_by_zero());
            }
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) {
                r + b
            } else {
                r
            }
        }
        _ => return Err(RuntimeError::invalid_operation(format!("'{}' is not arithmetic", op))),
    };
    Ok(Value::Float(result))
}

/// Applies a comparison operator. Ordering is defined for number/number and
/// string/string only.
pub fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(values_equal(left, right))),
        BinaryOp::NotEq => return Ok(Value::Bool(!values_equal(left, right))),
        _ => {}
    }

    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => match (as_float(left), as_float(right)) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => {
                return Err(RuntimeError::type_error(format!(
                    "'{}' not supported between instances of '{}' and '{}'",
                    op,
                    left.type_name(),
                    right.type_name()
                )))
            }
        },
    };

    // NaN compares false on every ordering.
    let result = match ordering {
        Some(ordering) => match op {
            BinaryOp::Less => ordering == Ordering::Less,
            BinaryOp::LessEq => ordering != Ordering::Greater,
            BinaryOp::Greater => ordering == Ordering::Greater,
            BinaryOp::GreaterEq => ordering != Ordering::Less,
            _ => return Err(RuntimeError::invalid_operation(format!("'{}' is not a comparison", op))),
        },
        None => false,
    };
    Ok(Value::Bool(result))
}

pub fn negate(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Int(n) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::invalid_operation("integer overflow in unary '-'")),
        Value::Float(n) => Ok(Value::Float(-n)),
        other => Err(RuntimeError::type_error(format!(
            "bad operand type for unary -: '{}'",
            other.type_name()
        ))),
    }
}

/// Resolves a possibly negative list index against `length`.
pub fn normalize_index(index: i64, length: usize) -> Result<usize, RuntimeError> {
    let len = length as i64;
    let resolved = if index < 0 { index + len } else { index };
    if resolved < 0 || resolved >= len {
        return Err(RuntimeError::index_out_of_bounds(index, length));
    }
    Ok(resolved as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_arithmetic_stays_int() {
        assert_eq!(arithmetic(BinaryOp::Add, &Value::Int(2), &Value::Int(3)), Ok(Value::Int(5)));
        assert_eq!(arithmetic(BinaryOp::Mul, &Value::Int(-4), &Value::Int(3)), Ok(Value::Int(-12)));
    }

    #[test]
    fn test_division_always_float() {
        assert_eq!(arithmetic(BinaryOp::Div, &Value::Int(6), &Value::Int(3)), Ok(Value::Float(2.0)));
        assert_eq!(arithmetic(BinaryOp::Div, &Value::Int(7), &Value::Int(2)), Ok(Value::Float(3.5)));
    }

    #[test]
    fn test_modulo_follows_divisor_sign() {
        assert_eq!(arithmetic(BinaryOp::Mod, &Value::Int(-7), &Value::Int(3)), Ok(Value::Int(2)));
        assert_eq!(arithmetic(BinaryOp::Mod, &Value::Int(7), &Value::Int(-3)), Ok(Value::Int(-2)));
        assert_eq!(arithmetic(BinaryOp::Mod, &Value::Int(-7), &Value::Int(-3)), Ok(Value::Int(-1)));
        assert_eq!(arithmetic(BinaryOp::Mod, &Value::Float(-7.5), &Value::Int(2)), Ok(Value::Float(0.5)));
    }

    #[test]
    fn test_division_by_zero() {
        for op in [BinaryOp::Div, BinaryOp::Mod] {
            assert!(matches!(
                arithmetic(op, &Value::Int(1), &Value::Int(0)),
                Err(RuntimeError::DivisionByZero { .. })
            ));
            assert!(matches!(
                arithmetic(op, &Value::Float(1.0), &Value::Float(0.0)),
                Err(RuntimeError::DivisionByZero { .. })
            ));
        }
    }

    #[test]
    fn test_overflow_is_an_error() {
        let result = arithmetic(BinaryOp::Add, &Value::Int(i64::MAX), &Value::Int(1));
        assert!(matches!(result, Err(RuntimeError::InvalidOperation { .. })));
        assert!(negate(&Value::Int(i64::MIN)).is_err());
    }

    #[test]
    fn test_no_implicit_coercion() {
        let err = arithmetic(BinaryOp::Add, &Value::str("a"), &Value::Int(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type error: unsupported operand types for +: 'str' and 'int'"
        );
        assert!(arithmetic(BinaryOp::Add, &Value::Bool(true), &Value::Int(1)).is_err());
        assert!(arithmetic(BinaryOp::Mul, &Value::str("a"), &Value::Int(3)).is_err());
    }

    #[test]
    fn test_concatenation() {
        assert_eq!(arithmetic(BinaryOp::Add, &Value::str("ab"), &Value::str("cd")), Ok(Value::str("abcd")));
        let joined = arithmetic(
            BinaryOp::Add,
            &Value::list(vec![Value::Int(1)]),
            &Value::list(vec![Value::Int(2)]),
        )
        .unwrap();
        assert_eq!(joined.to_string(), "[1, 2]");
    }

    #[test]
    fn test_equality_across_numeric_kinds() {
        assert!(values_equal(&Value::Int(1), &Value::Float(1.0)));
        assert!(!values_equal(&Value::Int(1), &Value::str("1")));
        assert!(!values_equal(&Value::Bool(true), &Value::Int(1)));
        assert!(values_equal(
            &Value::list(vec![Value::Int(1), Value::str("a")]),
            &Value::list(vec![Value::Float(1.0), Value::str("a")])
        ));
    }

    #[test]
    fn test_modulo_by_minus_one_never_overflows() {
        assert_eq!(arithmetic(BinaryOp::Mod, &Value::Int(i64::MIN), &Value::Int(-1)), Ok(Value::Int(0)));
        assert_eq!(arithmetic(BinaryOp::Mod, &Value::Int(7), &Value::Int(-1)), Ok(Value::Int(0)));
    }

    #[test]
    fn test_equality_of_self_referencing_lists() {
        let make = || {
            let list = Value::list(vec![Value::Int(1)]);
            if let Value::List(items) = &list {
                items.borrow_mut().push(list.clone());
            }
            list
        };
        let (a, b) = (make(), make());
        assert!(values_equal(&a, &b));
        assert!(values_equal(&a, &a));
        assert!(!values_equal(&a, &Value::list(vec![Value::Int(2), Value::None])));
    }

    #[test]
    fn test_ordering() {
        assert_eq!(compare(BinaryOp::Less, &Value::Int(1), &Value::Float(1.5)), Ok(Value::Bool(true)));
        assert_eq!(compare(BinaryOp::GreaterEq, &Value::str("b"), &Value::str("a")), Ok(Value::Bool(true)));
        assert!(compare(BinaryOp::Less, &Value::str("a"), &Value::Int(1)).is_err());
        assert!(compare(BinaryOp::Less, &Value::list(vec![]), &Value::list(vec![])).is_err());
    }

    #[test]
    fn test_normalize_index() {
        assert_eq!(normalize_index(0, 3), Ok(0));
        assert_eq!(normalize_index(-1, 3), Ok(2));
        assert!(normalize_index(3, 3).is_err());
        assert!(normalize_index(-4, 3).is_err());
        assert!(normalize_index(0, 0).is_err());
    }
}
