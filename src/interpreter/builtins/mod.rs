//! Built-in operations for the interpreter.
//!
//! - **String**: `strip`, `upper`, `lower`, `replace` methods
//! - **List**: `append`, `pop` methods plus index read/write
//! - **Generators**: `range`
//! - **IO**: `print`
//! - **Misc**: `len`
//!
//! Method builtins take the receiver as `args[0]`.

mod generators;
mod io;
mod list;
mod misc;
mod string;

pub use generators::*;
pub use io::*;
pub use list::*;
pub use misc::*;
pub use string::*;

use crate::value::Value;
use super::error::RuntimeError;

/// Checks the argument count of a method; `$n` excludes the receiver.
macro_rules! require_args {
    ($args:expr, $n:expr, $name:expr) => {
        if $args.len() != $n + 1 {
            return Err(RuntimeError::invalid_operation(format!(
                "{}() takes {} argument(s) ({} given)",
                $name,
                $n,
                $args.len().saturating_sub(1)
            )));
        }
    };
}

macro_rules! with_string {
    ($args:expr, $name:expr, $body:expr) => {
        match &$args[0] {
            Value::Str(s) => $body(s),
            other => Err(RuntimeError::type_error(format!(
                "{} requires str, got '{}'",
                $name,
                other.type_name()
            ))),
        }
    };
}

macro_rules! with_list {
    ($args:expr, $name:expr, $body:expr) => {
        match &$args[0] {
            Value::List(list) => $body(list),
            other => Err(RuntimeError::type_error(format!(
                "{} requires list, got '{}'",
                $name,
                other.type_name()
            ))),
        }
    };
}

pub(crate) use require_args;
pub(crate) use with_list;
pub(crate) use with_string;

/// Dispatches `receiver.method(args)` to the matching builtin.
pub fn call_method(receiver: &Value, method: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    let mut all = Vec::with_capacity(args.len() + 1);
    all.push(receiver.clone());
    all.extend_from_slice(args);

    match (receiver, method) {
        (Value::Str(_), "strip") => builtin_strip(&all),
        (Value::Str(_), "upper") => builtin_upper(&all),
        (Value::Str(_), "lower") => builtin_lower(&all),
        (Value::Str(_), "replace") => builtin_replace(&all),
        (Value::List(_), "append") => builtin_append(&all),
        (Value::List(_), "pop") => builtin_pop(&all),
        _ => Err(RuntimeError::invalid_operation(format!(
            "'{}' object has no attribute '{}'",
            receiver.type_name(),
            method
        ))),
    }
}
