//! Output built-ins.

use crate::value::Value;
use super::super::error::RuntimeError;
use std::io::Write;

/// Writes the `str()` forms of `args` separated by spaces, then a newline.
pub fn builtin_print<W: Write>(out: &mut W, args: &[Value]) -> Result<Value, RuntimeError> {
    let output: Vec<String> = args.iter().map(Value::to_string).collect();
    writeln!(out, "{}", output.join(" ")).map_err(RuntimeError::output)?;
    Ok(Value::None)
}
