use crate::value::Value;
use super::super::error::RuntimeError;

/// `len(x)` for lists and strings; string length counts characters.
pub fn builtin_len(value: &Value) -> Result<Value, RuntimeError> {
    let length = match value {
        Value::List(list) => list.borrow().len(),
        Value::Str(s) => s.chars().count(),
        other => {
            return Err(RuntimeError::type_error(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )))
        }
    };
    Ok(Value::Int(length as i64))
}
