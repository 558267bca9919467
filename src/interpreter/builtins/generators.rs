use crate::value::Value;
use super::super::error::RuntimeError;

fn range_arg(value: &Value) -> Result<i64, RuntimeError> {
    value.as_int().ok_or_else(|| {
        RuntimeError::type_error(format!(
            "range() arguments must be int, not '{}'",
            value.type_name()
        ))
    })
}

/// Materializes `range(start, stop, step)` as a list of ints.
pub fn builtin_range(start: Option<&Value>, stop: &Value, step: Option<&Value>) -> Result<Value, RuntimeError> {
    let start = start.map(range_arg).transpose()?.unwrap_or(0);
    let stop = range_arg(stop)?;
    let step = step.map(range_arg).transpose()?.unwrap_or(1);

    if step == 0 {
        return Err(RuntimeError::invalid_operation("range() arg 3 must not be zero"));
    }

    let mut result = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        result.push(Value::Int(current));
        current = match current.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(Value::list(result))
}
