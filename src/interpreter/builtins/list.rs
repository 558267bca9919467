use crate::value::Value;
use super::super::error::RuntimeError;
use super::super::value_utils::normalize_index;
use super::{require_args, with_list};
use std::cell::RefCell;
use std::rc::Rc;

fn int_index(index: &Value) -> Result<i64, RuntimeError> {
    index.as_int().ok_or_else(|| {
        RuntimeError::type_error(format!(
            "list indices must be integers, not '{}'",
            index.type_name()
        ))
    })
}

/// `list[index]`, with negative indices counting from the end.
pub fn builtin_get_index(target: &Value, index: &Value) -> Result<Value, RuntimeError> {
    let Value::List(list) = target else {
        return Err(RuntimeError::type_error(format!(
            "'{}' object is not subscriptable",
            target.type_name()
        )));
    };
    let items = list.borrow();
    let position = normalize_index(int_index(index)?, items.len())?;
    Ok(items[position].clone())
}

/// `list[index] = value`, mutating the shared list in place.
pub fn builtin_set_index(target: &Value, index: &Value, value: Value) -> Result<(), RuntimeError> {
    let Value::List(list) = target else {
        return Err(RuntimeError::type_error(format!(
            "'{}' object does not support item assignment",
            target.type_name()
        )));
    };
    let mut items = list.borrow_mut();
    let position = normalize_index(int_index(index)?, items.len())?;
    items[position] = value;
    Ok(())
}

pub fn builtin_append(args: &[Value]) -> Result<Value, RuntimeError> {
    require_args!(args, 1, "append");
    with_list!(args, "append", |list: &Rc<RefCell<Vec<Value>>>| {
        list.borrow_mut().push(args[1].clone());
        Ok(Value::None)
    })
}

/// `pop()` removes the last element, `pop(i)` the element at `i`.
pub fn builtin_pop(args: &[Value]) -> Result<Value, RuntimeError> {
    if args.len() > 2 {
        return Err(RuntimeError::invalid_operation(format!(
            "pop() takes at most 1 argument ({} given)",
            args.len() - 1
        )));
    }
    let index = match args.get(1) {
        Some(index) => int_index(index)?,
        None => -1,
    };
    with_list!(args, "pop", |list: &Rc<RefCell<Vec<Value>>>| -> Result<Value, RuntimeError> {
        let mut items = list.borrow_mut();
        let position = normalize_index(index, items.len())?;
        Ok(items.remove(position))
    })
}
