use crate::value::Value;
use super::super::error::RuntimeError;
use super::{require_args, with_string};
use std::rc::Rc;

pub fn builtin_strip(args: &[Value]) -> Result<Value, RuntimeError> {
    require_args!(args, 0, "strip");
    with_string!(args, "strip", |s: &Rc<str>| Ok(Value::str(s.trim())))
}

pub fn builtin_upper(args: &[Value]) -> Result<Value, RuntimeError> {
    require_args!(args, 0, "upper");
    with_string!(args, "upper", |s: &Rc<str>| Ok(Value::str(s.to_uppercase())))
}

pub fn builtin_lower(args: &[Value]) -> Result<Value, RuntimeError> {
    require_args!(args, 0, "lower");
    with_string!(args, "lower", |s: &Rc<str>| Ok(Value::str(s.to_lowercase())))
}

pub fn builtin_replace(args: &[Value]) -> Result<Value, RuntimeError> {
    require_args!(args, 2, "replace");
    if let (Value::Str(s), Value::Str(from), Value::Str(to)) = (&args[0], &args[1], &args[2]) {
        Ok(Value::str(s.replace(from.as_ref(), to.as_ref())))
    } else {
        Err(RuntimeError::type_error("replace() arguments must be str"))
    }
}
