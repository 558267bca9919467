use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::ast::Stmt;
use crate::interpreter::environment::Environment;

#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    /// Lists are shared: assignment and argument passing alias the same storage.
    List(Rc<RefCell<Vec<Value>>>),
    Function(Rc<Function>),
}

/// Structural equality, used to compare syntax trees. Language-level `==`
/// lives in `interpreter::value_utils`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    pub fn str(s: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(s.as_ref()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Function(_) => "function",
        }
    }

    pub fn as_list(&self) -> Option<Ref<'_, Vec<Value>>> {
        if let Value::List(list) = self {
            Some(list.borrow())
        } else {
            None
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        if let Value::Int(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(list) => !list.borrow().is_empty(),
            Value::Function(_) => true,
        }
    }

    /// Form used inside list displays: strings are quoted.
    pub fn repr(&self) -> String {
        Repr(self).to_string()
    }
}

fn format_float(n: f64) -> String {
    if n.is_nan() {
        "nan".to_string()
    } else if n.is_infinite() {
        let sign = if n < 0.0 { "-" } else { "" };
        format!("{}inf", sign)
    } else if n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

pub(crate) type ListPtr = *const RefCell<Vec<Value>>;

struct Repr<'a>(&'a Value);

impl fmt::Display for Repr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self.0, true, &mut Vec::new())
    }
}

/// Lists already being written are shown as `[...]`, so a list that
/// contains itself still prints.
fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, quoted: bool, open: &mut Vec<ListPtr>) -> fmt::Result {
    match value {
        Value::None => write!(f, "None"),
        Value::Bool(true) => write!(f, "True"),
        Value::Bool(false) => write!(f, "False"),
        Value::Int(n) => write!(f, "{}", n),
        Value::Float(n) => write!(f, "{}", format_float(*n)),
        Value::Str(s) if quoted => write!(f, "'{}'", s),
        Value::Str(s) => write!(f, "{}", s),
        Value::List(list) => {
            let ptr = Rc::as_ptr(list);
            if open.contains(&ptr) {
                return write!(f, "[...]");
            }
            open.push(ptr);
            write!(f, "[")?;
            for (i, item) in list.borrow().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_value(f, item, true, open)?;
            }
            open.pop();
            write!(f, "]")
        }
        Value::Function(func) => write!(f, "<function {}>", func.name),
    }
}

/// The `str()` form written by `print`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, false, &mut Vec::new())
    }
}

/// A user-defined function closed over its defining environment.
pub struct Function {
    pub name: Rc<str>,
    pub params: Vec<Rc<str>>,
    pub body: Rc<[Stmt]>,
    pub closure: Rc<Environment>,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
