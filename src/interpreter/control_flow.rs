use crate::value::Value;

/// How a statement finished. Loops consume `Break`/`Continue`; function calls
/// turn `Return` into their result.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Next,
    Return(Value),
    Break,
    Continue,
}
