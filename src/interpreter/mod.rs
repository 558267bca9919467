pub mod parser;
pub mod environment;
pub mod error;
pub mod control_flow;
pub mod builtins;
pub mod evaluator;
pub mod value_utils;

pub use error::{Error, RuntimeError};
pub use control_flow::ControlFlow;
pub use environment::Environment;
pub use parser::{parse, ParseError, TokenParser};
pub use evaluator::{execute, Interpreter, DEFAULT_MAX_DEPTH};
