pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod format;
pub mod interpreter;
pub mod lexer;
pub mod token;
pub mod value;

pub use ast::{Expr, ExprKind, Stmt, StmtKind};
pub use interpreter::{execute, parse, Error, Interpreter, ParseError, RuntimeError};
pub use lexer::{tokenize, LexError};
pub use token::{SpannedToken, Token};
pub use value::Value;
