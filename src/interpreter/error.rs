use crate::diagnostic::{Diagnostic, Label, Span};
use crate::lexer::LexError;
use super::parser::ParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("name '{name}' is not defined")]
    UndefinedVariable { name: String, span: Span },
    #[error("type error: {message}")]
    TypeError { message: String, span: Span },
    #[error("list index {index} out of range for length {length}")]
    IndexOutOfBounds { index: i64, length: usize, span: Span },
    #[error("division by zero")]
    DivisionByZero { span: Span },
    #[error("invalid operation: {message}")]
    InvalidOperation { message: String, span: Span },
    #[error("maximum recursion depth exceeded (limit {limit})")]
    RecursionLimit { limit: usize, span: Span },
    #[error("failed to write output: {message}")]
    Output { message: String, span: Span },
}

impl RuntimeError {
    // Constructors without a location; the statement span is attached later.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError { message: message.into(), span: Span::dummy() }
    }

    pub fn index_out_of_bounds(index: i64, length: usize) -> Self {
        Self::IndexOutOfBounds { index, length, span: Span::dummy() }
    }

    pub fn division_by_zero() -> Self {
        Self::DivisionByZero { span: Span::dummy() }
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation { message: message.into(), span: Span::dummy() }
    }

    pub fn output(err: std::io::Error) -> Self {
        Self::Output { message: err.to_string(), span: Span::dummy() }
    }

    pub fn undefined_variable_at(name: impl Into<String>, span: Span) -> Self {
        Self::UndefinedVariable { name: name.into(), span }
    }

    pub fn invalid_operation_at(message: impl Into<String>, span: Span) -> Self {
        Self::InvalidOperation { message: message.into(), span }
    }

    pub fn recursion_limit_at(limit: usize, span: Span) -> Self {
        Self::RecursionLimit { limit, span }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UndefinedVariable { span, .. }
            | Self::TypeError { span, .. }
            | Self::IndexOutOfBounds { span, .. }
            | Self::DivisionByZero { span }
            | Self::InvalidOperation { span, .. }
            | Self::RecursionLimit { span, .. }
            | Self::Output { span, .. } => *span,
        }
    }

    fn span_mut(&mut self) -> &mut Span {
        match self {
            Self::UndefinedVariable { span, .. }
            | Self::TypeError { span, .. }
            | Self::IndexOutOfBounds { span, .. }
            | Self::DivisionByZero { span }
            | Self::InvalidOperation { span, .. }
            | Self::RecursionLimit { span, .. }
            | Self::Output { span, .. } => span,
        }
    }

    /// Source line of the failure, or 0 when unknown.
    pub fn line(&self) -> usize {
        self.span().line
    }

    pub fn with_span_if_missing(mut self, span: Span) -> Self {
        let current = self.span_mut();
        if current.is_dummy() {
            *current = span;
        }
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::UndefinedVariable { name, span } => {
                Diagnostic::error(format!("name '{}' is not defined", name))
                    .with_code("E0201")
                    .with_label(Label::primary(*span, "not found in this scope"))
            }
            Self::TypeError { message, span } => {
                Diagnostic::error(format!("type error: {}", message))
                    .with_code("E0202")
                    .with_label(Label::primary(*span, ""))
            }
            Self::IndexOutOfBounds { index, length, span } => {
                Diagnostic::error(format!("list index out of range: index is {} but length is {}", index, length))
                    .with_code("E0203")
                    .with_label(Label::primary(*span, format!("index {} is out of bounds", index)))
            }
            Self::DivisionByZero { span } => {
                Diagnostic::error("division by zero")
                    .with_code("E0204")
                    .with_label(Label::primary(*span, "division by zero here"))
            }
            Self::InvalidOperation { message, span } => {
                Diagnostic::error(format!("invalid operation: {}", message))
                    .with_code("E0205")
                    .with_label(Label::primary(*span, ""))
            }
            Self::RecursionLimit { limit, span } => {
                Diagnostic::error(format!("maximum recursion depth exceeded (limit {})", limit))
                    .with_code("E0206")
                    .with_label(Label::primary(*span, "recursion too deep"))
                    .with_help("raise the limit with --max-depth")
            }
            Self::Output { message, span } => Diagnostic::error(format!("failed to write output: {}", message))
                .with_code("E0207")
                .with_label(Label::primary(*span, "")),
        }
    }
}

/// Any failure of the tokenize, parse, execute pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn line(&self) -> usize {
        match self {
            Error::Lex(err) => err.line,
            Error::Parse(err) => err.line,
            Error::Runtime(err) => err.line(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Lex(err) => err.to_diagnostic(),
            Error::Parse(err) => err.to_diagnostic(),
            Error::Runtime(err) => err.to_diagnostic(),
        }
    }
}
