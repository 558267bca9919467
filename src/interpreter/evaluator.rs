use crate::ast::{BinaryOp, Expr, ExprKind, Stmt, StmtKind, UnaryOp};
use crate::diagnostic::Span;
use crate::lexer::tokenize;
use crate::value::{Function, Value};
use super::builtins;
use super::control_flow::ControlFlow;
use super::environment::Environment;
use super::error::{Error, RuntimeError};
use super::parser::parse;
use super::value_utils;
use std::io::Write;
use std::rc::Rc;
use tracing::{debug, trace};

/// Default ceiling on nested user function calls.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

// Native stack headroom per call; below it `stacker` switches to a new segment.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 2 * 1024 * 1024;

/// Tree-walking interpreter writing program output to `out`.
pub struct Interpreter<W: Write> {
    out: W,
    globals: Rc<Environment>,
    env: Rc<Environment>,
    depth: usize,
    max_depth: usize,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        let globals = Rc::new(Environment::new());
        Self {
            out,
            env: Rc::clone(&globals),
            globals,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn globals(&self) -> &Rc<Environment> {
        &self.globals
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs top-level statements. May be called repeatedly; bindings persist.
    pub fn run(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        debug!(statements = stmts.len(), "run started");
        let result = self.run_statements(stmts);
        let flushed = self.out.flush().map_err(RuntimeError::output);
        result?;
        flushed?;
        debug!("run finished");
        Ok(())
    }

    fn run_statements(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            match self.execute_statement(stmt)? {
                ControlFlow::Next => {}
                ControlFlow::Return(_) => {
                    return Err(RuntimeError::invalid_operation_at("'return' outside function", stmt.span));
                }
                flow => return Err(escaped_loop(&flow, stmt.span)),
            }
        }
        Ok(())
    }

    fn execute_block(&mut self, stmts: &[Stmt]) -> Result<ControlFlow, RuntimeError> {
        for stmt in stmts {
            match self.execute_statement(stmt)? {
                ControlFlow::Next => {}
                flow => return Ok(flow),
            }
        }
        Ok(ControlFlow::Next)
    }

    fn execute_statement(&mut self, stmt: &Stmt) -> Result<ControlFlow, RuntimeError> {
        self.execute_kind(&stmt.kind)
            .map_err(|err| err.with_span_if_missing(stmt.span))
    }

    fn execute_kind(&mut self, kind: &StmtKind) -> Result<ControlFlow, RuntimeError> {
        match kind {
            StmtKind::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.env.assign(name, value);
                Ok(ControlFlow::Next)
            }
            StmtKind::IndexAssign { target, index, value } => {
                let value = self.evaluate(value)?;
                let target = self.evaluate(target)?;
                let index = self.evaluate(index)?;
                builtins::builtin_set_index(&target, &index, value)?;
                Ok(ControlFlow::Next)
            }
            StmtKind::Print(args) => {
                let values = self.evaluate_all(args)?;
                builtins::builtin_print(&mut self.out, &values)?;
                Ok(ControlFlow::Next)
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch)
                } else {
                    Ok(ControlFlow::Next)
                }
            }
            StmtKind::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute_block(body)? {
                        ControlFlow::Break => break,
                        ControlFlow::Return(value) => return Ok(ControlFlow::Return(value)),
                        ControlFlow::Next | ControlFlow::Continue => {}
                    }
                }
                Ok(ControlFlow::Next)
            }
            StmtKind::For { var, iterable, body } => {
                let iterable = self.evaluate(iterable)?;
                // Iterate a snapshot so the body may mutate the list.
                let items = match iterable.as_list() {
                    Some(items) => items.clone(),
                    None => {
                        return Err(RuntimeError::type_error(format!(
                            "'{}' object is not iterable",
                            iterable.type_name()
                        )))
                    }
                };
                for item in items {
                    self.env.assign(var, item);
                    match self.execute_block(body)? {
                        ControlFlow::Break => break,
                        ControlFlow::Return(value) => return Ok(ControlFlow::Return(value)),
                        ControlFlow::Next | ControlFlow::Continue => {}
                    }
                }
                Ok(ControlFlow::Next)
            }
            StmtKind::FunctionDef { name, params, body } => {
                let function = Function {
                    name: Rc::clone(name),
                    params: params.clone(),
                    body: Rc::clone(body),
                    closure: Rc::clone(&self.env),
                };
                self.env.assign(name, Value::Function(Rc::new(function)));
                Ok(ControlFlow::Next)
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::None,
                };
                Ok(ControlFlow::Return(value))
            }
            StmtKind::Break => Ok(ControlFlow::Break),
            StmtKind::Continue => Ok(ControlFlow::Continue),
            StmtKind::TryExcept { try_body, except_body } => match self.execute_block(try_body) {
                Ok(flow) => Ok(flow),
                Err(err) => {
                    debug!(error = %err, line = err.line(), "exception handled by except block");
                    self.execute_block(except_body)
                }
            },
            StmtKind::Global(names) => {
                for name in names {
                    self.env.declare_global(name);
                }
                Ok(ControlFlow::Next)
            }
            StmtKind::Expr(expr) => {
                self.evaluate(expr)?;
                Ok(ControlFlow::Next)
            }
        }
    }

    fn evaluate_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, RuntimeError> {
        exprs.iter().map(|expr| self.evaluate(expr)).collect()
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        self.evaluate_kind(expr)
            .map_err(|err| err.with_span_if_missing(expr.span))
    }

    fn evaluate_kind(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(value.clone()),

            ExprKind::Identifier(name) => self
                .env
                .get(name)
                .ok_or_else(|| RuntimeError::undefined_variable_at(name.to_string(), expr.span)),

            ExprKind::List { elements } => Ok(Value::list(self.evaluate_all(elements)?)),

            ExprKind::Index { object, index } => {
                let object = self.evaluate(object)?;
                let index = self.evaluate(index)?;
                builtins::builtin_get_index(&object, &index)
            }

            ExprKind::Binary { left, op, right } => {
                let left = self.evaluate(left)?;
                match op {
                    BinaryOp::And if !left.is_truthy() => Ok(left),
                    BinaryOp::Or if left.is_truthy() => Ok(left),
                    BinaryOp::And | BinaryOp::Or => self.evaluate(right),
                    BinaryOp::Eq
                    | BinaryOp::NotEq
                    | BinaryOp::Less
                    | BinaryOp::LessEq
                    | BinaryOp::Greater
                    | BinaryOp::GreaterEq => {
                        let right = self.evaluate(right)?;
                        value_utils::compare(*op, &left, &right)
                    }
                    BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                        let right = self.evaluate(right)?;
                        value_utils::arithmetic(*op, &left, &right)
                    }
                }
            }

            ExprKind::Unary { op, expr } => {
                let value = self.evaluate(expr)?;
                match op {
                    UnaryOp::Neg => value_utils::negate(&value),
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                }
            }

            ExprKind::Call { callee, args } => {
                let callee = self.evaluate(callee)?;
                let args = self.evaluate_all(args)?;
                self.call_function(&callee, args, expr.span)
            }

            ExprKind::MethodCall { object, method, args } => {
                let receiver = self.evaluate(object)?;
                let args = self.evaluate_all(args)?;
                builtins::call_method(&receiver, method, &args)
            }

            ExprKind::Len(arg) => {
                let value = self.evaluate(arg)?;
                builtins::builtin_len(&value)
            }

            ExprKind::Range { start, stop, step } => {
                let start = start.as_deref().map(|e| self.evaluate(e)).transpose()?;
                let stop = self.evaluate(stop)?;
                let step = step.as_deref().map(|e| self.evaluate(e)).transpose()?;
                builtins::builtin_range(start.as_ref(), &stop, step.as_ref())
            }

            ExprKind::Grouped(inner) => self.evaluate(inner),
        }
    }

    /// Calls a user function in a fresh frame whose parent is the function's
    /// defining environment. The caller's environment is restored even when
    /// the body fails.
    pub fn call_function(&mut self, callee: &Value, args: Vec<Value>, span: Span) -> Result<Value, RuntimeError> {
        let Value::Function(function) = callee else {
            return Err(RuntimeError::invalid_operation_at(
                format!("'{}' object is not callable", callee.type_name()),
                span,
            ));
        };
        if args.len() != function.params.len() {
            return Err(RuntimeError::invalid_operation_at(
                format!(
                    "{}() takes {} positional argument(s) but {} were given",
                    function.name,
                    function.params.len(),
                    args.len()
                ),
                span,
            ));
        }
        if self.depth >= self.max_depth {
            return Err(RuntimeError::recursion_limit_at(self.max_depth, span));
        }

        let frame = Rc::new(Environment::with_parent(Rc::clone(&function.closure)));
        for (param, arg) in function.params.iter().zip(args) {
            frame.define(param, arg);
        }

        let saved = std::mem::replace(&mut self.env, frame);
        self.depth += 1;
        trace!(function = %function.name, depth = self.depth, "call");
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.execute_block(&function.body));
        self.depth -= 1;
        self.env = saved;

        match result? {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::Next => Ok(Value::None),
            flow => Err(escaped_loop(&flow, span)),
        }
    }
}

fn escaped_loop(flow: &ControlFlow, span: Span) -> RuntimeError {
    let keyword = match flow {
        ControlFlow::Continue => "continue",
        _ => "break",
    };
    RuntimeError::invalid_operation_at(format!("'{}' outside loop", keyword), span)
}

/// Tokenizes, parses and runs `source` with default settings.
pub fn execute<W: Write>(source: &str, out: W) -> Result<(), Error> {
    let tokens = tokenize(source)?;
    let program = parse(tokens)?;
    Interpreter::new(out).run(&program)?;
    Ok(())
}
