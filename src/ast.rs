use std::fmt;
use std::rc::Rc;

use crate::diagnostic::Span;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEq => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Int, float, string, bool or None constant.
    Literal(Value),
    Identifier(Rc<str>),
    List {
        elements: Vec<Expr>,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `object.method(args)`; only call form is valid syntax.
    MethodCall {
        object: Box<Expr>,
        method: Rc<str>,
        args: Vec<Expr>,
    },
    Len(Box<Expr>),
    Range {
        start: Option<Box<Expr>>,
        stop: Box<Expr>,
        step: Option<Box<Expr>>,
    },
    Grouped(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Assign {
        name: Rc<str>,
        value: Expr,
    },
    IndexAssign {
        target: Expr,
        index: Expr,
        value: Expr,
    },
    Print(Vec<Expr>),
    /// An `elif` chain is an `If` nested as the only statement of `else_branch`.
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    For {
        var: Rc<str>,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    FunctionDef {
        name: Rc<str>,
        params: Vec<Rc<str>>,
        body: Rc<[Stmt]>,
    },
    Return(Option<Expr>),
    Break,
    Continue,
    TryExcept {
        try_body: Vec<Stmt>,
        except_body: Vec<Stmt>,
    },
    Global(Vec<Rc<str>>),
    Expr(Expr),
}

/// A labelled child of an AST node, for generic tree walkers.
#[derive(Debug, Clone, Copy)]
pub enum Child<'a> {
    Expr(&'a Expr),
    Block(&'a [Stmt]),
    Attr(&'a str),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal(_) => "Literal",
            ExprKind::Identifier(_) => "Identifier",
            ExprKind::List { .. } => "List",
            ExprKind::Index { .. } => "Index",
            ExprKind::Binary { .. } => "BinaryOp",
            ExprKind::Unary { .. } => "UnaryOp",
            ExprKind::Call { .. } => "Call",
            ExprKind::MethodCall { .. } => "MethodCall",
            ExprKind::Len(_) => "Len",
            ExprKind::Range { .. } => "Range",
            ExprKind::Grouped(_) => "Grouped",
        }
    }

    /// Literal values have no child nodes; use `literal` for their payload.
    pub fn children(&self) -> Vec<(&'static str, Child<'_>)> {
        match &self.kind {
            ExprKind::Literal(_) => Vec::new(),
            ExprKind::Identifier(name) => vec![("name", Child::Attr(name))],
            ExprKind::List { elements } => elements.iter().map(|e| ("element", Child::Expr(e))).collect(),
            ExprKind::Index { object, index } => {
                vec![("object", Child::Expr(object)), ("index", Child::Expr(index))]
            }
            ExprKind::Binary { left, op, right } => vec![
                ("left", Child::Expr(left)),
                ("op", Child::Attr(op.symbol())),
                ("right", Child::Expr(right)),
            ],
            ExprKind::Unary { op, expr } => vec![("op", Child::Attr(op.symbol())), ("operand", Child::Expr(expr))],
            ExprKind::Call { callee, args } => {
                let mut children = vec![("callee", Child::Expr(callee.as_ref()))];
                children.extend(args.iter().map(|a| ("arg", Child::Expr(a))));
                children
            }
            ExprKind::MethodCall { object, method, args } => {
                let mut children = vec![("object", Child::Expr(object.as_ref())), ("method", Child::Attr(method))];
                children.extend(args.iter().map(|a| ("arg", Child::Expr(a))));
                children
            }
            ExprKind::Len(expr) => vec![("arg", Child::Expr(expr))],
            ExprKind::Range { start, stop, step } => {
                let mut children = Vec::new();
                if let Some(start) = start {
                    children.push(("start", Child::Expr(start.as_ref())));
                }
                children.push(("stop", Child::Expr(stop.as_ref())));
                if let Some(step) = step {
                    children.push(("step", Child::Expr(step.as_ref())));
                }
                children
            }
            ExprKind::Grouped(expr) => vec![("expr", Child::Expr(expr))],
        }
    }

    pub fn literal(&self) -> Option<&Value> {
        match &self.kind {
            ExprKind::Literal(value) => Some(value),
            _ => None,
        }
    }
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StmtKind::Assign { .. } => "Assign",
            StmtKind::IndexAssign { .. } => "IndexAssign",
            StmtKind::Print(_) => "Print",
            StmtKind::If { .. } => "If",
            StmtKind::While { .. } => "While",
            StmtKind::For { .. } => "For",
            StmtKind::FunctionDef { .. } => "FunctionDef",
            StmtKind::Return(_) => "Return",
            StmtKind::Break => "Break",
            StmtKind::Continue => "Continue",
            StmtKind::TryExcept { .. } => "TryExcept",
            StmtKind::Global(_) => "Global",
            StmtKind::Expr(_) => "ExprStmt",
        }
    }

    pub fn children(&self) -> Vec<(&'static str, Child<'_>)> {
        match &self.kind {
            StmtKind::Assign { name, value } => vec![("name", Child::Attr(name)), ("value", Child::Expr(value))],
            StmtKind::IndexAssign { target, index, value } => vec![
                ("target", Child::Expr(target)),
                ("index", Child::Expr(index)),
                ("value", Child::Expr(value)),
            ],
            StmtKind::Print(args) => args.iter().map(|a| ("arg", Child::Expr(a))).collect(),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut children = vec![("condition", Child::Expr(condition)), ("then", Child::Block(then_branch))];
                if let Some(else_branch) = else_branch {
                    children.push(("else", Child::Block(else_branch)));
                }
                children
            }
            StmtKind::While { condition, body } => {
                vec![("condition", Child::Expr(condition)), ("body", Child::Block(body))]
            }
            StmtKind::For { var, iterable, body } => vec![
                ("var", Child::Attr(var)),
                ("iterable", Child::Expr(iterable)),
                ("body", Child::Block(body)),
            ],
            StmtKind::FunctionDef { name, params, body } => {
                let mut children = vec![("name", Child::Attr(name.as_ref()))];
                children.extend(params.iter().map(|p| ("param", Child::Attr(p))));
                children.push(("body", Child::Block(body)));
                children
            }
            StmtKind::Return(value) => value.iter().map(|v| ("value", Child::Expr(v))).collect(),
            StmtKind::Break | StmtKind::Continue => Vec::new(),
            StmtKind::TryExcept { try_body, except_body } => {
                vec![("try", Child::Block(try_body)), ("except", Child::Block(except_body))]
            }
            StmtKind::Global(names) => names.iter().map(|n| ("name", Child::Attr(n))).collect(),
            StmtKind::Expr(expr) => vec![("expr", Child::Expr(expr))],
        }
    }
}
