use crate::ast::{BinaryOp, Expr, ExprKind, Stmt, StmtKind, UnaryOp};
use crate::diagnostic::{Diagnostic, Label, Span};
use crate::token::{SpannedToken, Token};
use crate::value::Value;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub span: Span,
    pub help: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            line: span.line,
            span,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.message.clone())
            .with_code("E0101")
            .with_label(Label::primary(self.span, ""));
        match &self.help {
            Some(help) => diag.with_help(help.clone()),
            None => diag,
        }
    }
}

/// Parses a token stream produced by `tokenize` into top-level statements.
pub fn parse(tokens: Vec<SpannedToken>) -> Result<Vec<Stmt>, ParseError> {
    let statements = TokenParser::new(tokens).parse_program()?;
    debug!(statements = statements.len(), "parsed program");
    Ok(statements)
}

/// Recursive-descent parser over lexer tokens.
///
/// Precedence, lowest first: `or`, `and`, `not`, comparisons, `+ -`,
/// `* / %`, unary minus, postfix (call, index, method call), primary.
pub struct TokenParser {
    tokens: Vec<SpannedToken>,
    current: usize,
}

impl TokenParser {
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        if !matches!(tokens.last(), Some(SpannedToken { token: Token::Eof, .. })) {
            let span = tokens
                .last()
                .map(|st| Span::new(st.span.end, st.span.end, st.span.line))
                .unwrap_or_else(|| Span::new(0, 0, 1));
            tokens.push(SpannedToken::layout(Token::Eof, span));
        }
        Self { tokens, current: 0 }
    }

    // `current` never moves past the trailing Eof, so indexing is in bounds.
    fn peek(&self) -> &Token {
        &self.tokens[self.current].token
    }

    fn peek_next(&self) -> &Token {
        let index = (self.current + 1).min(self.tokens.len() - 1);
        &self.tokens[index].token
    }

    fn current_span(&self) -> Span {
        self.tokens[self.current].span
    }

    fn previous_span(&self) -> Span {
        if self.current > 0 {
            self.tokens[self.current - 1].span
        } else {
            self.current_span()
        }
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn advance(&mut self) -> SpannedToken {
        let st = self.tokens[self.current].clone();
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        }
        st
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::new(format!("expected {}, found {}", expected, self.peek()), self.current_span())
    }

    fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        if self.check(&expected) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<(Rc<str>, Span), ParseError> {
        match self.peek() {
            Token::Ident(name) => {
                let name = Rc::from(name.as_str());
                Ok((name, self.advance().span))
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span())
    }

    pub fn parse_program(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.check(&Token::Eof) {
            if self.check(&Token::Newline) {
                self.advance();
                continue;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek() {
            Token::If => self.parse_if_statement(),
            Token::While => self.parse_while_statement(),
            Token::For => self.parse_for_statement(),
            Token::Def => self.parse_function_statement(),
            Token::Try => self.parse_try_statement(),
            Token::Indent => Err(ParseError::new("unexpected indent", self.current_span())),
            Token::Elif | Token::Else | Token::Except => Err(ParseError::new(
                format!("{} without a matching block", self.peek()),
                self.current_span(),
            )),
            _ => self.parse_simple_statement(),
        }
    }

    /// One simple statement terminated by the end of its line.
    fn parse_simple_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        let kind = match self.peek() {
            Token::Return => {
                self.advance();
                if self.at_line_end() {
                    StmtKind::Return(None)
                } else {
                    StmtKind::Return(Some(self.parse_expression()?))
                }
            }
            Token::Break => {
                self.advance();
                StmtKind::Break
            }
            Token::Continue => {
                self.advance();
                StmtKind::Continue
            }
            Token::Global => {
                self.advance();
                let mut names = vec![self.expect_ident("identifier after 'global'")?.0];
                while self.check(&Token::Comma) {
                    self.advance();
                    names.push(self.expect_ident("identifier")?.0);
                }
                StmtKind::Global(names)
            }
            Token::Ident(name) if name == "print" && self.peek_next() == &Token::LParen => {
                self.advance();
                StmtKind::Print(self.parse_arguments()?)
            }
            _ => self.parse_assignment_or_expression()?,
        };
        let span = self.span_from(start);
        self.expect_line_end()?;
        Ok(Stmt::new(kind, span))
    }

    fn parse_assignment_or_expression(&mut self) -> Result<StmtKind, ParseError> {
        let expr = self.parse_expression()?;
        if !self.check(&Token::Assign) {
            return Ok(StmtKind::Expr(expr));
        }
        self.advance();
        let value = self.parse_expression()?;
        match expr.kind {
            ExprKind::Identifier(name) => Ok(StmtKind::Assign { name, value }),
            ExprKind::Index { object, index } => Ok(StmtKind::IndexAssign {
                target: *object,
                index: *index,
                value,
            }),
            _ => Err(ParseError::new(
                format!("cannot assign to {}", describe_target(&expr.kind)),
                expr.span,
            )),
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek(), Token::Newline | Token::Eof | Token::Dedent)
    }

    fn expect_line_end(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            Token::Newline => {
                self.advance();
                Ok(())
            }
            Token::Eof | Token::Dedent => Ok(()),
            _ => Err(self.unexpected("end of line")),
        }
    }

    /// `:` followed by either an indented block or one simple statement.
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(Token::Colon)?;
        if !self.check(&Token::Newline) {
            return Ok(vec![self.parse_simple_statement()?]);
        }
        self.advance();
        if !self.check(&Token::Indent) {
            return Err(ParseError::new("expected an indented block", self.current_span())
                .with_help("indent the statements that belong to this block"));
        }
        self.advance();
        let mut body = Vec::new();
        while !self.check(&Token::Dedent) && !self.check(&Token::Eof) {
            body.push(self.parse_statement()?);
        }
        self.expect(Token::Dedent)?;
        Ok(body)
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        // Entered on either `if` or `elif`.
        let start = self.advance().span;
        let condition = self.parse_expression()?;
        let span = self.span_from(start);
        let then_branch = self.parse_block()?;
        let else_branch = match self.peek() {
            Token::Elif => Some(vec![self.parse_if_statement()?]),
            Token::Else => {
                self.advance();
                Some(self.parse_block()?)
            }
            _ => None,
        };
        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.expect(Token::While)?;
        let condition = self.parse_expression()?;
        let span = self.span_from(start);
        let body = self.parse_block()?;
        Ok(Stmt::new(StmtKind::While { condition, body }, span))
    }

    fn parse_for_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.expect(Token::For)?;
        let (var, _) = self.expect_ident("identifier in for loop")?;
        self.expect(Token::In)?;
        let iterable = self.parse_expression()?;
        let span = self.span_from(start);
        let body = self.parse_block()?;
        Ok(Stmt::new(StmtKind::For { var, iterable, body }, span))
    }

    fn parse_function_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.expect(Token::Def)?;
        let (name, _) = self.expect_ident("function name")?;
        self.expect(Token::LParen)?;
        let mut params: Vec<Rc<str>> = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                let (param, param_span) = self.expect_ident("parameter name")?;
                if params.contains(&param) {
                    return Err(ParseError::new(
                        format!("duplicate parameter '{}' in function definition", param),
                        param_span,
                    ));
                }
                params.push(param);
                if !self.check(&Token::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.expect(Token::RParen)?;
        let span = self.span_from(start);
        let body = self.parse_block()?;
        Ok(Stmt::new(
            StmtKind::FunctionDef {
                name,
                params,
                body: body.into(),
            },
            span,
        ))
    }

    fn parse_try_statement(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(Token::Try)?;
        let try_body = self.parse_block()?;
        if !self.check(&Token::Except) {
            return Err(self.unexpected("'except'"));
        }
        self.advance();
        let except_body = self.parse_block()?;
        Ok(Stmt::new(StmtKind::TryExcept { try_body, except_body }, span))
    }

    /// Comma-separated expressions between parentheses; no trailing comma.
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(Token::LParen)?;
        let args = self.parse_expression_list(&Token::RParen)?;
        self.expect(Token::RParen)?;
        Ok(args)
    }

    fn parse_expression_list(&mut self, close: &Token) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        if self.check(close) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_expression()?);
            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }
        Ok(items)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
        let span = left.span.merge(right.span);
        Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.check(&Token::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Self::binary(left, BinaryOp::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;
        while self.check(&Token::And) {
            self.advance();
            let right = self.parse_not()?;
            left = Self::binary(left, BinaryOp::And, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if !self.check(&Token::Not) {
            return self.parse_comparison();
        }
        let start = self.advance().span;
        let operand = self.parse_not()?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op: UnaryOp::Not,
                expr: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Token::Eq => BinaryOp::Eq,
                Token::NotEq => BinaryOp::NotEq,
                Token::Less => BinaryOp::Less,
                Token::LessEq => BinaryOp::LessEq,
                Token::Greater => BinaryOp::Greater,
                Token::GreaterEq => BinaryOp::GreaterEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Self::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Self::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Self::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if !self.check(&Token::Minus) {
            return self.parse_postfix();
        }
        let start = self.advance().span;
        let operand = self.parse_unary()?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op: UnaryOp::Neg,
                expr: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                Token::LParen => {
                    let args = self.parse_arguments()?;
                    let span = self.span_from(expr.span);
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                Token::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(Token::RBracket)?;
                    let span = self.span_from(expr.span);
                    expr = Expr::new(
                        ExprKind::Index {
                            object: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                Token::Dot => {
                    self.advance();
                    let (method, method_span) = self.expect_ident("method name after '.'")?;
                    if !self.check(&Token::LParen) {
                        return Err(ParseError::new(
                            format!("expected '(' after method name '{}'", method),
                            method_span,
                        )
                        .with_help("only method calls are supported, not attribute access"));
                    }
                    let args = self.parse_arguments()?;
                    let span = self.span_from(expr.span);
                    expr = Expr::new(
                        ExprKind::MethodCall {
                            object: Box::new(expr),
                            method,
                            args,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        let literal = match self.peek() {
            Token::Int(n) => Some(Value::Int(*n)),
            Token::Float(n) => Some(Value::Float(*n)),
            Token::Str(s) => Some(Value::str(s)),
            Token::True => Some(Value::Bool(true)),
            Token::False => Some(Value::Bool(false)),
            Token::None => Some(Value::None),
            _ => None,
        };
        if let Some(value) = literal {
            self.advance();
            return Ok(Expr::new(ExprKind::Literal(value), span));
        }

        match self.peek() {
            Token::Ident(name) if name == "range" && self.peek_next() == &Token::LParen => self.parse_range(),
            Token::Ident(name) if name == "len" && self.peek_next() == &Token::LParen => self.parse_len(),
            Token::Ident(_) => {
                let (name, span) = self.expect_ident("identifier")?;
                Ok(Expr::new(ExprKind::Identifier(name), span))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(Expr::new(ExprKind::Grouped(Box::new(inner)), self.span_from(span)))
            }
            Token::LBracket => {
                self.advance();
                let elements = self.parse_expression_list(&Token::RBracket)?;
                self.expect(Token::RBracket)?;
                Ok(Expr::new(ExprKind::List { elements }, self.span_from(span)))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_range(&mut self) -> Result<Expr, ParseError> {
        let start_span = self.advance().span;
        let mut args = self.parse_arguments()?.into_iter().map(Box::new);
        let span = self.span_from(start_span);
        let kind = match (args.next(), args.next(), args.next(), args.next()) {
            (Some(stop), None, None, None) => ExprKind::Range {
                start: None,
                stop,
                step: None,
            },
            (Some(start), Some(stop), step, None) => ExprKind::Range {
                start: Some(start),
                stop,
                step,
            },
            _ => {
                return Err(ParseError::new("range() takes 1 to 3 arguments", span));
            }
        };
        Ok(Expr::new(kind, span))
    }

    fn parse_len(&mut self) -> Result<Expr, ParseError> {
        let start_span = self.advance().span;
        let mut args = self.parse_arguments()?;
        let span = self.span_from(start_span);
        if args.len() != 1 {
            return Err(ParseError::new(
                format!("len() takes exactly one argument ({} given)", args.len()),
                span,
            ));
        }
        let arg = args.remove(0);
        Ok(Expr::new(ExprKind::Len(Box::new(arg)), span))
    }
}

fn describe_target(kind: &ExprKind) -> &'static str {
    match kind {
        ExprKind::Literal(_) => "literal",
        ExprKind::Call { .. } | ExprKind::MethodCall { .. } | ExprKind::Len(_) | ExprKind::Range { .. } => {
            "function call"
        }
        ExprKind::Binary { .. } | ExprKind::Unary { .. } => "operator expression",
        _ => "expression",
    }
}
