use chumsky::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::diagnostic::{Diagnostic, Label, Span};
use crate::token::{SpannedToken, Token};

/// Columns a tab advances the indentation by.
pub const TAB_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub span: Span,
}

impl LexError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            line: span.line,
            span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.message.clone())
            .with_code("E0001")
            .with_label(Label::primary(self.span, ""))
    }
}

/// What the per-line lexer recognizes before validation.
#[derive(Debug, Clone, PartialEq)]
enum Lexeme<'a> {
    Token(Token),
    Number(&'a str),
    Unterminated,
    Unknown(char),
    Comment,
}

fn quoted<'a>(quote: &'static str) -> impl Parser<'a, &'a str, Lexeme<'a>, extra::Err<Rich<'a, char>>> {
    just(quote)
        .ignore_then(none_of(quote).repeated().to_slice())
        .then(just(quote).or_not())
        .map(|(body, close): (&str, Option<&str>)| match close {
            Some(_) => Lexeme::Token(Token::Str(body.to_string())),
            None => Lexeme::Unterminated,
        })
}

/// Lexes the content of one logical line (indentation already stripped).
///
/// Never fails on its own: unknown characters and unterminated strings come
/// back as lexemes so `tokenize` can report them with the right location.
fn line_lexer<'a>() -> impl Parser<'a, &'a str, Vec<(Lexeme<'a>, SimpleSpan)>, extra::Err<Rich<'a, char>>> {
    let comment = just('#').then(any().repeated()).to(Lexeme::Comment);

    let number = text::digits(10)
        .then(just('.').then(text::digits(10).or_not()).or_not())
        .to_slice()
        .map(Lexeme::Number);

    let word = text::ident().map(|word: &str| {
        Lexeme::Token(Token::keyword(word).unwrap_or_else(|| Token::Ident(word.to_string())))
    });

    let op_pair = choice((
        just("==").to(Token::Eq),
        just("!=").to(Token::NotEq),
        just("<=").to(Token::LessEq),
        just(">=").to(Token::GreaterEq),
    ));

    let op_single = choice((
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Star),
        just('/').to(Token::Slash),
        just('%').to(Token::Percent),
        just('<').to(Token::Less),
        just('>').to(Token::Greater),
        just('=').to(Token::Assign),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('[').to(Token::LBracket),
        just(']').to(Token::RBracket),
        just(',').to(Token::Comma),
        just(':').to(Token::Colon),
        just('.').to(Token::Dot),
    ));

    let op = op_pair.or(op_single).map(Lexeme::Token);

    let unknown = any().map(Lexeme::Unknown);

    let lexeme = choice((comment, number, quoted("\""), quoted("'"), word, op, unknown));

    lexeme
        .map_with(|lexeme, e| (lexeme, e.span()))
        .padded()
        .repeated()
        .collect()
        .then_ignore(end())
}

fn number_token(text: &str, span: Span) -> Result<Token, LexError> {
    if text.contains('.') {
        text.parse::<f64>()
            .map(Token::Float)
            .map_err(|_| LexError::new(format!("invalid float literal '{}'", text), span))
    } else {
        text.parse::<i64>()
            .map(Token::Int)
            .map_err(|_| LexError::new(format!("integer literal '{}' is too large", text), span))
    }
}

fn indent_width(prefix: &str, span: Span) -> Result<usize, LexError> {
    if prefix.contains(' ') && prefix.contains('\t') {
        return Err(LexError::new("inconsistent use of tabs and spaces in indentation", span));
    }
    Ok(prefix.chars().map(|c| if c == '\t' { TAB_WIDTH } else { 1 }).sum())
}

/// Tokenizes a whole program, synthesizing `Newline`, `Indent`, `Dedent` and
/// a final `Eof`.
///
/// Blank and comment-only lines do not affect indentation, and neither do
/// line breaks inside open parentheses or brackets.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let lexer = line_lexer();
    let mut tokens = Vec::new();
    let mut indents: Vec<usize> = vec![0];
    let mut nesting = 0usize;
    let mut offset = 0usize;
    let mut line_count = 0usize;

    for (index, raw_line) in source.split('\n').enumerate() {
        let line_no = index + 1;
        let line_start = offset;
        offset += raw_line.len() + 1;
        line_count = line_no;

        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        let body = line.trim_start_matches([' ', '\t']);
        if body.trim().is_empty() || body.starts_with('#') {
            continue;
        }
        let indent_len = line.len() - body.len();
        let body_start = line_start + indent_len;

        if nesting == 0 {
            let span = Span::new(line_start, body_start, line_no);
            let width = indent_width(&line[..indent_len], span)?;
            let top = indents.last().copied().unwrap_or(0);
            if width > top {
                indents.push(width);
                tokens.push(SpannedToken::layout(Token::Indent, span));
            } else {
                while width < indents.last().copied().unwrap_or(0) {
                    indents.pop();
                    tokens.push(SpannedToken::layout(Token::Dedent, span));
                }
                if width != indents.last().copied().unwrap_or(0) {
                    return Err(LexError::new(
                        "unindent does not match any outer indentation level",
                        span,
                    ));
                }
            }
        }

        let lexemes = lexer.parse(body).into_result().map_err(|errors| {
            let (message, at) = errors
                .first()
                .map(|e| (e.to_string(), e.span().start))
                .unwrap_or_else(|| ("invalid token".to_string(), 0));
            LexError::new(message, Span::new(body_start + at, body_start + at + 1, line_no))
        })?;

        for (lexeme, local) in lexemes {
            let span = Span::new(body_start + local.start, body_start + local.end, line_no);
            let text = &body[local.start..local.end];
            let token = match lexeme {
                Lexeme::Token(token) => token,
                Lexeme::Number(digits) => number_token(digits, span)?,
                Lexeme::Comment => continue,
                Lexeme::Unterminated => return Err(LexError::new("unterminated string literal", span)),
                Lexeme::Unknown(c) => {
                    return Err(LexError::new(format!("unrecognized character '{}'", c), span));
                }
            };
            match token {
                Token::LParen | Token::LBracket => nesting += 1,
                Token::RParen | Token::RBracket => nesting = nesting.saturating_sub(1),
                _ => {}
            }
            tokens.push(SpannedToken::new(token, text, span));
        }

        if nesting == 0 {
            let end = line_start + line.len();
            tokens.push(SpannedToken::layout(Token::Newline, Span::new(end, end, line_no)));
        }
    }

    let eof = Span::new(source.len(), source.len(), line_count.max(1));
    while indents.len() > 1 {
        indents.pop();
        tokens.push(SpannedToken::layout(Token::Dedent, eof));
    }
    tokens.push(SpannedToken::layout(Token::Eof, eof));

    debug!(tokens = tokens.len(), lines = line_count, "tokenized source");
    Ok(tokens)
}
