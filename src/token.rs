use std::fmt;

use crate::diagnostic::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    If,
    Elif,
    Else,
    While,
    For,
    In,
    Def,
    Return,
    Break,
    Continue,
    Try,
    Except,
    And,
    Or,
    Not,
    True,
    False,
    None,
    Global,

    // Literals and Identifiers
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),

    // Arithmetic Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Comparison Operators
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,

    Assign,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Dot,

    // Layout, synthesized by the lexer
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl Token {
    pub fn keyword(word: &str) -> Option<Token> {
        let token = match word {
            "if" => Token::If,
            "elif" => Token::Elif,
            "else" => Token::Else,
            "while" => Token::While,
            "for" => Token::For,
            "in" => Token::In,
            "def" => Token::Def,
            "return" => Token::Return,
            "break" => Token::Break,
            "continue" => Token::Continue,
            "try" => Token::Try,
            "except" => Token::Except,
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "True" => Token::True,
            "False" => Token::False,
            "None" => Token::None,
            "global" => Token::Global,
            _ => return None,
        };
        Some(token)
    }

    /// Category name used in the token table.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Ident(_) => "IDENTIFIER",
            Token::Int(_) => "INTEGER",
            Token::Float(_) => "FLOAT",
            Token::Str(_) => "STRING",
            Token::True | Token::False => "BOOLEAN",
            Token::If
            | Token::Elif
            | Token::Else
            | Token::While
            | Token::For
            | Token::In
            | Token::Def
            | Token::Return
            | Token::Break
            | Token::Continue
            | Token::Try
            | Token::Except
            | Token::And
            | Token::Or
            | Token::Not
            | Token::None
            | Token::Global => "KEYWORD",
            Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::Percent
            | Token::Eq
            | Token::NotEq
            | Token::Less
            | Token::LessEq
            | Token::Greater
            | Token::GreaterEq
            | Token::Assign => "OPERATOR",
            Token::LParen
            | Token::RParen
            | Token::LBracket
            | Token::RBracket
            | Token::Comma
            | Token::Colon
            | Token::Dot => "PUNCTUATION",
            Token::Newline => "NEWLINE",
            Token::Indent => "INDENT",
            Token::Dedent => "DEDENT",
            Token::Eof => "EOF",
        }
    }

    pub fn is_layout(&self) -> bool {
        matches!(self, Token::Newline | Token::Indent | Token::Dedent | Token::Eof)
    }

    fn symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            Token::If => "if",
            Token::Elif => "elif",
            Token::Else => "else",
            Token::While => "while",
            Token::For => "for",
            Token::In => "in",
            Token::Def => "def",
            Token::Return => "return",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::Try => "try",
            Token::Except => "except",
            Token::And => "and",
            Token::Or => "or",
            Token::Not => "not",
            Token::True => "True",
            Token::False => "False",
            Token::None => "None",
            Token::Global => "global",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Eq => "==",
            Token::NotEq => "!=",
            Token::Less => "<",
            Token::LessEq => "<=",
            Token::Greater => ">",
            Token::GreaterEq => ">=",
            Token::Assign => "=",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Dot => ".",
            _ => return None,
        };
        Some(symbol)
    }
}

/// Human-readable form for parser messages: `':'`, `identifier 'x'`, `NEWLINE`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(symbol) = self.symbol() {
            return write!(f, "'{}'", symbol);
        }
        match self {
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Int(n) => write!(f, "integer {}", n),
            Token::Float(n) => write!(f, "float {}", n),
            Token::Str(s) => write!(f, "string '{}'", s),
            other => write!(f, "{}", other.kind_name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    /// Exact source text; empty for layout tokens.
    pub text: String,
    pub span: Span,
    pub line: usize,
}

impl SpannedToken {
    pub fn new(token: Token, text: impl Into<String>, span: Span) -> Self {
        Self {
            token,
            text: text.into(),
            line: span.line,
            span,
        }
    }

    pub fn layout(token: Token, span: Span) -> Self {
        Self::new(token, "", span)
    }
}
