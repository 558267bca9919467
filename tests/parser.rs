use minipy::ast::{BinaryOp, ExprKind, StmtKind};
use minipy::format::render_ast;
use minipy::{parse, tokenize, Error, ParseError, Stmt};
use pretty_assertions::assert_eq;

fn parse_source(source: &str) -> Vec<Stmt> {
    parse(tokenize(source).expect("Lexer failed")).expect("Parser failed")
}

fn parse_error(source: &str) -> ParseError {
    match tokenize(source).map_err(Error::from).and_then(|t| parse(t).map_err(Error::from)) {
        Err(Error::Parse(err)) => err,
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_precedence_tree() {
    let program = parse_source("x = 1 + 2 * 3 == 7 and not False");
    let StmtKind::Assign { value, .. } = &program[0].kind else {
        panic!("Expected assignment");
    };
    let ExprKind::Binary { op, left, .. } = &value.kind else {
        panic!("Expected binary");
    };
    assert_eq!(*op, BinaryOp::And);
    let ExprKind::Binary { op, left, .. } = &left.kind else {
        panic!("Expected comparison");
    };
    assert_eq!(*op, BinaryOp::Eq);
    assert!(matches!(&left.kind, ExprKind::Binary { op: BinaryOp::Add, .. }));
}

#[test]
fn test_left_associative_subtraction() {
    let program = parse_source("x = 10 - 3 - 2");
    let StmtKind::Assign { value, .. } = &program[0].kind else {
        panic!("Expected assignment");
    };
    let ExprKind::Binary { left, op: BinaryOp::Sub, .. } = &value.kind else {
        panic!("Expected subtraction");
    };
    assert!(matches!(&left.kind, ExprKind::Binary { op: BinaryOp::Sub, .. }));
}

#[test]
fn test_statement_lines() {
    let program = parse_source("x = 1\n\nif x:\n    y = 2\nprint(x)");
    let lines: Vec<usize> = program.iter().map(|s| s.span.line).collect();
    assert_eq!(lines, vec![1, 3, 5]);
}

#[test]
fn test_elif_nests_into_else() {
    let program = parse_source("if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3");
    let StmtKind::If { else_branch: Some(else_branch), .. } = &program[0].kind else {
        panic!("Expected if with else");
    };
    assert!(matches!(&else_branch[0].kind, StmtKind::If { else_branch: Some(_), .. }));
}

#[test]
fn test_render_function_tree() {
    let program = parse_source("def add(a, b):\n    return a + b");
    let expected = "\
Program
└── FunctionDef
    ├── name: add
    ├── param: a
    ├── param: b
    └── body
        └── Return
            └── value: BinaryOp
                ├── left: Identifier
                │   └── name: a
                ├── op: +
                └── right: Identifier
                    └── name: b
";
    assert_eq!(render_ast(&program), expected);
}

#[test]
fn test_missing_colon() {
    let err = parse_error("while x\n    x = 1");
    assert_eq!(err.line, 1);
    assert!(err.message.starts_with("expected ':'"), "{}", err.message);
}

#[test]
fn test_missing_indented_block() {
    let err = parse_error("def f():\nreturn 1");
    assert_eq!(err.message, "expected an indented block");
    assert_eq!(err.line, 2);
}

#[test]
fn test_unexpected_eof() {
    let err = parse_error("x = (1 +");
    assert!(err.message.starts_with("expected expression"), "{}", err.message);
}

#[test]
fn test_invalid_assignment_target() {
    let err = parse_error("f() = 3");
    assert!(err.message.starts_with("cannot assign to"), "{}", err.message);
}

#[test]
fn test_else_without_if() {
    assert!(parse_error("else:\n    x = 1").message.contains("without a matching block"));
}

#[test]
fn test_try_requires_except() {
    assert!(parse_error("try:\n    x = 1\ny = 2").message.contains("'except'"));
}

#[test]
fn test_duplicate_parameter() {
    assert!(parse_error("def f(a, a):\n    return a").message.contains("duplicate parameter 'a'"));
}

#[test]
fn test_attribute_access_rejected() {
    let err = parse_error("x = items.size");
    assert!(err.help.is_some());
}

#[test]
fn test_len_arity_checked_when_parsing() {
    assert_eq!(parse_error("len(1, 2)").message, "len() takes exactly one argument (2 given)");
    assert_eq!(parse_error("range()").message, "range() takes 1 to 3 arguments");
}

#[test]
fn test_if_without_else() {
    let program = parse_source("if x:\n    y = 1");
    assert!(matches!(&program[0].kind, StmtKind::If { else_branch: None, .. }));
}

#[test]
fn test_trailing_comma_rejected() {
    assert_eq!(parse_error("print(1,)").message, "expected expression, found ')'");
    assert_eq!(parse_error("f(a,)").message, "expected expression, found ')'");
    assert_eq!(parse_error("x = [1, 2,]").message, "expected expression, found ']'");
    assert!(parse_error("def f(a,):\n    return a").message.starts_with("expected parameter name"));
}
