use indexmap::IndexMap;
use serde_json::{json, Map, Value as JsonValue};

use crate::ast::{Child, Expr, Stmt};
use crate::diagnostic::Span;
use crate::token::SpannedToken;
use crate::value::Value;

/// Labels that always export as JSON arrays, under the plural key.
const LIST_LABELS: [&str; 3] = ["arg", "element", "param"];

/// One `KIND | TEXT | LINE` row per token.
pub fn token_table(tokens: &[SpannedToken]) -> String {
    let mut out = String::from("KIND | TEXT | LINE\n");
    for st in tokens {
        let text = if st.text.is_empty() { "-" } else { st.text.as_str() };
        out.push_str(&format!("{} | {} | {}\n", st.token.kind_name(), text, st.line));
    }
    out
}

pub fn tokens_to_json(tokens: &[SpannedToken]) -> JsonValue {
    JsonValue::Array(
        tokens
            .iter()
            .map(|st| {
                json!({
                    "kind": st.token.kind_name(),
                    "text": st.text,
                    "line": st.line,
                })
            })
            .collect(),
    )
}

/// Renders the program as an indented `├──`/`└──` tree.
pub fn render_ast(program: &[Stmt]) -> String {
    let mut out = String::from("Program\n");
    render_block(&mut out, program, "");
    out
}

fn push_line(out: &mut String, prefix: &str, last: bool, text: &str) {
    out.push_str(prefix);
    out.push_str(if last { "└── " } else { "├── " });
    out.push_str(text);
    out.push('\n');
}

fn nested_prefix(prefix: &str, last: bool) -> String {
    format!("{}{}", prefix, if last { "    " } else { "│   " })
}

fn render_block(out: &mut String, stmts: &[Stmt], prefix: &str) {
    for (i, stmt) in stmts.iter().enumerate() {
        let last = i + 1 == stmts.len();
        push_line(out, prefix, last, stmt.kind_name());
        render_children(out, stmt.children(), &nested_prefix(prefix, last));
    }
}

fn render_children(out: &mut String, children: Vec<(&'static str, Child<'_>)>, prefix: &str) {
    let count = children.len();
    for (i, (label, child)) in children.into_iter().enumerate() {
        let last = i + 1 == count;
        match child {
            Child::Attr(text) => push_line(out, prefix, last, &format!("{}: {}", label, text)),
            Child::Expr(expr) => {
                push_line(out, prefix, last, &format!("{}: {}", label, expr_label(expr)));
                render_children(out, expr.children(), &nested_prefix(prefix, last));
            }
            Child::Block(stmts) => {
                push_line(out, prefix, last, label);
                render_block(out, stmts, &nested_prefix(prefix, last));
            }
        }
    }
}

fn expr_label(expr: &Expr) -> String {
    match expr.literal() {
        Some(value) => format!("Literal {}", value.repr()),
        None => expr.kind_name().to_string(),
    }
}

pub fn ast_to_json(program: &[Stmt]) -> JsonValue {
    json!({
        "type": "Program",
        "body": program.iter().map(stmt_to_json).collect::<Vec<_>>(),
    })
}

fn stmt_to_json(stmt: &Stmt) -> JsonValue {
    node_to_json(stmt.kind_name(), stmt.span, stmt.children())
}

fn expr_to_json(expr: &Expr) -> JsonValue {
    if let Some(value) = expr.literal() {
        return json!({
            "type": "Literal",
            "line": expr.span.line,
            "value": literal_to_json(value),
        });
    }
    node_to_json(expr.kind_name(), expr.span, expr.children())
}

fn node_to_json(kind: &str, span: Span, children: Vec<(&'static str, Child<'_>)>) -> JsonValue {
    let mut grouped: IndexMap<&str, Vec<JsonValue>> = IndexMap::new();
    for (label, child) in children {
        let value = match child {
            Child::Attr(text) => json!(text),
            Child::Expr(expr) => expr_to_json(expr),
            Child::Block(stmts) => JsonValue::Array(stmts.iter().map(stmt_to_json).collect()),
        };
        grouped.entry(label).or_default().push(value);
    }

    let mut node = Map::new();
    node.insert("type".to_string(), json!(kind));
    node.insert("line".to_string(), json!(span.line));
    for (label, mut values) in grouped {
        if LIST_LABELS.contains(&label) || values.len() > 1 {
            node.insert(format!("{}s", label), JsonValue::Array(values));
        } else if let Some(value) = values.pop() {
            node.insert(label.to_string(), value);
        }
    }
    JsonValue::Object(node)
}

fn literal_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Int(n) => json!(n),
        Value::Float(n) => json!(n),
        Value::Str(s) => JsonValue::String(s.to_string()),
        Value::Bool(b) => json!(b),
        Value::None => JsonValue::Null,
        other => json!(other.to_string()),
    }
}
