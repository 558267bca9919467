use minipy::{parse, tokenize};
use proptest::prelude::*;

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,6}",
        "[0-9]{1,6}",
        "[0-9]{1,3}\\.[0-9]{1,3}",
        "'[a-zA-Z0-9 ]{0,8}'",
        "\"[a-zA-Z0-9 ]{0,8}\"",
        prop::sample::select(vec![
            "+", "-", "*", "/", "%", "==", "!=", "<=", ">=", "<", ">", "=", "(", ")", "[", "]", ",", ":", ".",
        ])
        .prop_map(str::to_string),
    ]
}

fn line() -> impl Strategy<Value = String> {
    (prop::collection::vec(fragment(), 1..8), prop::option::of("[a-z ]{0,10}")).prop_map(|(parts, comment)| {
        let mut line = parts.join(" ");
        if let Some(comment) = comment {
            line.push_str("  # ");
            line.push_str(&comment);
        }
        line
    })
}

fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '#') => return &line[..i],
            _ => {}
        }
    }
    line
}

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

const PROGRAMS: &[&str] = &[
    "x = 1\ny = 2\nprint(x + y)",
    "def f(a, b):\n    if a < b:\n        return a\n    return b\nprint(f(1, 2))",
    "items = [1, [2, 3], 'a']\nfor i in range(0, 10, 2):\n    items.append(i)\n",
    "try:\n    x = 1 / 0\nexcept:\n    x = -1\nwhile x and not False:\n    x = x - 1\n",
];

proptest! {
    #[test]
    fn token_text_reproduces_source(lines in prop::collection::vec(line(), 1..6)) {
        let source = lines.join("\n");
        if let Ok(tokens) = tokenize(&source) {
            let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
            let expected: String = source.lines().map(strip_comment).collect();
            prop_assert_eq!(without_whitespace(&joined), without_whitespace(&expected));
        }
    }

    #[test]
    fn tokenize_never_panics(source in "[ -~\t\n]{0,80}") {
        let _ = tokenize(&source);
    }

    #[test]
    fn parse_is_deterministic(index in 0..PROGRAMS.len()) {
        let source = PROGRAMS[index];
        let first = parse(tokenize(source).unwrap()).unwrap();
        let second = parse(tokenize(source).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }
}
