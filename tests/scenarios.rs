mod common;
use common::{run, run_err};
use minipy::interpreter::Interpreter;
use minipy::{parse, tokenize, Error, RuntimeError};
use pretty_assertions::assert_eq;

#[test]
fn test_add_two_variables() {
    assert_eq!(run("x = 1\ny = 2\nprint(x + y)"), "3\n");
}

#[test]
fn test_function_returns_sum() {
    assert_eq!(run("def add(a, b):\n    return a + b\nprint(add(2, 3))"), "5\n");
}

#[test]
fn test_loop_with_condition() {
    assert_eq!(
        run("nums = [1,2,3]\nfor n in nums:\n    if n > 1:\n        print(n)"),
        "2\n3\n"
    );
}

#[test]
fn test_try_catches_division_by_zero() {
    assert_eq!(
        run("x = 1\ny = 0\ntry:\n    print(x / y)\nexcept:\n    print('caught')"),
        "caught\n"
    );
}

#[test]
fn test_range_boundaries() {
    assert_eq!(run("print(range(3))"), "[0, 1, 2]\n");
    assert_eq!(run("print(range(1, 4))"), "[1, 2, 3]\n");
    assert_eq!(run("print(range(5, 0, -1))"), "[5, 4, 3, 2, 1]\n");
    assert_eq!(run("print(range(0))"), "[]\n");
}

#[test]
fn test_list_aliasing() {
    assert_eq!(run("a = [1]\nb = a\nb.append(2)\nprint(a)"), "[1, 2]\n");
}

#[test]
fn test_undefined_variable_halts() {
    let err = run_err("print(1)\nprint(missing)\nprint(2)");
    match err {
        Error::Runtime(RuntimeError::UndefinedVariable { name, span }) => {
            assert_eq!(name, "missing");
            assert_eq!(span.line, 2);
        }
        other => panic!("Expected undefined variable, got {:?}", other),
    }
}

const FACTORIAL: &str = "\
def factorial(n):
    if n <= 1:
        return 1
    return n * factorial(n - 1)
";

#[test]
fn test_factorial_below_limit() {
    assert_eq!(run(&format!("{}print(factorial(5))", FACTORIAL)), "120\n");
}

#[test]
fn test_factorial_above_limit_fails_cleanly() {
    let program = parse(tokenize(&format!("{}print(factorial(30))", FACTORIAL)).unwrap()).unwrap();
    let mut out = Vec::new();
    let err = Interpreter::new(&mut out).with_max_depth(10).run(&program).unwrap_err();
    assert!(matches!(err, RuntimeError::RecursionLimit { limit: 10, .. }));
    assert!(out.is_empty());
}

#[test]
fn test_fibonacci_and_string_building() {
    let source = "\
def fib(n):
    a = 0
    b = 1
    result = []
    while len(result) < n:
        result.append(a)
        following = a + b
        a = b
        b = following
    return result

line = ''
for value in fib(8):
    line = line + ' ' + 'x'
print(fib(8))
print(line.strip().upper().replace(' ', ''))
";
    assert_eq!(run(source), "[0, 1, 1, 2, 3, 5, 8, 13]\nXXXXXXXX\n");
}

#[test]
fn test_bubble_sort_in_place() {
    let source = "\
def sort(items):
    n = len(items)
    for i in range(n):
        for j in range(n - i - 1):
            if items[j] > items[j + 1]:
                tmp = items[j]
                items[j] = items[j + 1]
                items[j + 1] = tmp

data = [5, 3, 8, 1, 9, 2]
sort(data)
print(data)
";
    assert_eq!(run(source), "[1, 2, 3, 5, 8, 9]\n");
}
