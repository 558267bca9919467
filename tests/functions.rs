mod common;
use common::{run, run_err};
use minipy::{Error, RuntimeError};
use pretty_assertions::assert_eq;

#[test]
fn test_function_without_return_yields_none() {
    assert_eq!(run("def noop():\n    x = 1\nprint(noop())"), "None\n");
}

#[test]
fn test_bare_return() {
    assert_eq!(run("def f():\n    return\nprint(f())"), "None\n");
}

#[test]
fn test_locals_do_not_leak() {
    let err = run_err("def f():\n    local = 1\nf()\nprint(local)");
    assert!(matches!(err, Error::Runtime(RuntimeError::UndefinedVariable { .. })));
}

#[test]
fn test_assignment_in_function_shadows_global() {
    assert_eq!(run("x = 1\ndef f():\n    x = 2\n    return x\nprint(f(), x)"), "2 1\n");
}

#[test]
fn test_global_declaration_rebinds_module_variable() {
    let source = "\
count = 0
def bump():
    global count
    count = count + 1
bump()
bump()
print(count)
";
    assert_eq!(run(source), "2\n");
}

#[test]
fn test_functions_are_values() {
    let source = "\
def double(x):
    return x * 2
def apply(f, value):
    return f(value)
g = double
print(apply(g, 21))
print(double)
";
    assert_eq!(run(source), "42\n<function double>\n");
}

#[test]
fn test_closure_sees_defining_scope() {
    let source = "\
def make_adder(n):
    def add(x):
        return x + n
    return add
add5 = make_adder(5)
print(add5(10))
";
    assert_eq!(run(source), "15\n");
}

#[test]
fn test_mutual_recursion() {
    let source = "\
def is_even(n):
    if n == 0:
        return True
    return is_odd(n - 1)
def is_odd(n):
    if n == 0:
        return False
    return is_even(n - 1)
print(is_even(10), is_odd(7))
";
    assert_eq!(run(source), "True True\n");
}

#[test]
fn test_arity_mismatch() {
    let err = run_err("def f(a, b):\n    return a\nf(1)");
    assert_eq!(
        err.to_string(),
        "runtime error: invalid operation: f() takes 2 positional argument(s) but 1 were given"
    );
}

#[test]
fn test_calling_non_function() {
    let err = run_err("x = 3\nx(1)");
    assert!(err.to_string().contains("'int' object is not callable"));
}

#[test]
fn test_lists_passed_by_reference() {
    assert_eq!(run("def push(items):\n    items.append(9)\ndata = []\npush(data)\nprint(data)"), "[9]\n");
}
