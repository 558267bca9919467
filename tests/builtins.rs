mod common;
use common::{run, run_err};
use minipy::{Error, RuntimeError};
use pretty_assertions::assert_eq;

#[test]
fn test_print_formats_values() {
    assert_eq!(
        run("print(1, 2.5, 'hi', True, None, [1, 'a', [2.0]])"),
        "1 2.5 hi True None [1, 'a', [2.0]]\n"
    );
    assert_eq!(run("print()"), "\n");
}

#[test]
fn test_division_produces_float() {
    assert_eq!(run("print(6 / 3, 7 / 2, 7 % 3)"), "2.0 3.5 1\n");
}

#[test]
fn test_len_of_strings_and_lists() {
    assert_eq!(run("print(len('hello'), len([1, 2, 3]), len([]))"), "5 3 0\n");
}

#[test]
fn test_len_rejects_numbers() {
    let err = run_err("len(5)");
    assert!(err.to_string().contains("object of type 'int' has no len()"));
}

#[test]
fn test_string_methods() {
    let source = "\
s = '  Hello World  '
print(s.strip())
print(s.upper().strip())
print(s.lower().strip())
print(s.strip().replace('World', 'There'))
print(s)
";
    assert_eq!(run(source), "Hello World\nHELLO WORLD\nhello world\nHello There\n  Hello World  \n");
}

#[test]
fn test_list_append_and_pop() {
    let source = "\
items = [1, 2, 3]
items.append(4)
print(items.pop())
print(items.pop(0))
print(items)
print(items.append(5))
";
    assert_eq!(run(source), "4\n1\n[2, 3]\nNone\n");
}

#[test]
fn test_pop_from_empty_list() {
    assert!(run_err("[].pop()").to_string().contains("out of range"));
}

#[test]
fn test_negative_indexing() {
    assert_eq!(run("items = [1, 2, 3]\nitems[-1] = 9\nprint(items[-1], items[0])"), "9 1\n");
}

#[test]
fn test_range_with_variables() {
    assert_eq!(run("lo = 2\nhi = 8\nprint(range(lo, hi, 3))"), "[2, 5]\n");
}

#[test]
fn test_range_zero_step() {
    assert!(run_err("range(1, 5, 0)").to_string().contains("must not be zero"));
}

#[test]
fn test_range_rejects_floats() {
    assert!(matches!(run_err("range(2.5)"), Error::Runtime(RuntimeError::TypeError { .. })));
}

#[test]
fn test_string_escapes_are_literal() {
    assert_eq!(run("print('a\\nb')"), "a\\nb\n");
    assert_eq!(run("print(len('a\\nb'))"), "4\n");
}

#[test]
fn test_string_indexing_not_supported() {
    assert!(run_err("print('abc'[0])").to_string().contains("not subscriptable"));
}

#[test]
fn test_list_concatenation_copies() {
    assert_eq!(run("a = [1]\nb = a + [2]\nb.append(3)\nprint(a, b)"), "[1] [1, 2, 3]\n");
}

#[test]
fn test_list_containing_itself_prints() {
    assert_eq!(run("a = [1]\na.append(a)\nprint(len(a))\nprint(a)"), "2\n[1, [...]]\n");
}

#[test]
fn test_self_referencing_lists_compare() {
    let source = "\
a = [1]
a.append(a)
b = [1]
b.append(b)
print(a == b, a == a, a != [1, 2])
";
    assert_eq!(run(source), "True True True\n");
}
