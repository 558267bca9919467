#![allow(dead_code)]

use minipy::interpreter::execute;
use minipy::Error;

/// Runs `source` and returns everything it printed.
pub fn run(source: &str) -> String {
    let mut out = Vec::new();
    execute(source, &mut out).expect("Program should succeed");
    String::from_utf8(out).expect("Output should be UTF-8")
}

/// Runs `source`, expecting failure; returns the error.
pub fn run_err(source: &str) -> Error {
    let mut out = Vec::new();
    execute(source, &mut out).expect_err("Program should fail")
}

/// Runs `source`, expecting failure; returns the output written before it.
pub fn run_partial(source: &str) -> (String, Error) {
    let mut out = Vec::new();
    let err = execute(source, &mut out).expect_err("Program should fail");
    (String::from_utf8(out).expect("Output should be UTF-8"), err)
}
