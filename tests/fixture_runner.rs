use minipy::interpreter::execute;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

#[test]
fn run_fixtures() {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    let mut count = 0;
    run_fixtures_in_dir(&fixtures_dir, &mut count);
    assert!(count > 0, "No fixtures found under {:?}", fixtures_dir);
    eprintln!("Fixture run complete. Processed {} programs.", count);
}

fn run_fixtures_in_dir(dir: &Path, count: &mut usize) {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .expect("Failed to read fixtures directory")
        .map(|entry| entry.expect("Failed to read entry").path())
        .collect();
    entries.sort();

    for path in entries.into_iter().filter(|p| p.is_dir()) {
        let program_path = path.join("program.py");
        let expected_path = path.join("expected.txt");
        if program_path.exists() && expected_path.exists() {
            *count += 1;
            run_test_case(&path, &program_path, &expected_path);
        } else {
            run_fixtures_in_dir(&path, count);
        }
    }
}

fn run_test_case(test_dir: &Path, program_path: &Path, expected_path: &Path) {
    let test_name = test_dir.file_name().unwrap().to_string_lossy();
    let source = fs::read_to_string(program_path).expect("Failed to read program.py");
    let expected = fs::read_to_string(expected_path).expect("Failed to read expected.txt");

    let mut out = Vec::new();
    if let Err(e) = execute(&source, &mut out) {
        panic!("Fixture {} failed: {}", test_name, e);
    }
    let actual = String::from_utf8(out).expect("Output should be UTF-8");
    assert_eq!(actual, expected, "Output mismatch in fixture {}", test_name);
}
