//! Integration tests exercising the full `run()` flow.
//!
//! These read real files from `tests/fixtures/py` (or a temp dir) and check
//! what the CLI would print: the header, the numbered source, and the
//! error a bad query produces.

use std::fs;
use std::path::PathBuf;

use nearest::error::NearestError;
use nearest::nearest::TestGlobs;
use nearest::types::{Mode, NodeKind};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/py")
        .join(name)
}

fn run(name: &str, line: u32, mode: Mode) -> Option<String> {
    nearest::run(&fixture(name), line, mode, &TestGlobs::default()).unwrap()
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

#[test]
fn nested_function_reports_outer_function() {
    let output = run("nested.py", 5, Mode::Definition).expect("b encloses line 5");

    let header = output.lines().next().unwrap();
    assert!(
        header.ends_with("nested.py:3-6 [function_definition] b"),
        "header: {header}"
    );
    assert!(output.contains("4      def z():"), "{output}");
}

#[test]
fn method_body_reports_the_method_with_its_source() {
    let output = run("nested.py", 13, Mode::Definition).expect("da encloses line 13");

    assert!(output.contains("[function_definition] da"), "{output}");
    assert!(output.contains("10      def da(self):"), "{output}");
    assert!(output.contains("14          return 'da'"), "{output}");
    assert!(!output.contains("more lines"), "{output}");
}

#[test]
fn every_line_resolves_to_a_definition_at_or_before_it() {
    let path = fixture("nested.py");
    for line in 1..=17 {
        let def = nearest::locate(&path, line, Mode::Definition, &TestGlobs::default())
            .unwrap()
            .unwrap_or_else(|| panic!("line {line} has no definition"));
        assert!(def.line <= line, "line {line}: {def:?}");
        assert!(
            matches!(def.kind, NodeKind::FunctionDef | NodeKind::ClassDef),
            "line {line}: {def:?}"
        );
    }
}

#[test]
fn module_level_statement_has_no_definition() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.py");
    fs::write(&path, "x = 1\ny = x + 1\n").unwrap();

    let found = nearest::run(&path, 2, Mode::Definition, &TestGlobs::default()).unwrap();
    assert!(found.is_none());
    assert_eq!(
        nearest::no_match_line(&path, 2, Mode::Definition),
        format!("# {}:2 [no enclosing def]", path.display())
    );
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

#[test]
fn block_mode_reports_top_level_if() {
    let output = run("nested.py", 16, Mode::Block).expect("if encloses line 16");

    let header = output.lines().next().unwrap();
    assert!(header.ends_with("nested.py:15-17 [if_statement]"), "header: {header}");
}

#[test]
fn block_mode_stops_at_top_level() {
    let def = nearest::locate(&fixture("nested.py"), 13, Mode::Block, &TestGlobs::default())
        .unwrap()
        .unwrap();

    assert_eq!(def.kind, NodeKind::ClassDef);
    assert_eq!(def.name.as_deref(), Some("D"));
    assert_eq!(def.column, 0);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_mode_finds_test_functions_and_classes() {
    let path = fixture("test_sample.py");
    let globs = TestGlobs::default();
    let name = |line| {
        nearest::locate(&path, line, Mode::Test, &globs)
            .unwrap()
            .and_then(|d| d.name)
    };

    assert_eq!(name(2).as_deref(), Some("test_foo"));
    assert_eq!(name(4), None);
    assert_eq!(name(7).as_deref(), Some("TestThing"));
    assert_eq!(name(9).as_deref(), Some("test_one"));
    assert_eq!(name(12).as_deref(), Some("test_inside_widget"));
}

#[test]
fn json_report_for_miss_and_hit() {
    let path = fixture("test_sample.py");
    let globs = TestGlobs::default();

    let miss = nearest::run_json(&path, 4, Mode::Test, &globs).unwrap();
    assert!(miss["found"].is_null());
    assert_eq!(miss["mode"], "test");
    assert_eq!(miss["line"], 4);

    let hit = nearest::run_json(&path, 9, Mode::Test, &globs).unwrap();
    assert_eq!(hit["found"]["name"], "test_one");
    assert_eq!(hit["found"]["kind"], "function_def");
    assert_eq!(hit["found"]["line"], 8);
    assert_eq!(hit["found"]["end_line"], 9);
}

#[test]
fn invalid_glob_is_a_query_error() {
    let globs = TestGlobs {
        def_glob: "test[".to_string(),
        ..TestGlobs::default()
    };
    let err = nearest::run(&fixture("test_sample.py"), 2, Mode::Test, &globs).unwrap_err();

    assert!(matches!(err, NearestError::InvalidGlob { .. }), "{err}");
    assert_eq!(err.exit_code(), 3);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn missing_file_is_not_found() {
    let err = nearest::run(
        &fixture("does_not_exist.py"),
        1,
        Mode::Definition,
        &TestGlobs::default(),
    )
    .unwrap_err();

    assert!(matches!(err, NearestError::NotFound { .. }), "{err}");
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("does_not_exist.py"));
}

#[test]
fn line_out_of_range_is_rejected() {
    let path = fixture("nested.py");
    for line in [0, 18] {
        let err = nearest::run(&path, line, Mode::Definition, &TestGlobs::default()).unwrap_err();
        assert!(matches!(err, NearestError::InvalidQuery { .. }), "{err}");
        assert_eq!(err.exit_code(), 3);
    }
}

#[test]
fn syntax_error_names_file_and_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.py");
    fs::write(&path, "def ok():\n    return 1\ndef bad(:\n    pass\n").unwrap();

    let err = nearest::run(&path, 1, Mode::Definition, &TestGlobs::default()).unwrap_err();

    assert!(matches!(err, NearestError::ParseError { .. }), "{err}");
    assert!(err.to_string().contains("broken.py"), "{err}");
    assert_eq!(err.exit_code(), 3);
}
