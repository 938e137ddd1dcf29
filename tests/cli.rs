//! End-to-end tests of the `myjs-analyzer` binary (`spec.md` §8's six
//! concrete scenarios), each run in its own temporary directory since the
//! CLI writes `lexed.txt`/`symbols.txt`/`parse.txt` into the current one.

use std::fs;
use std::path::Path;
use std::process::Command;

fn run_in(dir: &Path, source: &str) -> std::process::Output {
    fs::copy("Gramatica.txt", dir.join("Gramatica.txt")).unwrap();
    let source_path = dir.join("input.myjs");
    fs::write(&source_path, source).unwrap();
    Command::new(env!("CARGO_BIN_EXE_myjs-analyzer"))
        .current_dir(dir)
        .arg("input.myjs")
        .output()
        .expect("binary runs")
}

#[test]
fn well_formed_program_succeeds_and_reports_main_and_x() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(
        dir.path(),
        "function int main() { let int x = 3; write(x); return x; }",
    );
    assert!(out.status.success());
    assert!(dir.path().join("parse.txt").exists());

    let parse = fs::read_to_string(dir.path().join("parse.txt")).unwrap();
    assert!(parse.starts_with("Descendente "));

    let symbols = fs::read_to_string(dir.path().join("symbols.txt")).unwrap();
    assert!(symbols.contains("* LEXEMA : 'main'\n"));
    assert!(symbols.contains("void -> int"));
    assert!(symbols.contains("* LEXEMA : 'x'\n"));
    assert!(symbols.contains("tipo: 'int'"));
    assert!(symbols.contains("desplazamiento: 0"));
}

#[test]
fn lexed_txt_is_truncated_at_the_first_syntactic_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), "let int x = 3\nlet int y = 4;");
    assert!(!out.status.success());
    let lexed = fs::read_to_string(dir.path().join("lexed.txt")).unwrap();
    // Scanning stops the moment the unexpected 'let' is seen as lookahead
    // for the missing ';' — the second declaration's remaining tokens
    // (INT, ID, EQ, INTCONST, SEMICOLON) and EOF are never reached.
    assert_eq!(lexed.lines().count(), 6);
    assert!(!lexed.contains("<INTCONST,4>"));
}

#[test]
fn float_initializer_for_int_is_a_semantic_error_with_no_parse_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), "let int x = 3.5;");
    assert!(!out.status.success());
    assert!(!dir.path().join("parse.txt").exists());
}

#[test]
fn write_of_a_boolean_is_a_semantic_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), "let boolean b; write(b);");
    assert!(!out.status.success());
}

#[test]
fn call_site_argument_mismatch_is_a_semantic_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(
        dir.path(),
        "function int f(int a) { return a; } function void g() { f(1, 2); }",
    );
    assert!(!out.status.success());
}

#[test]
fn out_of_range_integer_is_a_lexical_error_with_no_parse_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), "let int x = 99999;");
    assert!(!out.status.success());
    assert!(!dir.path().join("parse.txt").exists());
    assert!(dir.path().join("lexed.txt").exists());
    assert!(dir.path().join("symbols.txt").exists());
}

#[test]
fn missing_grammar_file_is_a_structural_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("input.myjs"), "let int x = 1;").unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_myjs-analyzer"))
        .current_dir(dir.path())
        .arg("input.myjs")
        .output()
        .expect("binary runs");
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn missing_source_file_is_a_structural_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy("Gramatica.txt", dir.path().join("Gramatica.txt")).unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_myjs-analyzer"))
        .current_dir(dir.path())
        .arg("missing.myjs")
        .output()
        .expect("binary runs");
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn two_runs_of_the_same_source_produce_byte_identical_output() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let src = "function int main() { let int x = 3; write(x); return x; }";
    run_in(dir_a.path(), src);
    run_in(dir_b.path(), src);
    for name in ["lexed.txt", "symbols.txt", "parse.txt"] {
        let a = fs::read_to_string(dir_a.path().join(name)).unwrap();
        let b = fs::read_to_string(dir_b.path().join(name)).unwrap();
        assert_eq!(a, b, "{} differs between runs", name);
    }
}
