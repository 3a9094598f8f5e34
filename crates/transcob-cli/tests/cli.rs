use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::tempdir;

const HELLO: &str = r#"IDENTIFICATION DIVISION.
PROCEDURE DIVISION.
*> greet and exit
DISPLAY "HELLO, WORLD".
MOVE 42 TO ANSWER.
STOP RUN.
"#;

fn transcob_cmd() -> Command {
    Command::cargo_bin("transcob").expect("transcob binary")
}

fn write_source(path: &Path, source: &str) {
    fs::write(path, source).expect("write source");
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf8 path")
}

#[test]
fn smoke_help_and_version_commands() {
    transcob_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("transpile").and(contains("batch")));

    transcob_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("transcob "));
}

#[test]
fn transpile_writes_java_named_after_class() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("hello.cob");
    write_source(&source, HELLO);

    transcob_cmd()
        .args(["transpile", path_arg(&source)])
        .assert()
        .success()
        .stdout(contains("Transpilation complete"));

    let java = fs::read_to_string(dir.path().join("Hello.java")).expect("java output");
    assert!(java.starts_with("import java.util.*;\nimport java.sql.*;\npublic class Hello {\n"));
    assert!(java.contains("        System.out.println(\"HELLO, WORLD\");\n"));
    assert!(java.contains("        ANSWER = 42;\n"));
    assert!(java.contains("        System.exit(0);\n"));
}

#[test]
fn transpile_honors_codegen_flags() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("hello.cob");
    let output = dir.path().join("Hello.java");
    write_source(&source, HELLO);

    transcob_cmd()
        .args([
            "transpile",
            path_arg(&source),
            "-o",
            path_arg(&output),
            "--class-name",
            "Hello",
            "--keep-quotes",
            "--declare",
            "ANSWER=PIC 99",
            "--quiet",
        ])
        .assert()
        .success()
        .stdout("");

    let java = fs::read_to_string(&output).expect("java output");
    assert!(java.contains("public class Hello {"));
    assert!(java.contains("System.out.println(\"\"HELLO, WORLD\"\");"));
    assert!(java.contains("ANSWER = 42; // PIC 99"));
}

#[test]
fn transpile_rust_target() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("hello.cbl");
    write_source(&source, HELLO);

    transcob_cmd()
        .args(["transpile", path_arg(&source), "--target", "rust", "-q"])
        .assert()
        .success();

    let rust = fs::read_to_string(dir.path().join("hello.rs")).expect("rust output");
    assert!(rust.contains("fn main()"));
    assert!(rust.contains("answer = 42;"));
}

#[test]
fn transpile_failure_writes_nothing() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("broken.cob");
    write_source(&source, "DISPLAY \"OK\".\nMOVE ABC TO X.\n");

    transcob_cmd()
        .args(["transpile", path_arg(&source), "-q"])
        .assert()
        .failure()
        .stderr(contains("Parse error").and(contains("NUMBER")));

    assert!(!dir.path().join("Broken.java").exists());
}

#[test]
fn transpile_lex_failure_reports_remaining_text() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("odd.cob");
    write_source(&source, "DISPLAY \"OK\".\n@@@\n");

    transcob_cmd()
        .args(["transpile", path_arg(&source), "-q"])
        .assert()
        .failure()
        .stderr(contains("Unexpected token in source: @@@"));

    assert!(!dir.path().join("Odd.java").exists());
}

#[test]
fn tokens_and_ast_json() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("stop.cob");
    write_source(&source, "STOP RUN.");

    let output = transcob_cmd()
        .args(["tokens", path_arg(&source), "--format", "json", "-q"])
        .output()
        .expect("run tokens");
    assert!(output.status.success());
    let tokens: serde_json::Value = serde_json::from_slice(&output.stdout).expect("token json");
    assert_eq!(
        tokens,
        serde_json::json!([
            {"category": "KEYWORD", "text": "STOP"},
            {"category": "KEYWORD", "text": "RUN"},
            {"category": "PUNCTUATION", "text": "."}
        ])
    );

    let output = transcob_cmd()
        .args(["ast", path_arg(&source), "--format", "json", "-q"])
        .output()
        .expect("run ast");
    assert!(output.status.success());
    let ast: serde_json::Value = serde_json::from_slice(&output.stdout).expect("ast json");
    assert_eq!(ast["kind"], "Program");
    assert_eq!(ast["children"][0]["kind"], "StopRun");
}

#[test]
fn ast_text_tree() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("call.cob");
    write_source(&source, "CALL \"SUB\" USING A, B.");

    transcob_cmd()
        .args(["ast", path_arg(&source), "-q"])
        .assert()
        .success()
        .stdout(
            "Program\n  CallStatement\n    Subroutine = \"SUB\"\n    Parameter = A\n    Parameter = B\n",
        );
}

#[test]
fn info_counts_statements() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("hello.cob");
    write_source(&source, HELLO);

    let output = transcob_cmd()
        .args(["info", path_arg(&source), "--format", "json", "-q"])
        .output()
        .expect("run info");
    assert!(output.status.success());
    let info: serde_json::Value = serde_json::from_slice(&output.stdout).expect("info json");
    assert_eq!(info["total_lines"], 6);
    assert_eq!(info["comment_lines"], 1);
    assert_eq!(info["statements"][0]["kind"], "DisplayStatement");
    assert_eq!(info["statements"][0]["count"], 1);
    assert_eq!(info["statements"][2]["kind"], "StopRun");
    assert_eq!(info["statements"][2]["count"], 1);
}

#[test]
fn batch_translates_directory_tree() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("legacy");
    let nested = input.join("nested");
    fs::create_dir_all(&nested).expect("create input");
    write_source(&input.join("a.cob"), HELLO);
    write_source(&nested.join("b.cbl"), "STOP RUN.");
    write_source(&input.join("notes.txt"), "not cobol");
    let out = dir.path().join("java");

    transcob_cmd()
        .args([
            "batch",
            path_arg(&input),
            "-o",
            path_arg(&out),
            "-r",
            "--jobs",
            "2",
        ])
        .assert()
        .success()
        .stdout(contains("Batch complete"));

    assert!(out.join("A.java").exists());
    assert!(out.join("nested").join("B.java").exists());
    assert!(!out.join("Notes.java").exists());
}

#[test]
fn batch_keep_going_reports_failures() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("legacy");
    fs::create_dir_all(&input).expect("create input");
    write_source(&input.join("good.cob"), HELLO);
    write_source(&input.join("bad.cob"), "MOVE TO.");
    let out = dir.path().join("java");

    transcob_cmd()
        .args([
            "batch",
            path_arg(&input),
            "-o",
            path_arg(&out),
            "--keep-going",
            "--format",
            "json",
        ])
        .assert()
        .failure()
        .stdout(contains("\"successful\": 1").and(contains("bad.cob")));

    assert!(out.join("Good.java").exists());
    assert!(!out.join("Bad.java").exists());
}

#[test]
fn batch_missing_input_directory_fails() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("does-not-exist");

    transcob_cmd()
        .args(["batch", path_arg(&missing), "-o", path_arg(&dir.path().join("out"))])
        .assert()
        .failure()
        .stderr(contains("Failed to scan"));
}

#[test]
fn batch_output_collision_writes_nothing() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("legacy");
    fs::create_dir_all(&input).expect("create input");
    write_source(&input.join("report.cob"), HELLO);
    write_source(&input.join("report.cbl"), "STOP RUN.");
    let out = dir.path().join("java");

    transcob_cmd()
        .args(["batch", path_arg(&input), "-o", path_arg(&out), "--keep-going"])
        .assert()
        .failure()
        .stderr(contains("would both be written to").and(contains("Report.java")));

    assert!(!out.join("Report.java").exists());
}
