//! End-to-end tests running the `mathfence` binary against a temporary
//! configuration folder.

use std::process::{Command, Output};

use tree_fs::Tree;

fn run(temp_dir: &Tree, args: &[&str]) -> Output {
    let config = temp_dir.root.join("app");
    Command::new(env!("CARGO_BIN_EXE_mathfence"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("MATHFENCE_LOG")
        .output()
        .expect("Failed to run mathfence")
}

fn temp_dir() -> Tree {
    tree_fs::TreeBuilder::default()
        .create()
        .expect("Failed to create temp directory")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[test]
fn check_accepts_valid_expression() {
    let temp_dir = temp_dir();
    let output = run(&temp_dir, &["check", "-e", "x^2 + 1"]);
    assert_eq!(output.status.code(), Some(exitcode::OK));
    assert_eq!(stdout(&output), "valid: x^2 + 1");
}

#[test]
fn check_rejects_injection_with_data_error() {
    let temp_dir = temp_dir();
    let output = run(&temp_dir, &["check", "-e", "eval('alert(1)')"]);
    assert_eq!(output.status.code(), Some(exitcode::DATAERR));
    assert!(stdout(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not part of a math formula"));
}

#[test]
fn eval_uses_precision_from_settings() {
    let temp_dir = temp_dir();
    let output = run(&temp_dir, &["eval", "-e", "x / 4", "-x", "1", "-x", "-2"]);
    assert_eq!(output.status.code(), Some(exitcode::OK));
    assert_eq!(stdout(&output), "f(1) = 0.250000\nf(-2) = -0.500000");
}

#[test]
fn table_uses_range_from_settings() {
    let temp_dir = temp_dir();
    let output = run(&temp_dir, &["table", "-e", "x"]);
    assert_eq!(output.status.code(), Some(exitcode::OK));
    // header plus the default 11 rows
    assert_eq!(stdout(&output).lines().count(), 12);
}

#[test]
fn output_flag_selects_json() {
    let temp_dir = temp_dir();
    let output = run(&temp_dir, &["--output", "json", "score", "-e", "sin(x)"]);
    assert_eq!(output.status.code(), Some(exitcode::OK));
    let report: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("score prints json");
    assert_eq!(report["level"], "intermediate");
    assert_eq!(report["score"], 4);
}

#[test]
fn config_is_created_on_first_run() {
    let temp_dir = temp_dir();
    let output = run(&temp_dir, &["functions"]);
    assert_eq!(output.status.code(), Some(exitcode::OK));
    assert!(temp_dir.root.join("app").join("settings.yaml").is_file());
}

#[test]
fn broken_settings_can_be_reset() {
    let temp_dir = temp_dir();
    let app = temp_dir.root.join("app");
    std::fs::create_dir_all(&app).expect("Failed to create app folder");
    std::fs::write(app.join("settings.yaml"), "precision: many\n").expect("write settings");

    let output = run(&temp_dir, &["functions"]);
    assert_eq!(output.status.code(), Some(exitcode::CONFIG));

    let output = run(&temp_dir, &["config", "reset"]);
    assert_eq!(output.status.code(), Some(exitcode::OK));

    let output = run(&temp_dir, &["functions"]);
    assert_eq!(output.status.code(), Some(exitcode::OK));
}
