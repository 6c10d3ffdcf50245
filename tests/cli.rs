//! Integration tests for the `signup` binary.

use std::path::PathBuf;
use std::process::Command;

fn run_signup(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_signup");
    Command::new(bin)
        .args(args)
        .env("SIGNUP_FAILURE_RATE", "0")
        .env("SIGNUP_LATENCY_MS", "20")
        .env("SIGNUP_AVAILABILITY_LATENCY_MS", "10")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run signup binary")
}

fn demo(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "demos", name].iter().collect();
    path.to_string_lossy().into_owned()
}

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| !line.starts_with("[prompt]"))
        .map(|line| serde_json::from_str(line).expect("non-prompt lines are JSON"))
        .collect()
}

#[test]
fn validate_prints_labels() {
    let output = run_signup(&["validate", "--password", "abc", "--repeated", "abd"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("password: [negative] Password must be at least 5 characters"));
    assert!(stdout.contains("repeated: [negative] password different"));
}

#[test]
fn validate_checks_username_against_mock_backend() {
    let output = run_signup(&["validate", "--username", "octocat"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "username: [negative] Username already taken"
    );

    let output = run_signup(&["validate", "--username", "not valid"]);
    assert!(String::from_utf8_lossy(&output.stdout)
        .contains("Username can only contain numbers or digits"));
}

#[test]
fn validate_without_args_shows_error() {
    let output = run_signup(&["validate"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Nothing to validate"));
}

#[test]
fn help_shows_subcommands() {
    let output = run_signup(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("session"));
    assert!(stdout.contains("validate"));
}

#[test]
fn unknown_subcommand_fails() {
    let output = run_signup(&["frobnicate"]);
    assert!(!output.status.success());
}

#[test]
fn out_of_range_failure_rate_is_rejected() {
    let output = run_signup(&["session", &demo("happy_path.yaml"), "--failure-rate", "1.5"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("--failure-rate"));
}

#[test]
fn missing_script_is_reported() {
    let output = run_signup(&["session", "no/such/script.yaml"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("no/such/script.yaml"));
}

#[test]
fn session_signs_in_and_prints_snapshot() {
    let output = run_signup(&["session", &demo("happy_path.yaml"), "--settle-ms", "300"]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[prompt] Mock: Signed in to GitHub. (OK)"));

    let lines = json_lines(&output.stdout);
    let summary = lines.last().expect("summary line");
    assert_eq!(summary["script"], "happy path");
    assert_eq!(summary["snapshot"]["signed_in"], true);
    assert_eq!(summary["snapshot"]["signing_in"], false);
    assert_eq!(
        summary["snapshot"]["validated_username"]["message"],
        "Username available"
    );

    let session = summary["session"].as_str().expect("session id");
    assert!(lines.iter().all(|line| line["session"] == session));
    assert!(lines
        .iter()
        .any(|line| line["signal"] == "signing_in" && line["value"] == true));
}

#[test]
fn session_with_taken_username_keeps_button_disabled() {
    let output = run_signup(&[
        "session",
        &demo("taken_username.yaml"),
        "--settle-ms",
        "100",
    ]);
    assert!(output.status.success());

    let lines = json_lines(&output.stdout);
    let summary = lines.last().expect("summary line");
    assert_eq!(summary["snapshot"]["signup_enabled"], false);
    assert_eq!(
        summary["snapshot"]["validated_username"]["message"],
        "Username already taken"
    );
}
