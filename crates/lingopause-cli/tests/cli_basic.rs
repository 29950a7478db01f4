//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a scratch directory so
//! the config file never touches the real user profile.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_lingopause"))
        .args(args)
        .env("HOME", home)
        .env_remove("LINGOPAUSE_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn write(dir: &Path, name: &str, json: serde_json::Value) -> String {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

fn session_json(run_start: f64, run_end: f64) -> serde_json::Value {
    serde_json::json!({
        "session_number": 1,
        "total_sessions": 1,
        "session_start_time": 0.0,
        "session_end_time": run_end,
        "focus_words": [
            {"text": "go", "definition": "to move", "start_time": 2.0, "end_time": 3.0, "level": "A1"},
            {"text": "run", "definition": "to move fast", "start_time": run_start, "end_time": run_end, "level": "A2"}
        ]
    })
}

fn event_types(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .filter_map(|v| v["type"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn test_session_plan() {
    let home = tempfile::tempdir().unwrap();
    let words = write(
        home.path(),
        "words.json",
        serde_json::json!([
            {"word": "c", "start_time": 30.0, "end_time": 31.0},
            {"word": "a", "start_time": 2.0, "end_time": 3.0},
            {"word": "b", "start_time": 15.0, "end_time": 16.0},
            {"word": "missing"}
        ]),
    );

    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["session", "plan", &words, "--per-session", "2"],
    );
    assert_eq!(code, 0, "session plan failed: {stderr}");

    let sessions: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["focus_words"][0]["text"], "a");
    assert_eq!(sessions[1]["session_start_time"], 16.0);
}

#[test]
fn test_session_inspect() {
    let home = tempfile::tempdir().unwrap();
    let session = write(home.path(), "session.json", session_json(5.0, 6.0));

    let (stdout, _, code) = run_cli(home.path(), &["session", "inspect", &session]);
    assert_eq!(code, 0);

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["triggers"].as_array().unwrap().len(), 1);
    assert_eq!(report["skipped"][0], "run");
}

#[test]
fn test_simulate_reaches_summary() {
    let home = tempfile::tempdir().unwrap();
    let session = write(home.path(), "session.json", session_json(20.0, 21.0));

    let (stdout, stderr, code) = run_cli(home.path(), &["simulate", &session]);
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let types = event_types(&stdout);
    assert_eq!(types.first().map(String::as_str), Some("WatchingStarted"));
    assert_eq!(
        types.iter().filter(|t| *t == "WordEncountered").count(),
        2
    );
    assert!(types.iter().any(|t| t == "SessionCompleted"));

    let view: serde_json::Value = serde_json::from_str(stdout.lines().last().unwrap()).unwrap();
    assert_eq!(view["state"], "summary");
    assert_eq!(view["stats"]["practiced"], 2);
}

#[test]
fn test_simulate_skips_close_word() {
    let home = tempfile::tempdir().unwrap();
    let session = write(home.path(), "session.json", session_json(5.0, 6.0));

    let (stdout, _, code) = run_cli(home.path(), &["simulate", &session]);
    assert_eq!(code, 0);

    let types = event_types(&stdout);
    assert_eq!(
        types.iter().filter(|t| *t == "WordEncountered").count(),
        1
    );
    let view: serde_json::Value = serde_json::from_str(stdout.lines().last().unwrap()).unwrap();
    assert_eq!(view["stats"]["skipped"], 1);
}

#[test]
fn test_simulate_ignores_stale_end_time() {
    let home = tempfile::tempdir().unwrap();
    let session = write(
        home.path(),
        "session.json",
        serde_json::json!({
            "session_number": 1,
            "total_sessions": 1,
            "session_start_time": 0.0,
            "session_end_time": 0.0,
            "focus_words": [
                {"text": "late", "start_time": 12.0, "end_time": 13.0}
            ]
        }),
    );

    let (stdout, stderr, code) = run_cli(home.path(), &["simulate", &session]);
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let types = event_types(&stdout);
    assert_eq!(
        types.iter().filter(|t| *t == "WordEncountered").count(),
        1
    );
    let view: serde_json::Value = serde_json::from_str(stdout.lines().last().unwrap()).unwrap();
    assert_eq!(view["state"], "summary");
}

#[test]
fn test_simulate_rejects_missing_file() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["simulate", "/nonexistent/session.json"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("cannot read"));
}

#[test]
fn test_config_set_and_get() {
    let home = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "playback.poll_interval_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1000");

    let (_, _, code) = run_cli(
        home.path(),
        &["config", "set", "session.words_per_session", "7"],
    );
    assert_eq!(code, 0);

    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "session.words_per_session"]);
    assert_eq!(stdout.trim(), "7");

    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "playback.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}
