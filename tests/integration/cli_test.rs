//! CLI tests: run the built binary against fixture recordings

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

use replaykit::MetadataStripper;

use crate::helpers::{fixtures_dir, load_fixture, path_arg, run_replaykit, temp_fixture};

fn fixture_arg(name: &str) -> String {
    fixtures_dir().join(name).to_string_lossy().into_owned()
}

fn rendered_fixture(name: &str) -> String {
    String::from_utf8(MetadataStripper::default().strip(&load_fixture(name))).unwrap()
}

// ============================================================================
// render / stream
// ============================================================================

#[test]
fn render_prints_neutralized_session() {
    let (stdout, stderr, code) = run_replaykit(&["render", &fixture_arg("session.log")]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(stdout, rendered_fixture("session.log"));
    assert!(!stdout.contains("Script started"));
    assert!(!stdout.contains("\x1b[?1049h"));
}

#[test]
fn render_writes_output_file() {
    let dir = temp_fixture(&["simple.log"]);
    let out = dir.path().join("out.txt");
    let session = dir.path().join("simple.log");
    let (stdout, _, code) =
        run_replaykit(&["render", path_arg(&session), "-o", path_arg(&out)]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert_eq!(fs::read_to_string(&out).unwrap(), rendered_fixture("simple.log"));
}

#[test]
fn stream_matches_render_for_any_chunk_size() {
    let expected = rendered_fixture("session.log");
    for size in ["1", "7", "4096"] {
        let (stdout, stderr, code) = run_replaykit(&[
            "stream",
            &fixture_arg("session.log"),
            "--chunk-size",
            size,
        ]);
        assert_eq!(code, 0, "stderr: {stderr}");
        assert_eq!(stdout, expected, "chunk size {size}");
    }
}

#[test]
fn stream_help_explains_what_is_withheld() {
    let (stdout, _, code) = run_replaykit(&["stream", "--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("screen clear"));
    assert!(stdout.contains("held back"));
}

#[test]
fn stream_rejects_zero_chunk_size() {
    let (_, stderr, code) =
        run_replaykit(&["stream", &fixture_arg("session.log"), "--chunk-size", "0"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("chunk-size"));
}

// ============================================================================
// toc
// ============================================================================

#[test]
fn toc_lists_commands_with_lines() {
    let (stdout, stderr, code) = run_replaykit(&["toc", &fixture_arg("session.log")]);
    assert_eq!(code, 0, "stderr: {stderr}");
    insta::assert_snapshot!(stdout, @r"
0	ls
2	clear
7	vim notes
7	echo done
9	exit
");
}

#[test]
fn toc_json_output() {
    let (stdout, _, code) = run_replaykit(&["toc", "--json", &fixture_arg("session.log")]);
    assert_eq!(code, 0);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[2]["label"], "vim notes");
    assert_eq!(entries[2]["line"], 7);
}

#[test]
fn toc_without_companions_warns_and_succeeds() {
    Command::cargo_bin("replaykit")
        .unwrap()
        .env_remove("REPLAYKIT_LOG")
        .arg("toc")
        .arg(fixture_arg("simple.log"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("companion"));
}

#[test]
fn toc_with_broken_timing_warns_and_succeeds() {
    Command::cargo_bin("replaykit")
        .unwrap()
        .env_remove("REPLAYKIT_LOG")
        .args(["toc", "--json"])
        .arg(fixture_arg("broken.log"))
        .assert()
        .success()
        .stdout("[]\n")
        .stderr(predicate::str::contains("line 2"));
}

// ============================================================================
// config / errors
// ============================================================================

#[test]
fn config_show_prints_defaults() {
    let (stdout, _, code) = run_replaykit(&["config", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[normalizer]"));
    assert!(stdout.contains("footer_window = 512"));
    assert!(stdout.contains("include_unterminated = false"));
}

#[test]
fn config_flag_overrides_defaults() {
    let dir = temp_fixture(&[]);
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[normalizer]\nheader_scan_lines = 0\n").unwrap();

    let (stdout, _, code) = run_replaykit(&[
        "render",
        "--config",
        path_arg(&config),
        &fixture_arg("simple.log"),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Script started on"));
}

#[test]
fn invalid_config_fails() {
    let dir = temp_fixture(&[]);
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[normalizer\n").unwrap();

    let (_, stderr, code) = run_replaykit(&["config", "show", "--config", path_arg(&config)]);
    assert_eq!(code, 1);
    assert!(stderr.contains("bad.toml"));
}

#[test]
fn missing_session_exits_with_error() {
    let (stdout, stderr, code) = run_replaykit(&["render", "/nonexistent/session.log"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("/nonexistent/session.log"));
}

#[test]
fn missing_argument_is_a_usage_error() {
    let (_, stderr, code) = run_replaykit(&["render"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Usage"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let (stdout, _, code) = run_replaykit(&["cast", &fixture_arg("session.log")]);
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
}

#[test]
fn verbose_logs_to_stderr_only() {
    let (stdout, stderr, code) =
        run_replaykit(&["-v", "render", &fixture_arg("session.log")]);
    assert_eq!(code, 0);
    assert_eq!(stdout, rendered_fixture("session.log"));
    assert!(stderr.contains("DEBUG"));
}
