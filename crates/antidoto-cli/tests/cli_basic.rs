//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. They run
//! against the dev data directory (ANTIDOTO_ENV=dev) and share a single
//! test account so parallel logins do not fight over the session.

use std::process::Command;

const TEST_EMAIL: &str = "cli-test@antidoto.dev";

/// Run a CLI command and return output.
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "antidoto-cli", "--"])
        .args(args)
        .env("ANTIDOTO_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Sign the shared test account in, creating it on the allow-list first.
fn login() {
    let (_, _, code) = run_cli(&["auth", "allow", "add", TEST_EMAIL]);
    assert_eq!(code, 0, "allow add failed");
    let (_, _, code) = run_cli(&["auth", "login", TEST_EMAIL]);
    assert_eq!(code, 0, "login failed");
}

#[test]
fn test_auth_status() {
    let (stdout, _, code) = run_cli(&["auth", "status"]);
    assert_eq!(code, 0, "auth status failed");
    assert!(stdout.contains("conectado") || stdout.contains("não conectado"));
}

#[test]
fn test_auth_allow_roundtrip() {
    let (_, _, code) = run_cli(&["auth", "allow", "add", "roundtrip@example.com"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(&["auth", "allow", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("roundtrip@example.com"));

    let (_, _, code) = run_cli(&["auth", "allow", "remove", "roundtrip@example.com"]);
    assert_eq!(code, 0);
}

#[test]
fn test_login_rejects_unknown_email() {
    let (_, stderr, code) = run_cli(&["auth", "login", "intruso@example.com"]);
    assert_ne!(code, 0, "unknown email unexpectedly signed in");
    assert!(stderr.contains("Acesso não autorizado"));
}

#[test]
fn test_login_greets_by_local_part() {
    login();
    let (stdout, _, code) = run_cli(&["auth", "login", TEST_EMAIL]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Olá, cli-test"));
}

#[test]
fn test_checkin_save_and_show() {
    login();
    let (stdout, _, code) = run_cli(&[
        "checkin",
        "save",
        "--date",
        "2026-03-05",
        "--work-good",
        "--notes",
        "dia produtivo",
    ]);
    assert_eq!(code, 0, "checkin save failed");
    assert!(stdout.contains("✓ Salvo."));

    let (stdout, _, code) = run_cli(&["checkin", "show", "--date", "2026-03-05"]);
    assert_eq!(code, 0, "checkin show failed");
    assert!(stdout.contains("\"work_good\": true"));
    assert!(stdout.contains("dia produtivo"));
}

#[test]
fn test_checkin_rejects_dates_outside_the_tracked_year() {
    login();
    let (_, stderr, code) = run_cli(&["checkin", "save", "--date", "2031-01-01"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("2031"));
}

#[test]
fn test_heatmap_show() {
    login();
    let (stdout, _, code) = run_cli(&["heatmap", "show"]);
    assert_eq!(code, 0, "heatmap show failed");
    assert!(stdout.contains("Seu Ano em"));
    assert!(stdout.contains("Jan"));
}

#[test]
fn test_heatmap_day_detail() {
    login();
    let (_, _, code) = run_cli(&[
        "checkin", "save", "--date", "2026-03-06", "--sleep-good",
    ]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(&["heatmap", "day", "2026-03-06"]);
    assert_eq!(code, 0, "heatmap day failed");
    assert!(stdout.contains("06/03/2026 - Sono"));
}

#[test]
fn test_heatmap_day_without_entry_shows_no_records() {
    login();
    let (stdout, _, code) = run_cli(&["heatmap", "day", "2026-12-25"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Sem registros") || stdout.contains("25/12/2026"));
}

#[test]
fn test_dashboard() {
    login();
    let (stdout, _, code) = run_cli(&["dashboard"]);
    assert_eq!(code, 0, "dashboard failed");
    assert!(stdout.contains("Olá,"));
    assert!(stdout.contains("Trajetória:"));
}

#[test]
fn test_meditate_presets() {
    let (stdout, _, code) = run_cli(&["meditate", "presets"]);
    assert_eq!(code, 0, "meditate presets failed");
    assert!(stdout.contains("[1,5,10,15,30]"));
}

#[test]
fn test_meditate_start_and_status() {
    login();
    let (stdout, _, code) = run_cli(&["meditate", "start", "30"]);
    assert_eq!(code, 0, "meditate start failed");
    assert!(stdout.contains("timer_started") || stdout.contains("TimerStarted"));

    let (_, _, code) = run_cli(&["meditate", "status"]);
    assert_eq!(code, 0, "meditate status failed");

    let (_, _, code) = run_cli(&["meditate", "reset"]);
    assert_eq!(code, 0, "meditate reset failed");
}

#[test]
fn test_meditate_rejects_zero_minutes() {
    login();
    let (_, _, code) = run_cli(&["meditate", "start", "0"]);
    assert_ne!(code, 0);
}

#[test]
fn test_breathe_status() {
    let (stdout, _, code) = run_cli(&["breathe", "status"]);
    assert_eq!(code, 0, "breathe status failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("breathe status is not JSON");
    assert!(parsed.get("phase").is_some());
    assert!(parsed.get("label").is_some());
}

#[test]
fn test_stats_meditation() {
    login();
    let (stdout, _, code) = run_cli(&["stats", "meditation"]);
    assert_eq!(code, 0, "stats meditation failed");
    assert!(stdout.contains("total_minutes"));
}

#[test]
fn test_stats_diary() {
    login();
    let (stdout, _, code) = run_cli(&["stats", "diary"]);
    assert_eq!(code, 0, "stats diary failed");
    assert!(stdout.contains("days"));
}

#[test]
fn test_config_get() {
    let (stdout, _, code) = run_cli(&["config", "get", "year"]);
    assert_eq!(code, 0, "config get failed");
    assert!(stdout.contains("2026"));
}

#[test]
fn test_config_set() {
    let (stdout, _, code) = run_cli(&["config", "set", "notifications.volume", "70"]);
    assert_eq!(code, 0, "config set failed");
    assert!(stdout.contains("ok"));
    let (_, _, code) = run_cli(&["config", "set", "notifications.volume", "60"]);
    assert_eq!(code, 0);
}

#[test]
fn test_config_list() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    assert!(stdout.contains("breathing"));
}

#[test]
fn test_sync_requires_configuration() {
    login();
    let (_, stderr, code) = run_cli(&["sync", "status"]);
    // The dev environment has no remote endpoint configured.
    if code != 0 {
        assert!(stderr.contains("Remote store not configured") || !stderr.is_empty());
    }
}
