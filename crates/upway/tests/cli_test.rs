//! Integration tests for the `upway` CLI binary.
//!
//! Argument parsing, help output, local commands, and error exit codes
//! run without any service. One end-to-end test drives the binary
//! against a wiremock myUplink API.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `upway` binary with env isolation.
///
/// Clears all `UPWAY_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn upway_cmd_in(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("upway");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env_remove("RUST_LOG");
    for var in [
        "UPWAY_PROFILE",
        "UPWAY_SERVICE",
        "UPWAY_USERNAME",
        "UPWAY_HEATPUMP_ID",
        "UPWAY_CLIENT_ID",
        "UPWAY_OUTPUT",
        "UPWAY_TIMEOUT",
        "UPWAY_PASSWORD",
        "UPWAY_CLIENT_SECRET",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn upway_cmd() -> assert_cmd::Command {
    upway_cmd_in(Path::new("/tmp/upway-cli-test-nonexistent"))
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = upway_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    upway_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("values")
            .and(predicate::str::contains("history"))
            .and(predicate::str::contains("variables"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    upway_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("upway"));
}

#[test]
fn test_completions_bash() {
    upway_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Local commands ──────────────────────────────────────────────────

#[test]
fn test_variables_for_service_plain() {
    upway_cmd()
        .args(["variables", "--service", "myuplink", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("AVG_OUTDOOR_TEMP")
                .and(predicate::str::contains("SMART_PRICE_FACTOR")),
        );
}

#[test]
fn test_variables_json_carries_ids() {
    let output = upway_cmd()
        .args(["variables", "-o", "json-compact"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first = &parsed[0];
    assert_eq!(first["name"], "AVG_OUTDOOR_TEMP");
    assert_eq!(first["myupway"], 40067);
    assert_eq!(first["myuplink"], 40067);
}

#[test]
fn test_config_show_no_config() {
    // `config show` falls back to the default config when no file exists.
    upway_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path_points_into_config_dir() {
    let home = tempfile::tempdir().unwrap();
    upway_cmd_in(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_output_format() {
    let output = upway_cmd()
        .args(["--output", "invalid", "variables"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_values_without_config_is_usage_error() {
    let output = upway_cmd().arg("values").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("config init"), "Expected config hint:\n{text}");
}

#[test]
fn test_missing_credentials_exit_with_auth_code() {
    // Service given but no secret anywhere.
    let output = upway_cmd()
        .args(["--service", "myuplink", "--client-id", "abc", "values"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("client-secret"), "Expected secret hint:\n{text}");
}

#[test]
fn test_missing_heatpump_id_is_usage_error() {
    let output = upway_cmd()
        .env("UPWAY_PASSWORD", "hunter2")
        .args(["--service", "myupway", "--username", "user@example.com", "values"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("heatpump_id"));
}

#[test]
fn test_unknown_profile_is_usage_error() {
    let output = upway_cmd()
        .args(["--profile", "cabin", "values"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("cabin"));
}

// ── End to end ──────────────────────────────────────────────────────

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread")]
async fn test_values_against_myuplink() {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/systems/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "systems": [{ "devices": [{ "id": "dev-1", "connectionState": "Connected" }] }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/devices/dev-1/points"))
        .and(query_param("parameters", "40067"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "parameterId": "40067", "parameterUnit": "°C", "value": 2.5 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join("upway");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            r#"
default_profile = "home"

[profiles.home]
service = "myuplink"
client_id = "abc"
client_secret = "s3cret"
base_url = "{}"
"#,
            server.uri()
        ),
    )
    .unwrap();

    let home_path = home.path().to_path_buf();
    let output = tokio::task::spawn_blocking(move || {
        upway_cmd_in(&home_path)
            .args(["values", "avg_outdoor_temp", "-o", "plain"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    let text = combined_output(&output);
    assert!(output.status.success(), "command failed:\n{text}");
    assert!(
        String::from_utf8_lossy(&output.stdout).contains("AVG_OUTDOOR_TEMP\t2.5 °C"),
        "unexpected output:\n{text}"
    );
}
