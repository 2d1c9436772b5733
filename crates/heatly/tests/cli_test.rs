//! Integration tests for the `heatly` CLI binary.
//!
//! Argument parsing, help output, completions, and exit codes run without a
//! platform; the end-to-end cases stand one up with wiremock.
#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIND_EQUIPMENT: &str = "/v4.0/maintain/netEquManage/findNetEqu";
const UPDATE_CONTROL: &str = "/v4.0/maintain/buildAiControl/updateControl";
const FIND_VALVE: &str = "/v4.0/maintain/houseValve/findHouseholdValve";
const UPDATE_VALVE: &str = "/v4.0/maintain/houseValve/updateHouseholdValve";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `heatly` binary with env isolation.
///
/// Clears all `HEATLY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn heatly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("heatly");
    cmd.env("HOME", "/tmp/heatly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/heatly-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("HEATLY_PROFILE")
        .env_remove("HEATLY_URL")
        .env_remove("HEATLY_TOKEN")
        .env_remove("HEATLY_OUTPUT")
        .env_remove("HEATLY_INSECURE")
        .env_remove("HEATLY_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `heatly` pointed at `url` with a throwaway token.
fn platform_cmd(url: &str) -> assert_cmd::Command {
    let mut cmd = heatly_cmd();
    cmd.args(["--url", url, "--token", "test-token"]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run a blocking command without stalling the mock server's runtime.
async fn run(mut cmd: assert_cmd::Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn page(records: Value) -> Value {
    let total = records.as_array().map_or(0, Vec::len);
    json!({ "resultCode": 0, "message": "成功", "data": { "total": total, "data": records } })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = heatly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    heatly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("provision")
            .and(predicate::str::contains("rename"))
            .and(predicate::str::contains("valves")),
    );
}

#[test]
fn test_version_flag() {
    heatly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("heatly"));
}

#[test]
fn test_completions_bash() {
    heatly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_rename_requires_all_identifiers() {
    let output = heatly_cmd()
        .args(["rename", "--serial", "25249851"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_output_format() {
    let output = heatly_cmd()
        .args(["--output", "xml", "provision", "25012508"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_provision_without_config_fails() {
    let output = heatly_cmd().args(["provision", "25012508"]).output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("config init"), "Expected setup hint:\n{text}");
}

#[test]
fn test_unknown_profile_is_reported() {
    let output = heatly_cmd()
        .args(["--profile", "nowhere", "provision", "25012508"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("nowhere"));
}

#[test]
fn test_url_without_token_is_an_auth_error() {
    let output = heatly_cmd()
        .args(["--url", "http://127.0.0.1:9", "provision", "25012508"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_config_show_without_file() {
    heatly_cmd()
        .args(["config", "show", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_edits_leave_a_broken_file_alone() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join("heatly");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    let broken = "[profiles.plant]\nurl = \"http://10.0.0.5:2288\"\ntoken = \n";
    std::fs::write(&path, broken).unwrap();

    for args in [
        &["config", "use", "plant"][..],
        &["config", "set", "timeout", "12"][..],
    ] {
        let output = heatly_cmd()
            .env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path())
            .args(args)
            .output()
            .unwrap();
        assert!(!output.status.success(), "{args:?} accepted a broken file");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
    }
}

// ── Workflows without network traffic ───────────────────────────────

#[test]
fn test_empty_serial_file_submits_nothing() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# nothing to do this round\n\n").unwrap();

    let output = platform_cmd("http://127.0.0.1:9")
        .args(["provision", "--file"])
        .arg(file.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(10));
    assert!(combined_output(&output).contains("serial number list is empty"));
}

#[test]
fn test_rename_without_yes_is_refused_non_interactively() {
    let output = platform_cmd("http://127.0.0.1:9")
        .args([
            "rename",
            "--serial",
            "25249851",
            "--address",
            "广安苑小区-1#-一单元-2302",
            "--new-serial",
            "24820311",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

// ── End to end against a mock platform ──────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_partial_provisioning_succeeds_with_json_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FIND_EQUIPMENT))
        .and(query_param("serialNo", "25012508"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(json!([{ "serialNo": "25012508", "guid": "g-1" }]))),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(FIND_EQUIPMENT))
        .and(query_param("serialNo", "25012509"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(UPDATE_CONTROL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resultCode": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = platform_cmd(&server.uri());
    cmd.args(["--output", "json", "provision", "25012508", "25012509"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(0), "{}", combined_output(&output));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["kind"], "partially_succeeded");
    assert_eq!(report["device_info"][0]["guid"], "g-1");
    assert_eq!(report["device_info"][1]["reason"], "not found");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unconfirmed_rename_exits_with_verification_code() {
    let server = MockServer::start().await;
    let address = "广安苑小区-1#-一单元-2302";
    Mock::given(method("GET"))
        .and(path(FIND_VALVE))
        .and(query_param("serialNo", "25249851"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            { "serialNo": "25249851", "address": address, "isReadCard": "支持" }
        ]))))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(UPDATE_VALVE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resultCode": 0 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(FIND_VALVE))
        .and(query_param("serialNo", "24820311"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]))))
        .mount(&server)
        .await;

    let mut cmd = platform_cmd(&server.uri());
    cmd.args([
        "--yes",
        "--output",
        "json",
        "rename",
        "--serial",
        "25249851",
        "--address",
        address,
        "--new-serial",
        "24820311",
    ]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(11), "{}", combined_output(&output));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["kind"], "verification_failed");
    assert_eq!(report["update_result"]["resultCode"], 0);
}
