//! Integration tests for the `exaview` CLI binary.
//!
//! Parsing, help and completions run without a backend; data commands run
//! against a wiremock server passed through `--backend` or a temp-dir profile.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `exaview` binary with env isolation.
///
/// Clears all `EXAVIEW_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn exaview_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("exaview");
    cmd.env("HOME", "/tmp/exaview-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/exaview-cli-test-nonexistent")
        .env_remove("EXAVIEW_PROFILE")
        .env_remove("EXAVIEW_BACKEND")
        .env_remove("EXAVIEW_TOKEN")
        .env_remove("EXAVIEW_OUTPUT")
        .env_remove("EXAVIEW_INSECURE")
        .env_remove("EXAVIEW_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Write `contents` as the config file under a fresh config home.
///
/// Covers the XDG layout and the macOS application-support layout so the
/// same temp dir works as both `HOME` and `XDG_CONFIG_HOME`.
fn config_home(contents: &str) -> tempfile::TempDir {
    let home = tempfile::tempdir().unwrap();
    for dir in [
        home.path().join("exaview"),
        home.path()
            .join("Library")
            .join("Application Support")
            .join("io.ercole.exaview"),
    ] {
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), contents).unwrap();
    }
    home
}

async fn backend() -> (MockServer, String) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/exadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "rackID": "R1",
                "hostname": "exa-milan",
                "components": [
                    {
                        "hostType": "KVM_HOST",
                        "hostID": "H1",
                        "hostname": "kvm01",
                        "vms": [{ "name": "erp-vm", "clusterName": "c-erp" }]
                    }
                ]
            },
            {
                "rackID": "R2",
                "hostname": "exa-turin",
                "components": [
                    { "hostType": "DOM0", "hostID": "H3", "hostname": "dom0-01" }
                ]
            }
        ])))
        .mount(&server)
        .await;
    let url = format!("{}/api/", server.uri());
    (server, url)
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = exaview_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    exaview_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Exadata")
            .and(predicate::str::contains("exadata"))
            .and(predicate::str::contains("licenses")),
    );
}

#[test]
fn test_version_flag() {
    exaview_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("exaview"));
}

#[test]
fn test_completions_bash() {
    exaview_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_agreement_projections_are_exclusive() {
    let output = exaview_cmd()
        .args(["licenses", "agreements", "--numbers", "--csi"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_missing_backend_is_usage_error() {
    let output = exaview_cmd().args(["exadata", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("No backend configured"), "got:\n{text}");
}

#[test]
fn test_config_show_without_file() {
    exaview_cmd()
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_show_redacts_profile_token() {
    let home = config_home(
        r#"
default_profile = "lab"

[profiles.lab]
backend = "https://ercole.lab/api/"
token = "s3cret"
environment = "TEST"
"#,
    );

    let output = exaview_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "show", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let cfg: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cfg["default_profile"], "lab");
    assert_eq!(cfg["profiles"]["lab"]["backend"], "https://ercole.lab/api/");
    assert_eq!(cfg["profiles"]["lab"]["token"], "********");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("s3cret"));
}

#[test]
fn test_unknown_profile_is_not_found() {
    let home = config_home(
        r#"
[profiles.lab]
backend = "https://ercole.lab/api/"
"#,
    );

    let output = exaview_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "use", "prod"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("lab"));
}

#[test]
fn test_bad_older_than_is_rejected() {
    let output = exaview_cmd()
        .args([
            "-b",
            "http://127.0.0.1:9/api/",
            "--older-than",
            "last week",
            "exadata",
            "list",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Against a mock backend ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_exadata_list_plain_prints_rack_ids() {
    let (_server, url) = backend().await;
    exaview_cmd()
        .args(["-b", &url, "-o", "plain", "exadata", "list"])
        .assert()
        .success()
        .stdout(predicate::str::diff("R1\nR2\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_profile_supplies_backend_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/exadata"))
        .and(header("authorization", "Bearer t0k3n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "rackID": "R7", "hostname": "exa-lab", "components": [] }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = config_home(&format!(
        r#"
default_profile = "default"

[profiles.lab]
backend = "{}/api/"
token_env = "EXAVIEW_LAB_TOKEN"
"#,
        server.uri()
    ));

    exaview_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("EXAVIEW_LAB_TOKEN", "t0k3n")
        .args(["--profile", "lab", "-o", "plain", "exadata", "list"])
        .assert()
        .success()
        .stdout(predicate::str::diff("R7\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_exadata_search_narrows_results() {
    let (_server, url) = backend().await;
    let output = exaview_cmd()
        .args(["-b", &url, "-o", "json", "exadata", "list", "-s", "erp"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let racks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let racks = racks.as_array().unwrap();
    assert_eq!(racks.len(), 1);
    assert!(racks[0].to_string().contains("R1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_exadata_show_unknown_rack_exits_not_found() {
    let (_server, url) = backend().await;
    let output = exaview_cmd()
        .args(["-b", &url, "exadata", "show", "NOPE"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_licenses_used_by_cluster() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/settings/oracle/database/license-types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(
            "/api/hosts/technologies/all/databases/licenses-used-per-cluster",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "usedLicensesPerCluster": [
                {
                    "cluster": "c-erp",
                    "hostnames": ["kvm01", "kvm02"],
                    "licenseTypeID": "A90611",
                    "description": "Enterprise Edition",
                    "metric": "Processor Perpetual",
                    "usedLicenses": 4
                }
            ]
        })))
        .mount(&server)
        .await;

    let url = format!("{}/api/", server.uri());
    exaview_cmd()
        .args(["-b", &url, "-o", "plain", "licenses", "used", "--by", "cluster"])
        .assert()
        .success()
        .stdout(predicate::str::diff("c-erp\n"));
}
