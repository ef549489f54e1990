//! Integration tests for the `jiofly` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! offline parsing and config handling. Device-facing commands run
//! against a wiremock server, never a real hotspot or broker.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `jiofly` binary with env isolation.
///
/// Clears all `JIOFLY_*` env vars and points config directories at `home`
/// so tests never touch the user's real configuration.
fn jiofly_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("jiofly");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("JIOFLY_CONFIG")
        .env_remove("JIOFLY_DEVICE_URL")
        .env_remove("JIOFLY_TIMEOUT")
        .env_remove("JIOFLY_OUTPUT")
        .env_remove("JIOFLY_BROKER_HOST")
        .env_remove("JIOFLY_BROKER_PORT")
        .env_remove("JIOFLY_ROOT_TOPIC");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const LTE_PAGE: &str = "<lte_status>\
    <cspn>Jio 4G</cspn><attach>Attached</attach><time>01:02:03</time><apn>jionet</apn>\
    <freq_info>a,b,c,d,20,1850,3,FDD</freq_info>\
    <cell_node>405874,0x1A2B3C,287,40587400</cell_node>\
    <rssi_info>-95,-11,12,-70</rssi_info>\
    </lte_status>";

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = jiofly_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    jiofly_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("MQTT")
            .and(predicate::str::contains("bridge"))
            .and(predicate::str::contains("show"))
            .and(predicate::str::contains("parse")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    jiofly_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jiofly"));
}

#[test]
fn test_unknown_page_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    jiofly_cmd(home.path())
        .args(["show", "gps_info"])
        .assert()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    jiofly_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    jiofly_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_pages_plain() {
    let home = tempfile::tempdir().unwrap();
    jiofly_cmd(home.path())
        .args(["pages", "-o", "plain"])
        .assert()
        .success()
        .stdout("lte_status\nlan_info\nwan_info\ndev_details\nsys_perf\n");
}

#[test]
fn test_pages_json_lists_known_keys() {
    let home = tempfile::tempdir().unwrap();
    let output = jiofly_cmd(home.path())
        .args(["pages", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let pages: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(pages[2]["page"], "wan_info");
    assert_eq!(pages[2]["path"], "st_wan.w.xml");
    assert_eq!(pages[2]["facts"], serde_json::json!(["t_tx", "t_rx", "plps"]));
}

#[test]
fn test_parse_file() {
    let home = tempfile::tempdir().unwrap();
    let doc = home.path().join("st_lte.w.xml");
    std::fs::write(&doc, LTE_PAGE).unwrap();

    jiofly_cmd(home.path())
        .args(["parse", "lte", doc.to_str().unwrap(), "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("lte_status/earfcn 1850\n")
                .and(predicate::str::contains("lte_status/band 3\n"))
                .and(predicate::str::contains("lte_status/rsrp -95\n"))
                .and(predicate::str::contains("lte_status/freq_info_unkn0 a\n")),
        );
}

#[test]
fn test_parse_stdin_unavailable() {
    let home = tempfile::tempdir().unwrap();
    jiofly_cmd(home.path())
        .args(["parse", "sys_perf", "-", "-o", "plain"])
        .write_stdin("<html><body>login</body>")
        .assert()
        .success()
        .stdout("sys_perf unavailable\n");
}

#[test]
fn test_parse_missing_file() {
    let home = tempfile::tempdir().unwrap();
    jiofly_cmd(home.path())
        .args(["parse", "wan_info", "/nonexistent/st_wan.w.xml"])
        .assert()
        .code(1);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_init_then_show() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("jiofly.toml");
    let path_arg = path.to_str().unwrap();

    jiofly_cmd(home.path())
        .args(["config", "init", "--config", path_arg])
        .assert()
        .success();
    assert!(path.exists());

    // Second init refuses to clobber.
    jiofly_cmd(home.path())
        .args(["config", "init", "--config", path_arg])
        .assert()
        .code(9);

    jiofly_cmd(home.path())
        .args(["config", "show", "--config", path_arg])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("root_topic = \"home/devices/jiofi\"")
                .and(predicate::str::contains("interval = 30")),
        );
}

#[test]
fn test_config_path_honours_flag() {
    let home = tempfile::tempdir().unwrap();
    jiofly_cmd(home.path())
        .args(["config", "path", "--config", "/etc/jiofly.toml"])
        .assert()
        .success()
        .stdout("/etc/jiofly.toml\n");
}

#[test]
fn test_config_env_override() {
    let home = tempfile::tempdir().unwrap();
    jiofly_cmd(home.path())
        .env("JIOFLY_MQTT__HOST", "broker.lan")
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"host\": \"broker.lan\""));
}

#[test]
fn test_invalid_qos_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("bad.toml");
    std::fs::write(&path, "[mqtt]\nqos = 7\n").unwrap();

    jiofly_cmd(home.path())
        .args(["config", "show", "--config", path.to_str().unwrap()])
        .assert()
        .code(2);
}

// ── Device-facing commands ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_show_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/st_wan.w.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<wan><t_tx>1024</t_tx><t_rx>4096</t_rx></wan>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    jiofly_cmd(home.path())
        .args(["show", "wan", "-o", "plain", "--device", &server.uri()])
        .assert()
        .success()
        .stdout("wan_info/t_rx 4096\nwan_info/t_tx 1024\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_http_error_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let output = jiofly_cmd(home.path())
        .args(["show", "dev", "--device", &server.uri()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert!(combined_output(&output).contains("404"));
}

#[test]
fn test_show_unreachable_device() {
    let home = tempfile::tempdir().unwrap();
    jiofly_cmd(home.path())
        .args(["show", "--device", "http://127.0.0.1:9/", "--timeout", "2"])
        .assert()
        .code(predicate::in_iter([7, 8]));
}
