#![allow(deprecated)] // Command::cargo_bin is deprecated in newer assert_cmd releases

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn tlspc() -> Command {
    let mut cmd = Command::cargo_bin("tlspc").unwrap();
    cmd.env_remove("TLSPC_APIKEY")
        .env_remove("TLSPC_ENDPOINT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    tlspc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("schema"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_resources_lists_types() {
    tlspc()
        .arg("resources")
        .assert()
        .success()
        .stdout(predicate::str::contains("tlspc_team"))
        .stdout(predicate::str::contains("tlspc_firefly_policy"))
        .stdout(predicate::str::contains("tlspc_user"));
}

#[test]
fn test_schema_for_type() {
    let output = tlspc()
        .args(["schema", "--type", "tlspc_service_account"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["attributes"]["owner"]["mode"], "required");
    assert_eq!(schema["attributes"]["id"]["mode"], "computed");
}

#[test]
fn test_schema_unknown_type() {
    tlspc()
        .args(["schema", "--type", "tlspc_nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resource type"));
}

#[test]
fn test_create_without_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let planned = dir.path().join("team.json");
    fs::write(&planned, r#"{"name": "platform", "role": "GUEST", "owners": []}"#).unwrap();

    tlspc()
        .args(["create", "--type", "tlspc_team", "--planned"])
        .arg(&planned)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing API key"));
}

#[test]
fn test_conflicting_service_account_fails_before_request() {
    let dir = tempfile::tempdir().unwrap();
    let planned = dir.path().join("sa.json");
    fs::write(
        &planned,
        r#"{
            "name": "agent",
            "owner": "0f6a7c1e-5b1d-4c3e-9a8f-2d4b6e8a0c1f",
            "scopes": ["kubernetes-discovery"],
            "public_key": "-----BEGIN PUBLIC KEY-----",
            "jwks_uri": "https://issuer.example/jwks"
        }"#,
    )
    .unwrap();

    // Nothing listens on the discard port; reaching the network would
    // surface a connection error instead.
    tlspc()
        .env("TLSPC_APIKEY", "test-key")
        .env("TLSPC_ENDPOINT", "http://127.0.0.1:9")
        .args(["create", "--type", "tlspc_service_account", "--planned"])
        .arg(&planned)
        .assert()
        .failure()
        .stderr(predicate::str::contains("both public_key and jwks"));
}

#[test]
fn test_provider_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("provider.json");
    fs::write(&config, r#"{"apikey": "file-key", "endpoint": "http://127.0.0.1:9"}"#).unwrap();

    tlspc()
        .arg("--provider-config")
        .arg(&config)
        .args(["data", "--type", "tlspc_user", "--config", "-"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("email: required attribute is missing"));
}

#[test]
fn test_apikey_flag() {
    let dir = tempfile::tempdir().unwrap();
    let planned = dir.path().join("sa.json");
    fs::write(
        &planned,
        r#"{
            "name": "agent",
            "owner": "0f6a7c1e-5b1d-4c3e-9a8f-2d4b6e8a0c1f",
            "scopes": ["kubernetes-discovery"],
            "public_key": "-----BEGIN PUBLIC KEY-----",
            "jwks_uri": "https://issuer.example/jwks"
        }"#,
    )
    .unwrap();

    // Without the flag this would fail on the missing API key.
    tlspc()
        .args(["--apikey", "flag-key", "--endpoint", "http://127.0.0.1:9"])
        .args(["create", "--type", "tlspc_service_account", "--planned"])
        .arg(&planned)
        .assert()
        .failure()
        .stderr(predicate::str::contains("both public_key and jwks"))
        .stderr(predicate::str::contains("Missing API key").not());
}

#[test]
fn test_endpoint_flag_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("provider.json");
    fs::write(&config, r#"{"apikey": "file-key", "endpoint": "http://127.0.0.1:9"}"#).unwrap();

    tlspc()
        .arg("--provider-config")
        .arg(&config)
        .args(["import", "--type", "tlspc_team", "--id", "t-1"])
        .args(["--endpoint", "http://127.0.0.1:7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("127.0.0.1:7"))
        .stderr(predicate::str::contains("127.0.0.1:9").not());
}
