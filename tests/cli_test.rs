//! Integration tests for the `tez` binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const REGISTRY: &str = r#"{
    "ghostnet": {
        "human_name": "Ghostnet",
        "git_ref": "octez-v19.1",
        "rpc_url": "https://rpc.ghostnet.teztnets.com",
        "last_baking_daemon": "PtParisB"
    }
}"#;

/// `tez` with a throwaway home and no inherited configuration.
fn tez(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("tez"));
    cmd.env("HOME", home.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("TEZONATOR_REGISTRY_URL")
        .env_remove("TEZONATOR_TIMEOUT")
        .env_remove("TEZONATOR_DEDUPE")
        .env_remove("RUST_LOG");
    cmd
}

fn registry_server() -> MockServer {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/teztnets.json");
        then.status(200).body(REGISTRY);
    });
    server
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    tez(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Octez"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("stop"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    tez(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_a_command() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    tez(&home).assert().failure();
    Ok(())
}

#[test]
fn cli_rejects_unknown_command() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    tez(&home)
        .args(["deploy", "ghostnet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("deploy"));
    Ok(())
}

#[test]
fn cli_rejects_unknown_network() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    tez(&home)
        .args(["build", "atlantis"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("atlantis"))
        .stderr(predicate::str::contains("ghostnet"));
    Ok(())
}

#[test]
fn cli_requires_a_network() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    tez(&home).arg("init").assert().failure();
    Ok(())
}

#[test]
fn completions_for_bash() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    tez(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tez"));
    Ok(())
}

#[test]
fn networks_lists_registry_entries() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = registry_server();
    tez(&home)
        .args(["networks", "--registry-url", &server.url("/teztnets.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("octez-v19.1"))
        .stdout(predicate::str::contains("mainnet"));
    Ok(())
}

#[test]
fn network_missing_from_registry_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = registry_server();
    tez(&home)
        .args(["start", "mainnet"])
        .env("TEZONATOR_REGISTRY_URL", server.url("/teztnets.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not find mainnet"));
    Ok(())
}

#[test]
fn unreachable_registry_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/teztnets.json");
        then.status(503);
    });
    tez(&home)
        .args(["stop", "ghostnet", "--registry-url", &server.url("/teztnets.json")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("503"));
    Ok(())
}

#[test]
fn invalid_settings_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let config_dir = home.path().join(".config").join("tezonator");
    fs::create_dir_all(&config_dir)?;
    fs::write(config_dir.join("config.yml"), "git_urll: nowhere\n")?;

    tez(&home)
        .args(["init", "ghostnet"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config.yml"));
    Ok(())
}

#[test]
fn short_home_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    tez(&home)
        .env("HOME", "/r")
        .args(["init", "ghostnet"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("home directory"));
    Ok(())
}
