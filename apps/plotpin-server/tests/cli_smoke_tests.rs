//! CLI smoke tests for the plotpin-server binary: help/version output,
//! configuration checking and config printing.

use std::process::{Command, Stdio};

use tempfile::TempDir;

fn run_plotpin_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_plotpin-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute plotpin-server")
}

fn write_config(dir: &TempDir, token_secret: &str) -> std::path::PathBuf {
    let home = dir.path().join("home");
    let path = dir.path().join("config.yaml");
    let yaml = format!(
        r#"
server:
  home_dir: "{}"
  host: "127.0.0.1"
  port: 18087

database:
  url: "sqlite://data/pins.db"

auth:
  token_secret: "{}"
"#,
        home.to_string_lossy().replace('\\', "/"),
        token_secret
    );
    std::fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn help_lists_commands_and_options() {
    let output = run_plotpin_server(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("plotpin-server"));
    assert!(stdout.contains("Usage:") || stdout.contains("USAGE:"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--mock"));
}

#[test]
fn version_prints_the_binary_version() {
    let output = run_plotpin_server(&["--version"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("plotpin-server"));
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn unknown_subcommand_fails() {
    let output = run_plotpin_server(&["frobnicate"]);
    assert!(!output.status.success());
}

#[test]
fn check_accepts_a_valid_config() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(&tmp, "smoke-secret");

    let output = run_plotpin_server(&["--config", cfg.to_str().unwrap(), "check"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration check passed"));
}

#[test]
fn check_rejects_a_missing_token_secret() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(&tmp, "");

    let output = run_plotpin_server(&["--config", cfg.to_str().unwrap(), "check"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("token_secret"));
}

#[test]
fn print_config_echoes_effective_yaml() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(&tmp, "smoke-secret");

    let output = run_plotpin_server(&["--config", cfg.to_str().unwrap(), "--print-config"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("server:"));
    assert!(stdout.contains("port: 18087"));
    // The secret is configuration, not a log line, so it appears verbatim here.
    assert!(stdout.contains("token_secret: smoke-secret"));
}

#[test]
fn port_override_survives_into_printed_config() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(&tmp, "smoke-secret");

    let output = run_plotpin_server(&[
        "--config",
        cfg.to_str().unwrap(),
        "--port",
        "3000",
        "--print-config",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 3000"));
}
