//! CLI command tests for sofle-flash
//!
//! Runs the built binary against a temporary config and checks stdout,
//! stderr and exit codes of the commands that need no hardware or network.

use std::path::Path;
use std::process::{Command, Stdio};

use test_fixtures::*;

/// Captured result of one CLI invocation
#[derive(Debug)]
pub struct CliResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run the sofle-flash binary with `args` and no terminal attached
fn execute_cli(args: &[&str], home: Option<&Path>) -> CliResult {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sofle-flash"));
    cmd.args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(home) = home {
        cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    }

    let output = cmd.output().expect("Failed to run sofle-flash");
    CliResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    }
}

#[test]
fn test_no_arguments_prints_usage() {
    let env = TestEnvironment::new();
    let result = execute_cli(&[], Some(env.temp_dir.path()));

    assert_eq!(result.exit_code, 0, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("Usage"));
    for command in ["download", "version", "all", "left", "right", "btclear"] {
        assert!(
            result.stdout.contains(command),
            "Usage should list {}",
            command
        );
    }
}

#[test]
fn test_help_exits_zero() {
    let result = execute_cli(&["--help"], None);

    assert_eq!(result.exit_code, 0);
    assert!(result.stdout.contains("Sofle"));
}

#[test]
fn test_unknown_command_exits_one() {
    let result = execute_cli(&["flash-everything"], None);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("flash-everything"));
}

/// `version` without a download reports it and still succeeds
#[test]
fn test_version_without_download() {
    let env = TestEnvironment::new();
    let config = env.write_config_file();

    let result = execute_cli(
        &["version", "--config", &config.to_string_lossy()],
        Some(env.temp_dir.path()),
    );

    assert_eq!(result.exit_code, 0, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("No firmware version found"));
}

#[test]
fn test_version_prints_descriptor() {
    let env = TestEnvironment::new();
    let config = env.write_config_file();
    descriptor_for(COMMIT, 17_482_113_905)
        .save(&env.config.version_file())
        .expect("Save descriptor");

    let result = execute_cli(
        &["version", "--config", &config.to_string_lossy()],
        Some(env.temp_dir.path()),
    );

    assert_eq!(result.exit_code, 0, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("v2.3.0"));
    assert!(result.stdout.contains(&COMMIT[..7]));
    assert!(result.stdout.contains("Move bluetooth keys to lower layer"));
    assert!(result.stdout.contains("17482113905"));
}

#[test]
fn test_missing_config_file_exits_one() {
    let env = TestEnvironment::new();
    let missing = env.temp_dir.path().join("nope.toml");

    let result = execute_cli(
        &["version", "--config", &missing.to_string_lossy()],
        Some(env.temp_dir.path()),
    );

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("❌"));
}

#[test]
fn test_invalid_config_file_exits_one() {
    let env = TestEnvironment::new();
    let config = env.temp_dir.path().join("broken.toml");
    std::fs::write(&config, "[device\nwait_timeout_secs = ").expect("Write config");

    let result = execute_cli(
        &["version", "--config", &config.to_string_lossy()],
        Some(env.temp_dir.path()),
    );

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("Failed to load configuration"));
}
