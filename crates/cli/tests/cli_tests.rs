//! CLI integration tests

use std::process::Command;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-q", "-p", "evp-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("EV Charging Predictor"), "Should show app name");
    assert!(stdout.contains("duration"), "Should show duration command");
    assert!(stdout.contains("fault"), "Should show fault command");
    assert!(stdout.contains("health"), "Should show health command");
    assert!(stdout.contains("config"), "Should show config command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = run_cli(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("evp"), "Should show binary name");
}

/// Test duration subcommand help
#[test]
fn test_duration_help() {
    let output = run_cli(&["duration", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Duration help should succeed");
    for flag in [
        "--battery-capacity",
        "--current-soc",
        "--target-soc",
        "--charge-power",
        "--temperature",
    ] {
        assert!(stdout.contains(flag), "Should show {} option", flag);
    }
}

/// Test fault subcommand help
#[test]
fn test_fault_help() {
    let output = run_cli(&["fault", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Fault help should succeed");
    for flag in [
        "--total-charge-count",
        "--total-charge-amount",
        "--days-since-last-maintenance",
        "--health-score",
        "--avg-daily-usage",
        "--voltage-fluctuation",
        "--fault-history-count",
    ] {
        assert!(stdout.contains(flag), "Should show {} option", flag);
    }
}

/// Test config subcommand help
#[test]
fn test_config_help() {
    let output = run_cli(&["config", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Config help should succeed");
    assert!(stdout.contains("show"), "Should show show subcommand");
    assert!(stdout.contains("set-url"), "Should show set-url subcommand");
}

/// Test global options
#[test]
fn test_global_options() {
    let output = run_cli(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--api-url"), "Should show api-url option");
    assert!(stdout.contains("EVP_API_URL"), "Should show env var");
    assert!(stdout.contains("--format"), "Should show format option");
    assert!(stdout.contains("table"), "Should list table format");
    assert!(stdout.contains("json"), "Should list json format");
}

/// Test invalid command
#[test]
fn test_invalid_command() {
    let output = run_cli(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
}

/// Test missing required argument
#[test]
fn test_missing_argument() {
    let output = run_cli(&["duration", "--battery-capacity", "60"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Missing arguments should fail");
    assert!(stderr.contains("--current-soc"), "Should name the missing option");
}

/// Test that non-numeric values are rejected before any request
#[test]
fn test_invalid_number_rejected() {
    let output = run_cli(&["fault", "--total-charge-count", "many"]);

    assert!(!output.status.success(), "Invalid number should fail");
}
