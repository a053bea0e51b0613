//! Integration tests for the eca CLI.
//!
//! Every invocation gets its own config directory so the user's real
//! configuration is never read or written.
//!
//! Run with: `cargo test --package eca-cli --test cli_integration`

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Helper to run the eca CLI with an isolated config directory.
fn run_eca(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_eca"))
        .current_dir(config_dir)
        .env("ECA_CONFIG_DIR", config_dir)
        .env_remove("ECA_RULE")
        .env_remove("ECA_SIZE")
        .env_remove("ECA_STEPS")
        .env_remove("ECA_MODE")
        .env_remove("ECA_RESOLVERS_FILE")
        .args(args)
        .output()
        .expect("Failed to execute eca command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

// =============================================================================
// Rule Command Tests
// =============================================================================

#[test]
fn test_rule_prints_dictionary() {
    let temp = TempDir::new().unwrap();
    let output = run_eca(temp.path(), &["rule", "30"]);

    assert!(output.status.success(), "eca rule should succeed");
    let out = stdout(&output);
    assert!(out.contains("Rule 30 (00011110)"));
    assert!(out.contains("111 -> 0"));
    assert!(out.contains("100 -> 1"));
    assert!(out.contains("000 -> 0"));
}

#[test]
fn test_rule_out_of_range_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_eca(temp.path(), &["rule", "256"]);

    assert!(!output.status.success(), "rule 256 should be rejected");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid rule number"));
}

// =============================================================================
// Run Command Tests
// =============================================================================

#[test]
fn test_run_text_rule_90() {
    let temp = TempDir::new().unwrap();
    let output = run_eca(
        temp.path(),
        &["run", "-r", "90", "-s", "9", "-n", "4", "--seed", "center"],
    );

    assert!(output.status.success(), "eca run should succeed");
    assert_eq!(
        stdout(&output),
        "    █    \n   █ █   \n  █   █  \n █ █ █ █ \n"
    );
}

#[test]
fn test_run_pbm_to_file() {
    let temp = TempDir::new().unwrap();
    let out_path = temp.path().join("rule30.pbm");
    let output = run_eca(
        temp.path(),
        &[
            "run",
            "-r",
            "30",
            "-s",
            "5",
            "-n",
            "3",
            "-f",
            "pbm",
            "--cell-px",
            "2",
            "-o",
            out_path.to_str().unwrap(),
        ],
    );

    assert!(output.status.success(), "eca run -f pbm should succeed");
    assert!(stdout(&output).contains("💾 Saved to"));

    let pbm = fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = pbm.lines().collect();
    assert_eq!(lines[0], "P1");
    assert_eq!(lines[2], "10 6");
    // Second generation of rule 30 from a centered seed: 01110.
    assert_eq!(lines[5], "0 0 1 1 1 1 1 1 0 0");
}

#[test]
fn test_run_from_config_file_with_override() {
    let temp = TempDir::new().unwrap();
    let run_file = temp.path().join("run.toml");
    fs::write(
        &run_file,
        r#"
size = 5
rule = 30
steps = 10

[seed]
kind = "cells"
indices = [0]
"#,
    )
    .unwrap();

    let output = run_eca(
        temp.path(),
        &["run", "-c", run_file.to_str().unwrap(), "-n", "2"],
    );

    assert!(output.status.success(), "eca run -c should succeed");
    // Rule 30 from 10000 on a ring: 11001.
    assert_eq!(stdout(&output), "█    \n██  █\n");
}

#[test]
fn test_run_rejects_seed_outside_row() {
    let temp = TempDir::new().unwrap();
    let output = run_eca(temp.path(), &["run", "-s", "4", "--seed", "cells:7"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of range"));
}

// =============================================================================
// Compare Command Tests
// =============================================================================

#[test]
fn test_compare_baseline_is_perfect() {
    let temp = TempDir::new().unwrap();
    let output = run_eca(
        temp.path(),
        &["compare", "--baseline", "-r", "110", "-s", "12", "-n", "5"],
    );

    assert!(output.status.success(), "eca compare --baseline should succeed");
    let out = stdout(&output);
    assert!(out.contains("table-lookup"));
    assert!(out.contains("Accuracy:    100.0%"));
    assert!(out.contains("Exact rows:  5/5"));
}

#[test]
fn test_compare_json_report() {
    let temp = TempDir::new().unwrap();
    let output = run_eca(
        temp.path(),
        &[
            "compare",
            "--baseline",
            "--json",
            "-m",
            "row",
            "-r",
            "30",
            "-s",
            "7",
            "-n",
            "3",
        ],
    );

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["rule"], 30);
    assert_eq!(report["mode"], "row");
    assert_eq!(report["steps"].as_array().unwrap().len(), 3);
    assert_eq!(report["steps"][0]["failures"], 0);
}

#[test]
fn test_compare_unreachable_model_counts_failures() {
    let temp = TempDir::new().unwrap();
    let resolvers = temp.path().join("resolvers.toml");
    fs::write(
        &resolvers,
        r#"
[[resolvers]]
api_url = "http://127.0.0.1:9/v1"
api_key = ""
model_name = "nobody"
"#,
    )
    .unwrap();

    let output = run_eca(
        temp.path(),
        &[
            "compare",
            "--resolvers",
            resolvers.to_str().unwrap(),
            "-m",
            "row",
            "-s",
            "4",
            "-n",
            "2",
        ],
    );

    assert!(
        output.status.success(),
        "model failures must not abort the comparison"
    );
    let out = stdout(&output);
    assert!(out.contains("Failures:    8"));
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_set_get_round_trip() {
    let temp = TempDir::new().unwrap();

    let output = run_eca(temp.path(), &["config", "set", "rule", "110"]);
    assert!(output.status.success());
    assert!(temp.path().join("config.json").exists());

    let output = run_eca(temp.path(), &["config", "get", "rule"]);
    assert_eq!(stdout(&output).trim(), "110");

    let output = run_eca(temp.path(), &["config", "set", "rule", "999"]);
    assert!(!output.status.success());
}

#[test]
fn test_config_path_uses_override() {
    let temp = TempDir::new().unwrap();
    let output = run_eca(temp.path(), &["config", "path"]);

    assert!(output.status.success());
    assert!(stdout(&output).trim().ends_with("config.json"));
    assert!(stdout(&output).contains(temp.path().to_str().unwrap()));
}

#[test]
fn test_config_reset_recovers_corrupt_file() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.path().join("config.json");
    fs::write(&config_file, "{ not json").unwrap();

    let output = run_eca(temp.path(), &["config", "show"]);
    assert!(!output.status.success(), "a corrupt config should fail to load");

    let output = run_eca(temp.path(), &["config", "path"]);
    assert!(output.status.success());
    assert!(stdout(&output).trim().ends_with("config.json"));

    let output = run_eca(temp.path(), &["config", "reset"]);
    assert!(output.status.success());

    let output = run_eca(temp.path(), &["config", "get", "rule"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "30");
}
