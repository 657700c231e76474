//! Runs the `edavki-merge` binary against the library fixtures in a scratch directory.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root")
        .join("edavki_merge_lib")
        .join("tests")
        .join("fixtures")
}

/// Copies both fixtures into a fresh temp directory.
fn staged_inputs() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let primary = dir.path().join("etoro.xml");
    let secondary = dir.path().join("t212.xml");
    fs::copy(fixtures_dir().join("etoro.xml"), &primary).unwrap();
    fs::copy(fixtures_dir().join("t212.xml"), &secondary).unwrap();
    (dir, primary, secondary)
}

fn edavki_merge() -> Command {
    Command::cargo_bin("edavki-merge").unwrap()
}

#[test]
fn test_default_output_dir_beside_primary() {
    let (dir, primary, secondary) = staged_inputs();

    let assert = edavki_merge().arg(&primary).arg(&secondary).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.starts_with("Done merging."));

    let output = dir.path().join("output");
    assert_eq!(
        fs::read_to_string(output.join("info.log")).unwrap(),
        "Matched code AAPL in eToro\nMatched code MSFT in eToro\n"
    );
    assert_eq!(
        fs::read_to_string(output.join("errors.log")).unwrap(),
        "No match for code TSLA in eToro\n"
    );
    let merged = fs::read_to_string(output.join("merged.xml")).unwrap();
    assert!(merged.contains("<edp:Header>"));
    assert!(merged.contains("<F8>-4.00000000</F8>"));
    assert!(!merged.contains("TSLA"));
}

#[test]
fn test_explicit_output_dir_and_json_summary() {
    let (dir, primary, secondary) = staged_inputs();
    let out = dir.path().join("nested").join("result");

    let assert = edavki_merge()
        .arg(&primary)
        .arg(&secondary)
        .arg("--output-dir")
        .arg(&out)
        .args(["--format", "json"])
        .assert()
        .success();

    let summary: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(summary["matched"], serde_json::json!(["AAPL", "MSFT"]));
    assert_eq!(summary["unmatched"], serde_json::json!(["TSLA"]));
    assert_eq!(summary["securities"].as_array().unwrap().len(), 2);
    assert!(out.join("merged.xml").exists());
    assert!(!dir.path().join("output").exists());
}

#[test]
fn test_table_summary_lists_securities() {
    let (_dir, primary, secondary) = staged_inputs();
    let assert = edavki_merge()
        .arg(&primary)
        .arg(&secondary)
        .args(["--format", "table"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("Final position"));
    assert!(stdout.contains("MSFT"));
}

#[test]
fn test_config_overrides_label() {
    let (dir, primary, secondary) = staged_inputs();
    let config = dir.path().join("merge.toml");
    fs::write(&config, "primary_label = \"Broker A\"\n").unwrap();

    edavki_merge()
        .arg(&primary)
        .arg(&secondary)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let errors = fs::read_to_string(dir.path().join("output").join("errors.log")).unwrap();
    assert_eq!(errors, "No match for code TSLA in Broker A\n");
}

#[test]
fn test_unknown_config_key_fails() {
    let (dir, primary, secondary) = staged_inputs();
    let config = dir.path().join("merge.toml");
    fs::write(&config, "broker = \"x\"\n").unwrap();

    edavki_merge()
        .arg(&primary)
        .arg(&secondary)
        .arg("--config")
        .arg(&config)
        .assert()
        .code(1);
}

#[test]
fn test_missing_input_fails() {
    let (dir, primary, _) = staged_inputs();
    let assert = edavki_merge()
        .arg(&primary)
        .arg(dir.path().join("absent.xml"))
        .assert()
        .code(1);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("absent.xml"));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn test_malformed_date_fails_without_outputs() {
    let (dir, primary, secondary) = staged_inputs();
    let content = fs::read_to_string(&secondary).unwrap();
    fs::write(&secondary, content.replace("2023-01-05", "05.01.2023")).unwrap();

    let assert = edavki_merge().arg(&primary).arg(&secondary).assert().code(1);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("AAPL"));
    assert!(!dir.path().join("output").join("merged.xml").exists());
}
