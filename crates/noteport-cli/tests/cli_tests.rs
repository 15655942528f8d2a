//! Integration tests for the noteport binary
//!
//! Each test builds a small vault in a temp directory and runs the binary
//! with `NOTEPORT_TEST_MODE` set so no per-user config file is read.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn noteport() -> Command {
    let mut cmd = Command::cargo_bin("noteport").unwrap();
    cmd.env("NOTEPORT_TEST_MODE", "1").env_remove("NOTEPORT_LOG");
    cmd
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_vault() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "Projects/Alpha.md",
        "---\nstatus: active\ncreated: 2024-03-01\n---\n# Alpha\nSee [[Beta]].",
    );
    write(
        root,
        "Projects/Beta.md",
        "---\nstatus: done\ncreated: 2024-03-02\n---\nBack to [[Alpha]].",
    );
    write(root, "Journal/2024-03-01.md", "- met with [[Alpha]] team");
    write(root, ".obsidian/app.md", "ignored");
    dir
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_version() {
    noteport()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_cli_help_lists_commands() {
    noteport()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("parse"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    noteport()
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .arg("parse")
        .arg("a.md")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

// ============================================================================
// Scan
// ============================================================================

#[test]
fn test_scan_prints_report() {
    let vault = sample_vault();
    noteport()
        .arg("scan")
        .arg(vault.path())
        .args(["--name", "Test Vault"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Vault Scan: Test Vault"))
        .stdout(predicate::str::contains("**Files:** 3"))
        .stdout(predicate::str::contains("\"id\": \"folder\""))
        .stdout(predicate::str::contains("- **created** → `created`"));
}

#[test]
fn test_scan_writes_report_and_schema() {
    let vault = sample_vault();
    let out = TempDir::new().unwrap();
    let report = out.path().join("report.md");
    let schema = out.path().join("schema.json");

    noteport()
        .arg("scan")
        .arg(vault.path())
        .args(["--name", "Test Vault"])
        .arg("--out")
        .arg(&report)
        .arg("--schema-out")
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(fs::read_to_string(&report).unwrap().contains("## Next Steps"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&schema).unwrap()).unwrap();
    assert_eq!(json["name"], "Test Vault");
    let folder = &json["fields"][0];
    assert_eq!(folder["id"], "folder");
    assert_eq!(folder["choices"].as_array().unwrap().len(), 2);
}

#[test]
fn test_scan_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    noteport()
        .arg("scan")
        .arg(dir.path().join("nope"))
        .args(["--name", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vault directory does not exist"));
}

// ============================================================================
// Import
// ============================================================================

#[test]
fn test_scan_then_import_round_trip() {
    let vault = sample_vault();
    let out = TempDir::new().unwrap();
    let schema = out.path().join("schema.json");
    let records = out.path().join("records.json");

    noteport()
        .arg("scan")
        .arg(vault.path())
        .args(["--name", "Test Vault"])
        .arg("--schema-out")
        .arg(&schema)
        .assert()
        .success();

    noteport()
        .arg("import")
        .arg(vault.path())
        .arg("--schema")
        .arg(&schema)
        .arg("--out")
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported"))
        .stdout(predicate::str::contains("Links resolved"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&records).unwrap()).unwrap();
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 3);

    let alpha = records.iter().find(|r| r["title"] == "Alpha").unwrap();
    assert_eq!(alpha["properties"]["folder"]["value"], "projects");
    assert_eq!(alpha["properties"]["created"]["type"], "datetime");

    let text_block = &alpha["blocks"][1];
    let beta_id = records.iter().find(|r| r["title"] == "Beta").unwrap()["id"].clone();
    assert!(text_block["segments"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["type"] == "ref" && s["text"] == beta_id));
}

#[test]
fn test_import_rejects_invalid_schema() {
    let vault = sample_vault();
    let out = TempDir::new().unwrap();
    let schema = out.path().join("schema.json");
    fs::write(&schema, r#"{"ver": 2}"#).unwrap();

    noteport()
        .arg("import")
        .arg(vault.path())
        .arg("--schema")
        .arg(&schema)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid schema"));
}

// ============================================================================
// Parse
// ============================================================================

#[test]
fn test_parse_prints_json() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("note.md");
    fs::write(&file, "---\ntags: [a, b]\n---\n# Title\n\nSome **bold** text").unwrap();

    let assert = noteport().arg("parse").arg(&file).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(json["path"], "note.md");
    assert_eq!(json["format"], "markdown");
    assert_eq!(json["properties"]["tags"], serde_json::json!(["a", "b"]));
    assert_eq!(json["blocks"][0]["kind"], "heading");
    assert_eq!(json["blocks"][1]["segments"][1], serde_json::json!({"type": "bold", "text": "bold"}));
}

#[test]
fn test_parse_outline_format_flag() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("page.md");
    fs::write(&file, "type:: book\n- first block\n  id:: 64f0-aaaa").unwrap();

    noteport()
        .args(["--format", "outline", "parse"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"format\": \"outline\""))
        .stdout(predicate::str::contains("64f0-aaaa"));
}
