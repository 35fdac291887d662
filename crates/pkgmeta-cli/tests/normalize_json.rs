//! Integration tests for `pkgmeta normalize`.

use serde_json::{json, Value};
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "pkgmeta-cli", "--bin", "pkgmeta", "--"]);
    cmd
}

#[test]
fn test_normalize_reads_readme_and_writes() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"name": "demo", "custom": true}"#,
    )
    .unwrap();
    fs::write(dir.path().join("README.md"), "\nA demo package.\n\n").unwrap();

    let output = cargo_bin()
        .arg("--json")
        .arg("--cwd")
        .arg(dir.path())
        .args(["normalize", "--write"])
        .output()
        .expect("Failed to run normalize");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");

    assert_eq!(value["ok"], json!(true));
    assert_eq!(value["written"], json!(true));
    assert_eq!(value["manifest"]["description"], json!("A demo package."));

    let written: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("package.json")).unwrap())
            .unwrap();
    assert_eq!(written["description"], json!("A demo package."));
    assert_eq!(written["custom"], json!(true));
}
