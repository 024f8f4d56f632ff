//! CLI integration tests
//!
//! These tests run the binary against manifests written to a temp dir.
#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_xmlschema-config"))
}

fn write_manifest(dir: &Path) -> PathBuf {
    let path = dir.join("manifest.json");
    std::fs::write(
        &path,
        r#"{
            "stock": false,
            "configurations": [
                {"namespace": "urn:x", "schemaLocation": "http://example.com/x.xsd", "dependencies": ["urn:y"]},
                {"namespace": "urn:y", "schemaLocation": "http://example.com/y.xsd",
                 "bindings": [{"name": "Thing", "kind": "element", "strategy": "thing"}]}
            ]
        }"#,
    )
    .unwrap();
    path
}

#[test]
fn test_cli_order() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(bin())
        .arg("order")
        .arg(write_manifest(dir.path()))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "order should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let namespaces: Vec<_> = stdout
        .lines()
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(namespaces, vec!["urn:y", "urn:x"]);
}

#[test]
fn test_cli_resolve() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(dir.path());

    let output = Command::new(bin())
        .arg("resolve")
        .arg(&manifest)
        .args(["urn:y", "ignored.xsd"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "http://example.com/y.xsd");

    let output = Command::new(bin())
        .arg("resolve")
        .arg(&manifest)
        .arg("urn:z")
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success(), "unclaimed namespace without hint should fail");
    assert!(String::from_utf8_lossy(&output.stderr).contains("urn:z"));
}

#[test]
fn test_cli_resolve_joins_hint_against_base() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(dir.path());

    let output = Command::new(bin())
        .arg("resolve")
        .arg(&manifest)
        .args(["urn:z", "sub/z.xsd"])
        .args(["--base", "http://example.com/dir/doc.xsd"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "http://example.com/dir/sub/z.xsd"
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("using hint"));
}

#[test]
fn test_cli_inspect_json() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(bin())
        .arg("inspect")
        .arg("--json")
        .arg(write_manifest(dir.path()))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON output");
    assert_eq!(json["configurations"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["bindings"][0]["name"], "{urn:y}Thing");
    assert_eq!(json["bindings"][0]["kind"], "element");
}

#[test]
fn test_cli_reports_cycles() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cycle.json");
    std::fs::write(
        &path,
        r#"{"stock": false, "configurations": [
            {"namespace": "urn:a", "schemaLocation": "a.xsd", "dependencies": ["urn:b"]},
            {"namespace": "urn:b", "schemaLocation": "b.xsd", "dependencies": ["urn:a"]}
        ]}"#,
    )
    .unwrap();

    let output = Command::new(bin())
        .arg("order")
        .arg(&path)
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cyclic dependency"));
}
