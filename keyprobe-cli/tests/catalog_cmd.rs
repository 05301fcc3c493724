use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn keyprobe(templates_dir: &Path) -> Command {
    let bin = assert_cmd::cargo::cargo_bin!("keyprobe");
    let mut cmd = Command::new(bin);
    cmd.arg("--templates-dir").arg(templates_dir);
    cmd
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("github.yaml"),
        r#"
name: github
description: GitHub personal access token
api_url: https://api.github.com/user
request:
  headers:
    Authorization: "token ${SECRET}"
success_criteria:
  status_code: [200]
  required_fields: ["$.login"]
"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("broken.yml"),
        r#"
name: broken
api_url: "https://example.com/${API_TOKEN}"
mode: single
success_criteria:
  status_code: [200]
"#,
    )
    .unwrap();
    dir
}

#[test]
fn list_shows_modes_and_flags_invalid_templates() {
    let dir = fixture();
    keyprobe(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available templates (2):"))
        .stdout(predicate::str::contains("github          [single    ] - GitHub personal access token"))
        .stdout(predicate::str::contains("broken          [invalid   ] - [Invalid template]"));
}

#[test]
fn list_on_empty_directory() {
    let dir = TempDir::new().unwrap();
    keyprobe(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates found."));
}

#[test]
fn list_on_missing_directory_exits_2() {
    let dir = TempDir::new().unwrap();
    keyprobe(&dir.path().join("absent"))
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("templates directory not found"));
}

#[test]
fn info_prints_masked_details() {
    let dir = fixture();
    keyprobe(dir.path())
        .args(["info", "github"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Template: github"))
        .stdout(predicate::str::contains("Mode: single"))
        .stdout(predicate::str::contains("  Authorization: token ***SECRET***"))
        .stdout(predicate::str::contains("  keyprobe validate github <secret>"))
        .stdout(predicate::str::contains("  Required Fields: $.login"));
}

#[test]
fn info_on_invalid_template_exits_2() {
    let dir = fixture();
    keyprobe(dir.path())
        .args(["info", "broken"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("[FAILED] Template 'broken' is invalid"));
}
