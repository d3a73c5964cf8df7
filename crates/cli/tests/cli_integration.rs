//! End-to-end tests for the kanflow binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
    "tasks": [
        {"id": 10, "ticket": "KAN-10", "title": "Checkout epic", "status": "in_progress", "projectId": 4},
        {"id": 11, "ticket": "KAN-11", "title": "Cart page", "status": "done", "projectId": 4},
        {"id": 12, "ticket": "KAN-12", "title": "Payment form", "status": "open", "projectId": 4},
        {"id": 13, "ticket": "KAN-13", "title": "Card validation", "status": "open", "projectId": 4}
    ],
    "relationships": [
        {"sourceTaskId": 10, "targetTaskId": 11, "kind": "parent"},
        {"sourceTaskId": 10, "targetTaskId": 12, "kind": "parent"},
        {"sourceTaskId": 13, "targetTaskId": 12, "kind": "child"}
    ]
}"#;

fn kanflow(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kanflow"));
    cmd.current_dir(dir.path()).env_remove("KANFLOW_CONFIG");
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tasks.json"), SNAPSHOT).unwrap();
    dir
}

#[test]
fn test_render_tree_from_leaf() {
    let dir = workspace();

    kanflow(&dir)
        .args(["render", "--snapshot", "tasks.json", "--focus", "13"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("- KAN-10 Checkout epic"))
        .stdout(predicate::str::contains("    * KAN-13 Card validation [open]"))
        .stdout(predicate::str::contains("#/projects/4/tasks/KAN-12"));
}

#[test]
fn test_render_json_with_status_filter() {
    let dir = workspace();

    let output = kanflow(&dir)
        .args([
            "render", "-s", "tasks.json", "-f", "11", "--status", "open", "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["root"]["id"], 10);
    assert_eq!(value["hidden"], serde_json::json!([10, 11]));
    assert_eq!(
        value["availableStatuses"],
        serde_json::json!(["done", "in_progress", "open"])
    );
}

#[test]
fn test_statuses_command() {
    let dir = workspace();

    kanflow(&dir)
        .args(["statuses", "--snapshot", "tasks.json"])
        .assert()
        .success()
        .stdout("done\nin_progress\nopen\n");
}

#[test]
fn test_config_file_changes_layout() {
    let dir = workspace();
    fs::write(
        dir.path().join("kanflow.toml"),
        "[layout]\norigin_x = 0.0\norigin_y = 0.0\n",
    )
    .unwrap();

    kanflow(&dir)
        .args(["render", "-s", "tasks.json", "-f", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* KAN-10 Checkout epic [in_progress] @ (0, 0)"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = workspace();

    kanflow(&dir)
        .args(["--config", "nope.toml", "statuses", "-s", "tasks.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_missing_snapshot_fails() {
    let dir = workspace();

    kanflow(&dir)
        .args(["render", "-s", "absent.json", "-f", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read snapshot"));
}
