//! End-to-end tests for the `storytree` binary.

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const LOGIN: &str = include_str!("data/login.yml");

fn workspace() -> Result<tempfile::TempDir> {
    let dir = tempdir()?;
    fs::write(dir.path().join("stories.yml"), LOGIN)?;
    Ok(dir)
}

fn storytree() -> Result<Command> {
    Command::cargo_bin("storytree").context("locate storytree binary")
}

#[test]
fn prints_tree_by_default() -> Result<()> {
    let dir = workspace()?;
    storytree()?
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("+ Login\n"))
        .stdout(predicate::str::contains("- [PENDING] Then they see the dashboard"));
    Ok(())
}

#[test]
fn count_prints_leaf_total() -> Result<()> {
    let dir = workspace()?;
    storytree()?
        .args(["-C"])
        .arg(dir.path())
        .arg("count")
        .assert()
        .success()
        .stdout("8\n");
    Ok(())
}

#[test]
fn scenario_command_renders_one_scenario_as_json() -> Result<()> {
    let dir = workspace()?;
    let output = storytree()?
        .arg("-C")
        .arg(dir.path())
        .args(["scenario", "Roles", "--format", "json"])
        .output()?;
    ensure!(output.status.success(), "scenario command failed");
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    ensure!(value["label"] == "Scenario: Roles", "label: {}", value["label"]);
    ensure!(value["children"][1]["label"] == "Example: {name=guest}", "rows: {value}");
    Ok(())
}

#[test]
fn emit_writes_relative_to_directory() -> Result<()> {
    let dir = workspace()?;
    storytree()?
        .arg("-C")
        .arg(dir.path())
        .args(["tree", "--emit", "tree.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let written = fs::read_to_string(dir.path().join("tree.txt"))?;
    ensure!(written.starts_with("+ Login\n"), "unexpected output: {written}");
    Ok(())
}

#[test]
fn custom_fixture_path_is_honoured() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("other.yml"), "story:\n  name: Other\n")?;
    storytree()?
        .current_dir(dir.path())
        .args(["-f", "other.yml"])
        .assert()
        .success()
        .stdout("+ Other\n");
    Ok(())
}

#[test]
fn missing_fixture_fails() -> Result<()> {
    let dir = tempdir()?;
    storytree()?
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("fixture not found"));
    Ok(())
}

#[test]
fn unknown_scenario_fails() -> Result<()> {
    let dir = workspace()?;
    storytree()?
        .current_dir(dir.path())
        .args(["scenario", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nope"));
    Ok(())
}
