use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be valid utf-8")
}

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("azfw-convert"))
}

#[test]
fn convert_prints_template_to_stdout() {
    let assert = bin()
        .arg("convert")
        .arg(fixture("fixtures/rules.tsv"))
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: skipped 1 line(s)"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8 stdout");
    assert!(stdout.starts_with("{\n    \"$schema\""));

    let value: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    let resources = value["resources"].as_array().expect("resources array");
    assert_eq!(resources.len(), 4);
    assert_eq!(
        resources[1]["name"],
        "[concat(parameters('firewallPoliciesName'), '/Web_Tier')]"
    );
    assert_eq!(resources[1]["properties"]["ruleCollections"][0]["priority"], 1005);
    assert_eq!(resources[3]["properties"]["priority"], 300);
}

#[test]
fn convert_writes_output_file() {
    let dir = tempdir().expect("tempdir");
    let output_path = dir.path().join("policy.json");

    bin()
        .arg("convert")
        .arg(fixture("fixtures/rules.tsv"))
        .arg("--output")
        .arg(path_as_str(&output_path))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&output_path).expect("output file");
    let value: serde_json::Value = serde_json::from_str(&written).expect("output is JSON");
    assert_eq!(value["contentVersion"], "1.0.0.0");
}

#[test]
fn convert_reads_stdin() {
    let input = fs::read_to_string(fixture("fixtures/rules.tsv")).expect("fixture");

    bin()
        .arg("convert")
        .arg("-")
        .arg("--compact")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\"$schema\":"));
}

#[test]
fn convert_summary_goes_to_stderr() {
    bin()
        .arg("convert")
        .arg(fixture("fixtures/rules.tsv"))
        .arg("--summary")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "convert_summary sections=3 allow_rules=3 deny_rules=2 collections=4 skipped=1",
        ));
}

#[test]
fn convert_fails_on_invalid_rule_number() {
    bin()
        .arg("convert")
        .arg(fixture("fixtures/bad_rule_number.tsv"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid input format"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn convert_strict_rejects_skipped_lines() {
    bin()
        .arg("convert")
        .arg(fixture("fixtures/rules.tsv"))
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 4: expected at least 17"));
}

#[test]
fn convert_strict_can_come_from_config() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("azfw.toml");
    fs::write(&config, "[convert]\nstrict = true\n").expect("config write");

    bin()
        .arg("convert")
        .arg(fixture("fixtures/with_header.tsv"))
        .arg("--config")
        .arg(path_as_str(&config))
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1:"));
}

#[test]
fn convert_indent_flag_overrides_config_layout() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("azfw.toml");
    fs::write(&config, "[output]\ncompact = true\n").expect("config write");

    bin()
        .arg("convert")
        .arg(fixture("fixtures/rules.tsv"))
        .arg("--config")
        .arg(path_as_str(&config))
        .arg("--indent")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\n  \"$schema\""));
}

#[test]
fn convert_reports_broken_config() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("azfw.toml");
    fs::write(&config, "[convert\nstrict = yes").expect("config write");

    bin()
        .arg("convert")
        .arg(fixture("fixtures/rules.tsv"))
        .arg("--config")
        .arg(path_as_str(&config))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse settings file"));
}

#[test]
fn convert_refuses_to_overwrite_input() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("rules.tsv");
    fs::copy(fixture("fixtures/rules.tsv"), &input).expect("copy fixture");

    bin()
        .arg("convert")
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite rule export"));
}

#[test]
fn convert_reports_missing_input() {
    bin()
        .arg("convert")
        .arg(fixture("fixtures/does-not-exist.tsv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
