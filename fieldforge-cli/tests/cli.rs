use std::fs;

use assert_cmd::cargo::{self};
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::{Value, json};

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("fieldforge");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("fieldforge"));
}

#[test]
fn inspect_lists_typed_rows() {
    let mut cmd = cargo::cargo_bin_cmd!("fieldforge");
    cmd.args(["inspect", r#"{"a": 1, "b": true, "c": "x"}"#])
        .assert()
        .success()
        .stdout(contains("a\tnumber\t1"))
        .stdout(contains("b\tboolean\ttrue"))
        .stdout(contains("c\tstring\tx"));
}

#[test]
fn to_text_prints_field_set() {
    let mut cmd = cargo::cargo_bin_cmd!("fieldforge");
    cmd.args(["to-text", "--no-pretty", r#"{"a": 1}"#])
        .assert()
        .success()
        .stdout(contains(r#"{"a":1}"#));
}

#[test]
fn check_rejects_arrays() {
    let mut cmd = cargo::cargo_bin_cmd!("fieldforge");
    cmd.args(["check", "[1,2,3]"])
        .assert()
        .failure()
        .stderr(contains("must be an object"));
}

#[test]
fn check_accepts_empty_text() {
    let mut cmd = cargo::cargo_bin_cmd!("fieldforge");
    cmd.args(["check", "   "])
        .assert()
        .success()
        .stdout(contains("ok: 0 field(s)"));
}

#[test]
fn edit_writes_settings_file_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{"endpoint": "https://api", "customFields": {"a": 1, "b": true}}"#,
    )
    .unwrap();

    let mut cmd = cargo::cargo_bin_cmd!("fieldforge");
    cmd.arg("edit")
        .arg("--settings")
        .arg(&path)
        .args(["--set", "c:number=2.5", "--remove", "b"])
        .assert()
        .success();

    let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        saved,
        json!({"endpoint": "https://api", "customFields": {"a": 1, "c": 2.5}})
    );
}

#[test]
fn edit_with_invalid_text_keeps_previous_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"customFields": {"a": 1, "b": true}}"#).unwrap();

    let mut cmd = cargo::cargo_bin_cmd!("fieldforge");
    cmd.arg("edit")
        .arg("--settings")
        .arg(&path)
        .args(["--text", r#"{"a": }"#, "-o", "-"])
        .assert()
        .success()
        .stderr(contains("invalid JSON"))
        .stdout(contains("\"b\": true"));
}

#[test]
fn edit_removing_everything_drops_the_entry() {
    let mut cmd = cargo::cargo_bin_cmd!("fieldforge");
    cmd.args([
        "edit",
        "--settings",
        r#"{"model": "m", "customFields": {"a": 1}}"#,
        "--remove",
        "a",
        "--no-pretty",
    ])
    .assert()
    .success()
    .stdout(contains(r#"{"model":"m"}"#))
    .stdout(contains("customFields").not());
}

#[test]
fn check_accepts_inline_text_longer_than_a_file_name() {
    let body = (0..40)
        .map(|idx| format!("\"field_{idx:02}\": {idx}"))
        .collect::<Vec<_>>()
        .join(", ");
    let text = format!("{{{body}}}");
    assert!(text.len() > 255);

    let mut cmd = cargo::cargo_bin_cmd!("fieldforge");
    cmd.args(["check", text.as_str()])
        .assert()
        .success()
        .stdout(contains("ok: 40 field(s)"));
}

#[test]
fn edit_reports_rejected_text_even_when_rows_are_edited() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"customFields": {"a": 1, "b": true}}"#).unwrap();

    let mut cmd = cargo::cargo_bin_cmd!("fieldforge");
    cmd.arg("edit")
        .arg("--settings")
        .arg(&path)
        .args(["--text", r#"{"a": 5, "c": "#, "--set", "d=x", "-o", "-"])
        .assert()
        .success()
        .stderr(contains("invalid JSON").count(1))
        .stdout(contains("\"a\": 1"))
        .stdout(contains("\"d\": \"x\""));
}
