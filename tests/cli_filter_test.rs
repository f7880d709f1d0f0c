//! suggest / filter コマンドの統合テスト

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn write_data(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("people.json");
    std::fs::write(
        &path,
        r#"[
            {"name": "Alice", "city": "Paris", "children": [
                {"name": "Bob", "city": "Lyon"},
                {"name": "Carol", "city": "Nice"}
            ]},
            {"name": "Dave", "city": "Lille"}
        ]"#,
    )
    .unwrap();
    path
}

fn gridsift() -> Command {
    let mut cmd = Command::cargo_bin("gridsift").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_suggest_json_groups_by_field() {
    let dir = TempDir::new().unwrap();
    let data = write_data(&dir);

    let json = stdout_json(gridsift().args(["suggest", "li", "--json", "--data"]).arg(&data));

    let groups = json.as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["field"], "name");
    assert_eq!(groups[0]["entries"][0]["value"], "Alice");
    assert_eq!(groups[1]["field"], "city");
    assert_eq!(groups[1]["entries"][0]["value"], "Lille");
}

#[test]
fn test_suggest_table_output() {
    let dir = TempDir::new().unwrap();
    let data = write_data(&dir);

    gridsift()
        .args(["suggest", "car", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Carol"))
        .stdout(predicate::str::contains("suggestion(s)"));
}

#[test]
fn test_filter_json_expands_matching_parent() {
    let dir = TempDir::new().unwrap();
    let data = write_data(&dir);

    let json = stdout_json(
        gridsift()
            .args(["filter", "-f", "name=bob", "--json", "--data"])
            .arg(&data),
    );

    let rows = json.as_array().unwrap();
    let paths: Vec<&str> = rows.iter().map(|r| r["path"].as_str().unwrap()).collect();
    assert_eq!(paths, vec!["0", "0.0"]);
    assert_eq!(rows[0]["expanded"], true);
    assert_eq!(rows[1]["depth"], 1);
    assert_eq!(
        rows[1]["data"]["name"],
        r#"<span class="search-highlight">Bob</span>"#
    );
}

#[test]
fn test_filter_without_filters_shows_roots() {
    let dir = TempDir::new().unwrap();
    let data = write_data(&dir);

    let json = stdout_json(gridsift().args(["filter", "--json", "--data"]).arg(&data));
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["data"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alice", "Dave"]);
}

#[test]
fn test_filter_with_operator_syntax() {
    let dir = TempDir::new().unwrap();
    let data = write_data(&dir);

    let json = stdout_json(
        gridsift()
            .args([
                "filter",
                "--syntax",
                "operators",
                "-f",
                "name=starts with da",
                "--json",
                "--data",
            ])
            .arg(&data),
    );

    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0]["data"]["name"],
        r#"<span class="search-highlight">Da</span>ve"#
    );
}

#[test]
fn test_filter_uses_marker_from_config() {
    let dir = TempDir::new().unwrap();
    let data = write_data(&dir);
    let config = dir.path().join("gridsift.toml");
    std::fs::write(
        &config,
        "[search]\nhighlight = \"filters\"\n\n[search.marker]\nopen = \"<mark>\"\nclose = \"</mark>\"\n",
    )
    .unwrap();

    let json = stdout_json(
        gridsift()
            .args(["filter", "-f", "city=nice", "--term", "ali", "--json", "--config"])
            .arg(&config)
            .arg("--data")
            .arg(&data),
    );

    let rows = json.as_array().unwrap();
    // filters モードでは検索語はハイライトしない
    assert_eq!(rows[0]["data"]["name"], "Alice");
    assert_eq!(rows[1]["data"]["city"], "<mark>Nice</mark>");
}

#[test]
fn test_filter_table_output() {
    let dir = TempDir::new().unwrap();
    let data = write_data(&dir);

    gridsift()
        .args(["filter", "-f", "city=lille", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dave"))
        .stdout(predicate::str::contains("row(s)"));
}

#[test]
fn test_filter_table_highlights_text_cells_only() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("stock.json");
    std::fs::write(&data, r#"[{"name": "a12", "qty": 12}]"#).unwrap();

    let output = gridsift()
        .args(["filter", "-f", "name=12", "--data"])
        .arg(&data)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    // 黄色背景（43）は name セルの1回だけ。数値の qty は色付けしない
    assert_eq!(stdout.matches("43m").count(), 1, "{stdout}");
    assert!(stdout.contains("12"));
}

#[test]
fn test_missing_source_fails() {
    gridsift()
        .args(["suggest", "bob"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--data"));
}

#[test]
fn test_missing_data_file_fails() {
    let dir = TempDir::new().unwrap();

    gridsift()
        .args(["filter", "--data"])
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_invalid_filter_argument_fails() {
    let dir = TempDir::new().unwrap();
    let data = write_data(&dir);

    gridsift()
        .args(["filter", "-f", "name", "--data"])
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("FIELD=VALUE"));
}

#[test]
fn test_invalid_column_argument_fails() {
    let dir = TempDir::new().unwrap();
    let data = write_data(&dir);

    gridsift()
        .args(["suggest", "bob", "--column", ":Name", "--data"])
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument: column ':Name'"));
}

#[test]
fn test_remote_filter_replaces_rows() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/items")
        .match_query(mockito::Matcher::UrlEncoded(
            "filters".into(),
            r#"[{"field":"name","values":["bob"]}]"#.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results": [{"name": "Bob", "city": "Lyon"}]}"#)
        .create();

    let json = stdout_json(gridsift().args([
        "filter",
        "--remote",
        &format!("{}/items", server.url()),
        "-f",
        "name=bob",
        "--json",
    ]));

    mock.assert();
    assert_eq!(json[0]["data"]["city"], "Lyon");
}

#[test]
fn test_remote_suggest_requires_minimum_length() {
    let server = mockito::Server::new();

    gridsift()
        .args([
            "suggest",
            "bo",
            "--column",
            "name",
            "--remote",
            &format!("{}/items", server.url()),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 3 characters"));
}
