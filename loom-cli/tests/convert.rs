use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const CHAIN: &str = r#"{"root": {"id": "a", "text": "A", "children": [
    {"id": "b", "text": "B", "children": [
        {"id": "c", "text": "C", "children": []}
    ]}
]}}"#;

#[test]
fn convert_nested_to_graph_detects_source_from_extension() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("chain.nested");
    fs::write(&input, CHAIN).unwrap();

    let mut cmd = cargo_bin_cmd!("loom");
    cmd.current_dir(dir.path())
        .arg("convert")
        .arg(input.as_os_str())
        .arg("--to")
        .arg("graph");

    let output = cmd.assert().success().get_output().stdout.clone();
    let graph: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(graph["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(graph["edges"].as_array().unwrap().len(), 2);
    assert_eq!(graph["name"], "graph_1");
    assert_eq!(graph["nodes"][0]["id"], "a");
}

#[test]
fn convert_is_the_default_command() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("chain.json");
    fs::write(&input, CHAIN).unwrap();

    // No subcommand, and the source format comes from sniffing the content.
    let mut cmd = cargo_bin_cmd!("loom");
    cmd.current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--to")
        .arg("treeviz");

    cmd.assert()
        .success()
        .stdout("⧉ Loom (3 nodes)\n└─ ¶ A\n  └─ ¶ B\n    └─ ¶ C\n");
}

#[test]
fn convert_chain_through_flatmap_and_back() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("chain.nested");
    let flat = dir.path().join("chain.flatmap");
    fs::write(&input, CHAIN).unwrap();

    cargo_bin_cmd!("loom")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--to")
        .arg("flatmap")
        .arg("-o")
        .arg(flat.as_os_str())
        .assert()
        .success()
        .stdout("");

    let output = cargo_bin_cmd!("loom")
        .current_dir(dir.path())
        .arg(flat.as_os_str())
        .arg("--to")
        .arg("nested")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let nested: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let root = &nested["root"];
    assert_eq!(root["text"], "A");
    assert_eq!(root["children"][0]["text"], "B");
    assert_eq!(root["children"][0]["children"][0]["text"], "C");
}

#[test]
fn convert_passes_extras_to_the_format() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("chain.nested");
    fs::write(&input, CHAIN).unwrap();

    cargo_bin_cmd!("loom")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--to")
        .arg("graph")
        .arg("--extra-name")
        .arg("lighthouse")
        .arg("--extra-pretty")
        .arg("false")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name":"lighthouse""#))
        .stdout(predicate::str::contains("\n  ").not());
}

#[test]
fn convert_rejects_unknown_extra() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("chain.nested");
    fs::write(&input, CHAIN).unwrap();

    cargo_bin_cmd!("loom")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--to")
        .arg("nested")
        .arg("--extra-colour")
        .arg("red")
        .assert()
        .failure()
        .stderr(predicate::str::contains("colour"));
}

#[test]
fn convert_unknown_target_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("chain.nested");
    fs::write(&input, CHAIN).unwrap();

    cargo_bin_cmd!("loom")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--to")
        .arg("yaml")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Format 'yaml' not found"));
}

#[test]
fn convert_malformed_input_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.graph");
    fs::write(
        &input,
        r#"{"nodes": [{"id": "r", "text": ""}], "edges": [{"from": "r", "to": "ghost"}]}"#,
    )
    .unwrap();

    cargo_bin_cmd!("loom")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--to")
        .arg("nested")
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Malformed input"))
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn convert_undetectable_input_asks_for_from() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "just some text").unwrap();

    cargo_bin_cmd!("loom")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--to")
        .arg("nested")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--from"));
}

#[test]
fn convert_missing_file_fails() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("loom")
        .current_dir(dir.path())
        .arg("convert")
        .arg("missing.nested")
        .arg("--to")
        .arg("graph")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error reading file 'missing.nested'"));
}
