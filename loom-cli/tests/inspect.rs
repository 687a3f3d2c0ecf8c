use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const TWO_ROOTS: &str = r#"{"nodes": {
    "first": {"text": "It was raining.", "parentId": null},
    "second": {"text": "The train was late.", "parentId": null}
}}"#;

#[test]
fn inspect_prints_outline_and_summary() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("roots.flatmap");
    fs::write(&input, TWO_ROOTS).unwrap();

    cargo_bin_cmd!("loom")
        .current_dir(dir.path())
        .arg("inspect")
        .arg(input.as_os_str())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("⧉ Loom (3 nodes)\n└─ ∅ \n"))
        .stdout(predicate::str::contains("  ├─ ¶ It was raining.\n"))
        .stdout(predicate::str::contains("  └─ ¶ The train was late.\n"))
        .stdout(predicate::str::contains("format: flatmap\n"))
        .stdout(predicate::str::contains("nodes:  3\n"))
        .stdout(predicate::str::contains("depth:  2\n"))
        .stdout(predicate::str::contains("leaves: 2\n"));
}

#[test]
fn inspect_show_ids_extra() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("tree.json");
    fs::write(
        &input,
        r#"{"root": {"id": "r", "text": "root", "children": []}}"#,
    )
    .unwrap();

    cargo_bin_cmd!("loom")
        .current_dir(dir.path())
        .arg("inspect")
        .arg(input.as_os_str())
        .arg("--from")
        .arg("nested")
        .arg("--extra-show-ids")
        .assert()
        .success()
        .stdout(predicate::str::contains("└─ ¶ root [r]\n"));
}

#[test]
fn formats_lists_every_format() {
    cargo_bin_cmd!("loom")
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("flatmap"))
        .stdout(predicate::str::contains("graph"))
        .stdout(predicate::str::contains("nested"))
        .stdout(predicate::str::contains("treeviz"));
}
