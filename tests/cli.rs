// tests/cli.rs

//! Command-line behaviour: output format and exit statuses.

mod common;

use assert_cmd::Command;
use common::{StoreBuilder, chain_store, loop_store};
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;

fn abbs_dep(db: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("abbs-dep"));
    cmd.env("RUST_LOG", "error");
    cmd.arg("--dbfile").arg(db);
    cmd
}

#[test]
fn test_chain_prints_levels_and_succeeds() {
    let (_dir, path) = chain_store();

    abbs_dep(&path)
        .arg("a")
        .assert()
        .code(0)
        .stdout("c\nb\na\n");
}

#[test]
fn test_loop_exits_with_two() {
    let (_dir, path) = loop_store();

    abbs_dep(&path)
        .arg("a")
        .assert()
        .code(2)
        .stdout("=== Dependency loops ===\na b\n");
}

#[test]
fn test_unknown_package_still_succeeds() {
    let (_dir, path) = chain_store();

    abbs_dep(&path).arg("x").assert().code(0).stdout("x\n");
}

#[test]
fn test_no_builddep_flag() {
    let (_dir, path) = StoreBuilder::new()
        .package("app", "1.0")
        .package("cmake", "3.27.7")
        .build_depends("app", "cmake")
        .finish();

    abbs_dep(&path).arg("app").assert().code(0).stdout("cmake\napp\n");
    abbs_dep(&path).args(["-n", "app"]).assert().code(0).stdout("app\n");
}

#[test]
fn test_verbose_edges_on_stderr() {
    let (_dir, path) = chain_store();

    abbs_dep(&path)
        .args(["-v", "a"])
        .assert()
        .code(0)
        .stdout("c\nb\na\n")
        .stderr(predicate::str::contains("0 (root) -> a").and(predicate::str::contains("2 b -> c")));
}

#[test]
fn test_with_versions() {
    let (_dir, path) = StoreBuilder::new()
        .package("a", "1.0")
        .package("b", "2.4")
        .depends("a", "b")
        .finish();

    abbs_dep(&path)
        .args(["--with-versions", "a"])
        .assert()
        .code(0)
        .stdout("b==2.4\na==1.0\n");
}

#[test]
fn test_json_output() {
    let (_dir, path) = loop_store();

    let output = abbs_dep(&path).args(["--json", "a"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));

    let report: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(report["levels"], serde_json::json!([]));
    assert_eq!(report["cycles"], serde_json::json!([["a", "b"]]));
    assert_eq!(report["packages"]["b"]["version"], "1.0");
}

#[test]
fn test_missing_database_fails() {
    let dir = tempfile::tempdir().unwrap();

    abbs_dep(&dir.path().join("missing.db"))
        .arg("a")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("missing.db"));
}

#[test]
fn test_usage_errors_exit_one() {
    let (_dir, path) = chain_store();

    // No packages
    abbs_dep(&path).assert().code(1);

    // No database
    Command::new(assert_cmd::cargo::cargo_bin!("abbs-dep"))
        .arg("a")
        .assert()
        .code(1);
}

#[test]
fn test_version_flag() {
    Command::new(assert_cmd::cargo::cargo_bin!("abbs-dep"))
        .arg("--version")
        .assert()
        .code(0)
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
