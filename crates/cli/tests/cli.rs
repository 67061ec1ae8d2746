use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn wlpv() -> Command {
    let mut cmd = Command::cargo_bin("wlpv").expect("binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_exits_zero_in_every_spelling() {
    for flag in ["-h", "--help", "-help"] {
        wlpv()
            .arg(flag)
            .assert()
            .success()
            .stdout(predicate::str::contains("wlpv [options] [protocol name]"));
    }
}

#[test]
fn version_exits_zero_in_every_spelling() {
    for flag in ["-v", "--version", "-version"] {
        wlpv()
            .arg(flag)
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

#[test]
fn malformed_add_pattern_is_fatal() {
    wlpv()
        .args(["--no-system", "-add", "["])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid pattern"));
}

#[test]
fn no_system_without_additions_has_nothing_to_show() {
    wlpv()
        .arg("-no-system")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no protocols to display"));
}

#[test]
fn no_system_with_unmatched_additions_has_nothing_to_show() {
    let temp = tempdir().unwrap();
    let pattern = temp.path().join("*.xml");
    wlpv()
        .arg("--no-system")
        .arg("-a")
        .arg(pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no protocols to display"));
}

#[test]
fn every_source_failing_is_fatal() {
    let temp = tempdir().unwrap();
    let catalog = temp.path().join("catalog.toml");
    fs::write(
        &catalog,
        format!(
            r#"
[[source]]
namespace = "core"
mode = "tree"
path = "{}"
[source.origin]
kind = "filesystem"
"#,
            temp.path().join("does-not-exist").display()
        ),
    )
    .unwrap();

    wlpv()
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("fetch failed or returned no results"));
}

#[test]
fn empty_catalog_is_a_configuration_error() {
    let temp = tempdir().unwrap();
    let catalog = temp.path().join("catalog.toml");
    fs::write(&catalog, "").unwrap();

    wlpv()
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to load catalog"));
}

#[test]
fn missing_catalog_file_is_a_configuration_error() {
    let temp = tempdir().unwrap();
    wlpv()
        .arg("-catalog")
        .arg(temp.path().join("nope.toml"))
        .assert()
        .failure()
        .code(1);
}
