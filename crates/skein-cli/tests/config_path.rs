//! Integration tests for `skein config`.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_config_path_honors_skein_home() {
    let temp_dir = TempDir::new().unwrap();

    cargo_bin_cmd!("skein")
        .env("SKEIN_HOME", temp_dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(temp_dir.path().to_str().unwrap()))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file_once() {
    let temp_dir = TempDir::new().unwrap();

    cargo_bin_cmd!("skein")
        .env("SKEIN_HOME", temp_dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(temp_dir.path().join("config.toml").exists());

    // A second init must refuse to overwrite.
    cargo_bin_cmd!("skein")
        .env("SKEIN_HOME", temp_dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_set_view_mode_persists() {
    let temp_dir = TempDir::new().unwrap();

    cargo_bin_cmd!("skein")
        .env("SKEIN_HOME", temp_dir.path())
        .args(["config", "set-view-mode", "linear"])
        .assert()
        .success();

    let contents = std::fs::read_to_string(temp_dir.path().join("config.toml")).unwrap();
    assert!(contents.contains("default_view_mode = \"linear\""));

    cargo_bin_cmd!("skein")
        .env("SKEIN_HOME", temp_dir.path())
        .args(["config", "set-view-mode", "modal-cards"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown view mode"));
}
