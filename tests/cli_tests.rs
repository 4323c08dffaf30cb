use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_home() -> TempDir {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".jita");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        concat!(
            "username = \"jdoe\"\n",
            "password = \"hunter2\"\n",
            "base_url = \"http://127.0.0.1:9\"\n",
            "project = \"PROJ\"\n",
        ),
    )
    .unwrap();
    home
}

fn jita(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("jita").unwrap();
    cmd.env("HOME", home.path());
    cmd
}

#[test]
fn test_version_flag() {
    let home = setup_home();
    jita(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jita"));
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    let home = setup_home();
    jita(&home).arg("frobnicate").assert().failure();
}

#[test]
fn test_missing_config_file() {
    let home = TempDir::new().unwrap();
    jita(&home)
        .args(["list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("unable to read"));
}

#[test]
fn test_invalid_config_is_reported() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".jita");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "username = \"jdoe\"\n").unwrap();

    jita(&home)
        .args(["list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("password is empty"));
}

#[test]
fn test_config_path_override() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("custom.toml");
    fs::write(&config_path, "username = \"jdoe\"\n").unwrap();

    jita(&home)
        .args(["--config", config_path.to_str().unwrap(), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("password is empty"));
}

#[test]
fn test_non_numeric_comment_id() {
    let home = setup_home();
    jita(&home)
        .args(["comment", "delete", "PROJ-1", "abc"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid comment id 'abc'"));
}

#[test]
fn test_bare_key_without_project() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".jita");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        concat!(
            "username = \"jdoe\"\n",
            "password = \"hunter2\"\n",
            "base_url = \"http://127.0.0.1:9\"\n",
        ),
    )
    .unwrap();

    jita(&home)
        .args(["start", "42"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no project prefix"));
}

#[test]
fn test_unreachable_tracker_is_surfaced() {
    let home = setup_home();
    jita(&home)
        .args(["projects"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("tracker"));
}
