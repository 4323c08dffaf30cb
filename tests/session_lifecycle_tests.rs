// End-to-end start/stop lifecycle through the binary. These tests stay
// offline: the tracker is only contacted when a worklog is submitted, and
// the one test that gets there points at a closed local port.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(home: &TempDir, extra: &str) {
    let config_dir = home.path().join(".jita");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!(
            concat!(
                "username = \"jdoe\"\n",
                "password = \"hunter2\"\n",
                "base_url = \"http://127.0.0.1:9\"\n",
                "project = \"PROJ\"\n",
                "{}"
            ),
            extra
        ),
    )
    .unwrap();
}

fn setup_home() -> TempDir {
    let home = TempDir::new().unwrap();
    write_config(&home, "");
    home
}

fn jita(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("jita").unwrap();
    cmd.env("HOME", home.path());
    cmd
}

fn marker_path(home: &TempDir) -> PathBuf {
    home.path().join(".jita").join("active-issue")
}

#[test]
fn test_start_creates_marker() {
    let home = setup_home();

    jita(&home)
        .args(["start", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Issue PROJ-42 started"));

    let marker = fs::read_to_string(marker_path(&home)).unwrap();
    assert!(marker.contains("PROJ-42"));
    assert!(marker.contains("started_ts"));
}

#[test]
fn test_second_start_is_rejected() {
    let home = setup_home();

    jita(&home).args(["start", "PROJ-1"]).assert().success();
    jita(&home)
        .args(["start", "PROJ-2"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("PROJ-1 is already started"));
}

#[test]
fn test_stop_without_start() {
    let home = setup_home();

    jita(&home)
        .arg("stop")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no issue has been started"));
}

#[test]
fn test_stop_abort_keeps_marker() {
    let home = setup_home();
    jita(&home).args(["start", "7"]).assert().success();
    let original = fs::read_to_string(marker_path(&home)).unwrap();

    // Unrecognized answers re-prompt until the abort lands.
    let assert = jita(&home)
        .arg("stop")
        .write_stdin("x\nmaybe\na\n")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.matches("Do you want to log this time?").count(), 3);
    assert!(stdout.contains("You have worked"));

    assert_eq!(fs::read_to_string(marker_path(&home)).unwrap(), original);

    // The session is still active afterwards.
    jita(&home)
        .args(["start", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already started"));
}

#[test]
fn test_stop_terminate_alias() {
    let home = setup_home();
    jita(&home).args(["start", "7"]).assert().success();

    jita(&home)
        .arg("terminate")
        .write_stdin("a\n")
        .assert()
        .success();
}

#[test]
fn test_stop_failed_submission_keeps_marker() {
    let home = setup_home();
    jita(&home).args(["start", "9"]).assert().success();

    // Declining the description still submits a worklog; the closed port
    // makes that fail, and the marker must survive.
    jita(&home)
        .arg("stop")
        .write_stdin("n\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("tracker"));

    assert!(marker_path(&home).exists());
}

#[test]
fn test_stop_prompt_eof_fails_cleanly() {
    let home = setup_home();
    jita(&home).args(["start", "10"]).assert().success();

    jita(&home)
        .arg("stop")
        .write_stdin("")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));

    assert!(marker_path(&home).exists());
}

#[cfg(unix)]
mod hooks {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_failing_pre_start_hook_blocks_start() {
        let home = TempDir::new().unwrap();
        let hook = write_script(home.path(), "failing", "exit 1");
        write_config(
            &home,
            &format!("[hooks]\npre_start = [\"{}\"]\n", hook.display()),
        );

        jita(&home)
            .args(["start", "1"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("hook"));

        assert!(!marker_path(&home).exists());
    }

    #[test]
    fn test_post_start_hook_receives_issue_key() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("hook-out");
        let hook = write_script(
            home.path(),
            "record",
            &format!("printf '%s' \"$1\" > {}", out.display()),
        );
        write_config(
            &home,
            &format!("[hooks]\npost_start = [\"{}\"]\n", hook.display()),
        );

        jita(&home).args(["start", "2"]).assert().success();

        assert_eq!(fs::read_to_string(&out).unwrap(), "PROJ-2");
        assert!(marker_path(&home).exists());
    }
}
