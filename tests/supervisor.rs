#![cfg(target_family = "unix")]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::thread::sleep;
use std::time::Duration;

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use predicates::prelude::*;

/// Writes a config running both services as shell scripts from `dir`.
fn write_config(dir: &Path, delay: &str, enrichment: &str, api: &str) -> PathBuf {
    let file_path = dir.join("backend-supervisor.yaml");
    let mut file = File::create(&file_path).unwrap();
    write!(
        file,
        r#"
root_dir: {root}
api_start_delay: {delay}
services_log_dir: {root}/logs
enrichment:
  working_dir: .
  command: ["sh", "-c", "{enrichment}"]
api:
  working_dir: .
  command: ["sh", "-c", "{api}"]
"#,
        root = dir.display(),
    )
    .unwrap();
    file_path
}

fn supervisor(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("backend-supervisor").unwrap();
    cmd.arg("--config").arg(config).timeout(Duration::from_secs(30));
    cmd
}

#[test]
fn enrichment_failure_before_delay_skips_api() {
    let dir = assert_fs::TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "1s",
        "echo enrichment starting; sleep 0.2; exit 3",
        "echo api starting",
    );

    supervisor(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[enrichment] enrichment starting"))
        .stdout(predicate::str::contains("[api]").not());
}

#[test]
fn api_exit_code_is_propagated() {
    let dir = assert_fs::TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "100ms",
        "exec sleep 30",
        "echo api ready; exit 2",
    );

    supervisor(&config)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[api] api ready"));
}

#[test]
fn stderr_is_relayed_tagged() {
    let dir = assert_fs::TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "100ms",
        "echo model warning >&2; exec sleep 30",
        "sleep 0.5; echo api failed >&2",
    );

    supervisor(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("[enrichment] model warning"))
        .stderr(predicate::str::contains("[api] api failed"));
}

#[test]
fn missing_binary_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file_path = dir.path().join("backend-supervisor.yaml");
    let mut file = File::create(&file_path).unwrap();
    write!(
        file,
        r#"
root_dir: {root}
services_log_dir: {root}/logs
enrichment:
  working_dir: .
  command: ["/definitely/not/a/binary"]
"#,
        root = dir.path().display(),
    )
    .unwrap();

    supervisor(&file_path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[api]").not());
}

#[test]
fn interrupt_stops_with_success() {
    let dir = assert_fs::TempDir::new().unwrap();
    let config = write_config(dir.path(), "100ms", "exec sleep 30", "exec sleep 3");

    let mut child = std::process::Command::new(cargo_bin("backend-supervisor"))
        .arg("--config")
        .arg(&config)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // let both services start
    sleep(Duration::from_secs(1));
    kill(Pid::from_raw(child.id() as i32), Signal::SIGINT).unwrap();

    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(0));
}
