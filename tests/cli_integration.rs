//! CLI integration tests for the reticular demo binary
//!
//! These run the real binary, covering one-shot dispatch, error reporting
//! and interactive mode over piped stdin.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command instance for the reticular binary, isolated from user settings
fn reticular_cmd(settings: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("reticular"));
    cmd.env("RETICULAR_CONFIG", settings.path().join("config.toml"))
        .env_remove("RETICULAR_LOG");
    cmd
}

fn settings_dir() -> TempDir {
    TempDir::new().unwrap()
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn test_version() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_groups_and_base_commands() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("base commands"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("greet"))
        .stdout(predicate::str::contains("system"))
        .stdout(predicate::str::contains("_helpers").not());
}

#[test]
fn test_group_help() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .args(["greet", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"))
        .stdout(predicate::str::contains("bye"))
        .stdout(predicate::str::contains("--shout"));
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn test_group_command() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .args(["greet", "hello", "--name", "Ann"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello, Ann!"));
}

#[test]
fn test_group_argument() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .args(["greet", "bye", "Ann", "--shout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GOODBYE, ANN!"));
}

#[test]
fn test_base_command() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .args(["echo", "a", "b", "--times", "2"])
        .assert()
        .success()
        .stdout("a b\na b\n");
}

#[test]
fn test_base_command_json() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .args(["echo", "x", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\":\"echo\""))
        .stdout(predicate::str::contains("\"words\":[\"x\"]"));
}

#[test]
fn test_status_is_indented() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  groups: greet, system"));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_unknown_command_in_group() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .args(["greet", "unknown"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid number of arguments"));
}

#[test]
fn test_unknown_base_command() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .arg("bogus")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid base command"));
}

#[test]
fn test_private_module_is_not_a_group() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .arg("_helpers")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid base command"));
}

#[test]
fn test_missing_required_argument() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .args(["greet", "hello"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--name"));
}

#[test]
fn test_handler_error_is_reported() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .args(["greet", "hello", "--name", " "])
        .assert()
        .success()
        .stdout(predicate::str::contains("ERROR: name must not be empty"));
}

#[test]
fn test_superuser_guard() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .args(["system", "reboot"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("super user privileges")
                .or(predicate::str::contains("Rebooting")),
        );
}

#[test]
fn test_malformed_settings_fail() {
    let dir = settings_dir();
    fs::write(dir.path().join("config.toml"), "prompt = [").unwrap();

    reticular_cmd(&dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// =============================================================================
// Interactive Mode
// =============================================================================

#[test]
fn test_interactive_runs_lines_until_eof() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .write_stdin("greet hello --name Ann\necho hi\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome!"))
        .stdout(predicate::str::contains("Hello, Ann!"))
        .stdout(predicate::str::contains("hi"));
}

#[test]
fn test_interactive_continues_after_usage_error() {
    let dir = settings_dir();
    reticular_cmd(&dir)
        .write_stdin("bogus\n\necho still here\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("invalid base command"))
        .stdout(predicate::str::contains("still here"));
}

#[cfg(unix)]
#[test]
fn test_interactive_interrupt_exits_with_failure() {
    use std::io::{BufRead, BufReader, Read};
    use std::process::{Command, Stdio};

    let dir = settings_dir();
    let mut child = Command::new(assert_cmd::cargo::cargo_bin!("reticular"))
        .env("RETICULAR_CONFIG", dir.path().join("config.toml"))
        .env_remove("RETICULAR_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    // Keep stdin open so the read blocks until the signal arrives.
    let _stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    let mut welcome = String::new();
    stdout.read_line(&mut welcome).unwrap();
    assert_eq!(welcome, "Welcome!\n");

    let mut prompt = [0u8; 3];
    stdout.read_exact(&mut prompt).unwrap();
    assert_eq!(&prompt, b">> ");

    let pid = libc::pid_t::try_from(child.id()).unwrap();
    assert_eq!(unsafe { libc::kill(pid, libc::SIGINT) }, 0);

    let status = child.wait().unwrap();
    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();

    assert_eq!(status.code(), Some(1));
    assert_eq!(rest, "\n");
}

#[test]
fn test_interactive_uses_settings() {
    let dir = settings_dir();
    fs::write(
        dir.path().join("config.toml"),
        "prompt = \"rt> \"\nmessage = \"Hello from settings\"\n",
    )
    .unwrap();

    reticular_cmd(&dir)
        .write_stdin("status\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello from settings"))
        .stdout(predicate::str::contains("rt> "));
}
