//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

/// Commit id of the fixture's `master` branch.
pub const MASTER: &str = "eae51cf2a4c1d0b7e9f8a6b5c4d3e2f1a0b9c8d7";

/// A git working tree laid out by hand: `master` at [`MASTER`], plus a
/// nested `foo/bar/baz` directory.
pub fn git_fixture() -> tempfile::TempDir {
    let repo = tempfile::tempdir().unwrap();
    let git = repo.path().join(".git");
    std::fs::create_dir_all(git.join("refs").join("heads")).unwrap();
    std::fs::write(git.join("HEAD"), "ref: refs/heads/master\n").unwrap();
    std::fs::write(git.join("refs").join("heads").join("master"), format!("{MASTER}\n")).unwrap();
    std::fs::create_dir_all(repo.path().join("foo").join("bar").join("baz")).unwrap();
    repo
}

/// Runs the `vcprompt` binary with a clean prompt environment.
pub fn run_vcprompt(args: &[&str], cwd: &Path) -> Output {
    let bin = env!("CARGO_BIN_EXE_vcprompt");
    Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env_remove("VCPROMPT_FORMAT")
        .env_remove("VCPROMPT_UNKNOWN")
        .env_remove("VCPROMPT_RECORD")
        .env_remove("VCPROMPT_REPLAY")
        .env_remove("VCPROMPT_LOG")
        .output()
        .expect("failed to run vcprompt binary")
}

/// Stdout of a run as text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}
