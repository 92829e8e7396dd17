//! Command executor port for running native VCS clients.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A single native tool invocation.
///
/// Arguments are passed as a vector and never interpreted by a shell, so
/// paths with spaces or metacharacters need no quoting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invocation {
    /// Program name, resolved through `PATH`.
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
    /// Working directory for the child process.
    pub cwd: PathBuf,
    /// Extra environment variables set for the child.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<(String, String)>,
}

impl Invocation {
    /// Creates an invocation of `program` with `args`, running in `cwd`.
    pub fn new<I, S>(program: &str, args: I, cwd: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_path_buf(),
            env: Vec::new(),
        }
    }

    /// Adds an environment variable for the child process.
    #[must_use]
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }
}

/// The output of a finished command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShellOutput {
    /// The exit code of the process (`-1` if killed by a signal).
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    #[serde(default)]
    pub stderr: String,
}

impl ShellOutput {
    /// Returns `true` if the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Reasons a command produced no output at all.
///
/// A non-zero exit is not an error at this level; it is reported through
/// [`ShellOutput::exit_code`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShellError {
    /// The program is not installed or not on `PATH`.
    #[error("{program}: command not found")]
    NotFound {
        /// Program that was looked up.
        program: String,
    },
    /// The program did not finish within the allowed time and was killed.
    #[error("{program}: timed out after {millis}ms")]
    TimedOut {
        /// Program that was killed.
        program: String,
        /// Timeout that elapsed, in milliseconds.
        millis: u64,
    },
    /// The program could not be spawned or waited on.
    #[error("{program}: {message}")]
    Failed {
        /// Program that failed.
        program: String,
        /// Description of the OS error.
        message: String,
    },
}

/// Executes native commands.
///
/// Abstracting execution allows deterministic replay by recording and
/// replaying command outputs during cassette playback.
pub trait ShellExecutor: Send + Sync {
    /// Runs the invocation and returns its captured output.
    ///
    /// # Errors
    ///
    /// Returns an error if the program is missing, cannot be spawned, or
    /// exceeds the executor's timeout.
    fn run(&self, invocation: &Invocation) -> Result<ShellOutput, ShellError>;
}
