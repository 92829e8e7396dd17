//! Live command executor using `std::process::Command`.

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::ports::shell::{Invocation, ShellError, ShellExecutor, ShellOutput};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Live executor that spawns native commands directly, without a shell.
///
/// Children that outlive `timeout` are killed and reported as
/// [`ShellError::TimedOut`]. The same deadline bounds reading their output,
/// so a grandchild holding a pipe open cannot extend the wait.
pub struct LiveShellExecutor {
    timeout: Duration,
}

impl LiveShellExecutor {
    /// Creates an executor that allows each command `timeout` to finish.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ShellExecutor for LiveShellExecutor {
    fn run(&self, invocation: &Invocation) -> Result<ShellOutput, ShellError> {
        let program = invocation.program.clone();
        let failed = |err: io::Error| ShellError::Failed {
            program: program.clone(),
            message: err.to_string(),
        };

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                if err.kind() == io::ErrorKind::NotFound {
                    ShellError::NotFound { program: program.clone() }
                } else {
                    failed(err)
                }
            })?;

        // Drain pipes concurrently so a child filling its pipe buffer
        // cannot stall the wait loop.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let deadline = Instant::now() + self.timeout;
        let timed_out = || {
            debug!(program = %program, "command timed out");
            ShellError::TimedOut {
                program: program.clone(),
                millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        };
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(timed_out());
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(err) => return Err(failed(err)),
            }
        };

        // Reader threads still blocked at the deadline are left detached.
        let stdout = collect(stdout, deadline).ok_or_else(timed_out)?;
        let stderr = collect(stderr, deadline).ok_or_else(timed_out)?;

        Ok(ShellOutput { exit_code: status.code().unwrap_or(-1), stdout, stderr })
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });
    rx
}

/// Waits until `deadline` for a pipe's contents. `None` means the pipe was
/// still open when time ran out.
fn collect(pipe: Option<Receiver<Vec<u8>>>, deadline: Instant) -> Option<String> {
    let Some(rx) = pipe else {
        return Some(String::new());
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}
