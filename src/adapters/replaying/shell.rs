//! Replaying adapter for the `ShellExecutor` port.

use std::sync::Mutex;

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::shell::{Invocation, ShellError, ShellExecutor, ShellOutput};

/// Replays recorded command results from a cassette.
pub struct ReplayingShellExecutor {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingShellExecutor {
    /// Creates a new replaying executor from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ShellExecutor for ReplayingShellExecutor {
    fn run(&self, invocation: &Invocation) -> Result<ShellOutput, ShellError> {
        let output = next_output(&self.replayer, "shell", "run");
        let corrupt = |e: serde_json::Error| ShellError::Failed {
            program: invocation.program.clone(),
            message: format!("unreadable cassette entry: {e}"),
        };
        if let Some(err) = output.get("err") {
            return Err(serde_json::from_value(err.clone()).map_err(corrupt)?);
        }
        let value = output.get("ok").cloned().unwrap_or(output);
        serde_json::from_value(value).map_err(corrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(outputs: Vec<serde_json::Value>) -> CassetteReplayer {
        let interactions = outputs
            .into_iter()
            .zip(0..)
            .map(|(output, seq)| Interaction {
                seq,
                port: "shell".into(),
                method: "run".into(),
                input: json!({}),
                output,
            })
            .collect();
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            version: "0.1.0".into(),
            interactions,
        })
    }

    fn hg_status() -> Invocation {
        Invocation::new("hg", ["status"], std::path::Path::new("/repo"))
    }

    #[test]
    fn replays_successful_run() {
        let shell = ReplayingShellExecutor::new(make_replayer(vec![
            json!({"ok": {"exit_code": 0, "stdout": "? notes.txt\n", "stderr": ""}}),
        ]));
        let result = shell.run(&hg_status()).unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "? notes.txt\n");
    }

    #[test]
    fn replays_missing_tool() {
        let shell = ReplayingShellExecutor::new(make_replayer(vec![
            json!({"err": {"kind": "not_found", "program": "hg"}}),
        ]));
        let err = shell.run(&hg_status()).unwrap_err();
        assert_eq!(err, ShellError::NotFound { program: "hg".into() });
    }

    #[test]
    fn corrupt_entry_is_reported_as_failure() {
        let shell = ReplayingShellExecutor::new(make_replayer(vec![json!({"ok": "garbage"})]));
        let err = shell.run(&hg_status()).unwrap_err();
        assert!(matches!(err, ShellError::Failed { .. }));
    }
}
