//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::filesystem::FileSystem;

/// Replays recorded filesystem operations from a cassette.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn replay_result<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
    ) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
        let output = next_output(&self.replayer, "fs", method);
        if let Some(err) = output.get("err") {
            let msg = err.as_str().unwrap_or("unknown error").to_string();
            return Err(msg.into());
        }
        let value = output.get("ok").cloned().unwrap_or(output);
        serde_json::from_value(value)
            .map_err(|e| format!("fs::{method}: failed to deserialize: {e}").into())
    }

    fn replay_bool(&self, method: &str) -> bool {
        next_output(&self.replayer, "fs", method).as_bool().unwrap_or(false)
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.replay_result("read_to_string")
    }

    fn read_head(
        &self,
        _path: &Path,
        _len: usize,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        self.replay_result("read_head")
    }

    fn exists(&self, _path: &Path) -> bool {
        self.replay_bool("exists")
    }

    fn is_dir(&self, _path: &Path) -> bool {
        self.replay_bool("is_dir")
    }

    fn try_exists(&self, _path: &Path) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.replay_result("try_exists")
    }

    fn list_dir(
        &self,
        _path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.replay_result("list_dir")
    }
}
