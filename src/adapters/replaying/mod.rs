//! Replaying adapters that serve recorded interactions.

pub mod filesystem;
pub mod shell;

use std::sync::Mutex;

use crate::cassette::replayer::CassetteReplayer;

pub use filesystem::ReplayingFileSystem;
pub use shell::ReplayingShellExecutor;

/// Pull the next recorded output for `port::method` from a shared replayer.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_output(port, method)
}
