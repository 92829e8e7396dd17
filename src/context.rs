//! Service context bundling the port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::adapters::live::{LiveFileSystem, LiveShellExecutor};
use crate::adapters::recording::{RecordingFileSystem, RecordingShellExecutor};
use crate::adapters::replaying::{ReplayingFileSystem, ReplayingShellExecutor};
use crate::cassette::{Cassette, CassetteRecorder, CassetteReplayer};
use crate::ports::filesystem::FileSystem;
use crate::ports::shell::ShellExecutor;

/// Bundles the port trait objects every reader works through.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Filesystem for metadata reads.
    pub fs: Box<dyn FileSystem>,
    /// Executor for native VCS clients.
    pub shell: Box<dyn ShellExecutor>,
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context; native commands are killed after `timeout`.
    #[must_use]
    pub fn live(timeout: Duration) -> Self {
        Self::from_ports(Box::new(LiveFileSystem), Box::new(LiveShellExecutor::new(timeout)))
    }

    /// Creates a context from arbitrary port implementations.
    #[must_use]
    pub fn from_ports(fs: Box<dyn FileSystem>, shell: Box<dyn ShellExecutor>) -> Self {
        Self { fs, shell, recorder: None }
    }

    /// Creates a recording context backed by live adapters.
    ///
    /// Every interaction is captured and written to `path` by
    /// [`ServiceContext::finish`].
    #[must_use]
    pub fn recording(path: &Path, timeout: Duration) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "vcprompt-session")));
        Self {
            fs: Box::new(RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&recorder))),
            shell: Box::new(RecordingShellExecutor::new(
                Box::new(LiveShellExecutor::new(timeout)),
                Arc::clone(&recorder),
            )),
            recorder: Some(recorder),
        }
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// Each port gets its own replayer over the same cassette so that
    /// per-port queues are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self::from_cassette(&cassette))
    }

    /// Creates a replaying context from an already loaded cassette.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        Self::from_ports(
            Box::new(ReplayingFileSystem::new(CassetteReplayer::new(cassette))),
            Box::new(ReplayingShellExecutor::new(CassetteReplayer::new(cassette))),
        )
    }

    /// Consumes the context, writing the cassette if this context records.
    ///
    /// Returns the cassette path when one was written.
    ///
    /// # Errors
    ///
    /// Returns an error string if the cassette cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, String> {
        let Self { fs, shell, recorder } = self;
        // Adapters hold clones of the recorder; release them first.
        drop(fs);
        drop(shell);
        let Some(recorder) = recorder else {
            return Ok(None);
        };
        let recorder = Arc::try_unwrap(recorder)
            .map_err(|_| "cassette recorder is still shared".to_string())?
            .into_inner()
            .map_err(|_| "cassette recorder lock poisoned".to_string())?;
        recorder.finish().map(Some).map_err(|e| format!("Failed to write cassette: {e}"))
    }
}
