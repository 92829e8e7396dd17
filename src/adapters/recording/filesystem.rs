//! Recording adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{record_interaction, record_result};
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::FileSystem;

type FsResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Records filesystem interactions while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingFileSystem {
    /// Creates a new recording filesystem wrapping the given implementation.
    pub fn new(inner: Box<dyn FileSystem>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }

    fn record<T: Serialize>(&self, method: &str, path: &Path, result: &FsResult<T>) {
        let input = PathInput { path: &path.display().to_string() };
        let result = result.as_ref().map_err(ToString::to_string);
        record_result(&self.recorder, "fs", method, &input, &result);
    }

    fn record_flag(&self, method: &str, path: &Path, value: bool) {
        let input = PathInput { path: &path.display().to_string() };
        record_interaction(&self.recorder, "fs", method, &input, &value);
    }
}

#[derive(Serialize)]
struct PathInput<'a> {
    path: &'a str,
}

impl FileSystem for RecordingFileSystem {
    fn read_to_string(&self, path: &Path) -> FsResult<String> {
        let result = self.inner.read_to_string(path);
        self.record("read_to_string", path, &result);
        result
    }

    fn read_head(&self, path: &Path, len: usize) -> FsResult<Vec<u8>> {
        let result = self.inner.read_head(path, len);
        self.record("read_head", path, &result);
        result
    }

    fn exists(&self, path: &Path) -> bool {
        let result = self.inner.exists(path);
        self.record_flag("exists", path, result);
        result
    }

    fn is_dir(&self, path: &Path) -> bool {
        let result = self.inner.is_dir(path);
        self.record_flag("is_dir", path, result);
        result
    }

    fn try_exists(&self, path: &Path) -> FsResult<bool> {
        let result = self.inner.try_exists(path);
        self.record("try_exists", path, &result);
        result
    }

    fn list_dir(&self, path: &Path) -> FsResult<Vec<String>> {
        let result = self.inner.list_dir(path);
        self.record("list_dir", path, &result);
        result
    }
}
