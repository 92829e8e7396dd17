//! Upward directory walk: the first reader to claim a directory wins.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use crate::context::ServiceContext;
use crate::error::PromptError;
use crate::format::Fields;
use crate::options::Options;
use crate::readers::{DetectionQuery, READERS};
use crate::repository::RepositoryInfo;

/// Makes `path` absolute against the current directory and removes `.`
/// and `..` components without touching the filesystem.
///
/// # Errors
///
/// Returns [`PromptError::CurrentDir`] if `path` is relative and the
/// current directory cannot be determined.
pub fn normalize(path: &Path) -> Result<PathBuf, PromptError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_err(PromptError::CurrentDir)?.join(path)
    };
    Ok(lexical(&absolute))
}

fn lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Walks from `start` (already normalized) towards the filesystem root,
/// at most `options.max_depth` levels above it, and extracts `fields`
/// from the first repository found.
#[must_use]
pub fn detect(
    ctx: &ServiceContext,
    start: &Path,
    fields: Fields,
    options: &Options,
) -> Option<RepositoryInfo> {
    let mut current = start.to_path_buf();
    let mut depth = 0usize;

    loop {
        trace!(dir = %current.display(), depth, "probing");
        if let Some(reader) = READERS.iter().find(|reader| reader.detect(ctx, &current)) {
            debug!(system = %reader.system(), root = %current.display(), "repository found");
            let query = DetectionQuery { root: &current, target: start, fields, options };
            return Some(reader.extract(ctx, &query));
        }

        if options.max_depth.is_some_and(|max| depth >= max) || !current.pop() {
            debug!(start = %start.display(), "no repository found");
            return None;
        }
        depth += 1;
    }
}
