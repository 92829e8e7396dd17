//! Per-system metadata readers.
//!
//! Each reader answers two questions about a directory: does this system
//! own it (`detect`, purely structural), and what can be learned about it
//! (`extract`). Extraction never fails as a whole; a field that cannot be
//! read is left as `None` and rendered as the unknown placeholder.

mod bzr;
mod cvs;
mod darcs;
mod fossil;
mod git;
mod hg;
mod svn;

use std::path::Path;

use tracing::debug;

use crate::context::ServiceContext;
use crate::error::FieldError;
use crate::format::Fields;
use crate::options::Options;
use crate::ports::Invocation;
use crate::repository::{RepositoryInfo, System};

pub use bzr::Bazaar;
pub use cvs::Cvs;
pub use darcs::Darcs;
pub use fossil::Fossil;
pub use git::Git;
pub use hg::Mercurial;
pub use svn::Subversion;

/// Readers in the order they are asked to claim a directory.
pub static READERS: [&dyn Reader; 7] =
    [&Bazaar, &Cvs, &Darcs, &Fossil, &Git, &Mercurial, &Subversion];

/// What a reader is asked to extract.
#[derive(Debug, Clone, Copy)]
pub struct DetectionQuery<'a> {
    /// The claimed directory.
    pub root: &'a Path,
    /// The path the prompt was requested for (at or below `root`).
    pub target: &'a Path,
    /// Fields the format actually uses.
    pub fields: Fields,
    /// Options for this call.
    pub options: &'a Options,
}

impl DetectionQuery<'_> {
    /// An info for `system` rooted at the claimed directory, nothing filled in.
    #[must_use]
    pub fn info(&self, system: System) -> RepositoryInfo {
        RepositoryInfo::new(system, self.root, self.target)
    }
}

/// Detection and extraction for one version control system.
pub trait Reader: Sync {
    /// The system this reader handles.
    fn system(&self) -> System;

    /// Returns `true` if `dir` is a repository root or working copy of this
    /// system. Must not need the native client.
    fn detect(&self, ctx: &ServiceContext, dir: &Path) -> bool;

    /// Extracts the requested fields for a directory `detect` accepted.
    fn extract(&self, ctx: &ServiceContext, query: &DetectionQuery<'_>) -> RepositoryInfo;
}

/// Keeps a field's value, or logs why it is unavailable.
pub(crate) fn field<T>(system: System, name: &str, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(%system, field = name, error = %err, "field unavailable");
            None
        }
    }
}

/// Reads a metadata file and trims surrounding whitespace.
pub(crate) fn read_trimmed(ctx: &ServiceContext, path: &Path) -> Result<String, FieldError> {
    ctx.fs
        .read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| FieldError::io(path, &e))
}

/// Runs a native client and returns its stdout when it exits successfully.
pub(crate) fn run_tool(ctx: &ServiceContext, invocation: &Invocation) -> Result<String, FieldError> {
    debug!(program = %invocation.program, args = ?invocation.args, "running");
    let output = ctx.shell.run(invocation)?;
    if !output.success() {
        return Err(FieldError::ToolFailed {
            program: invocation.program.clone(),
            code: output.exit_code,
        });
    }
    Ok(output.stdout)
}

/// A query for `root` itself.
#[cfg(test)]
pub(crate) fn query_at<'a>(root: &'a Path, fields: Fields, options: &'a Options) -> DetectionQuery<'a> {
    DetectionQuery { root, target: root, fields, options }
}
