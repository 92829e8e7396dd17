//! Git: `.git/` metadata for branch and hash, `git status` for dirt.

use std::path::{Path, PathBuf};

use super::{field, read_trimmed, run_tool, DetectionQuery, Reader};
use crate::context::ServiceContext;
use crate::error::FieldError;
use crate::ports::Invocation;
use crate::repository::{short_hash, Change, RepositoryInfo, Status, System};

/// Reader for Git working trees, including linked worktrees and
/// submodules whose `.git` is a `gitdir:` file.
pub struct Git;

/// What `HEAD` points at.
#[derive(Debug, PartialEq, Eq)]
enum Head {
    /// `ref: <refname>`
    Symbolic(String),
    /// A bare commit id.
    Detached(String),
}

impl Reader for Git {
    fn system(&self) -> System {
        System::Git
    }

    fn detect(&self, ctx: &ServiceContext, dir: &Path) -> bool {
        git_dir(ctx, dir).is_ok()
    }

    fn extract(&self, ctx: &ServiceContext, query: &DetectionQuery<'_>) -> RepositoryInfo {
        let mut info = query.info(System::Git);

        if query.fields.branch || query.fields.revision {
            let head = git_dir(ctx, query.root).and_then(|dir| {
                let head = read_head(ctx, &dir)?;
                Ok((common_dir(ctx, &dir), head))
            });
            if let Some((common, head)) = field(System::Git, "HEAD", head) {
                if query.fields.branch {
                    info.branch = field(System::Git, "branch", branch(ctx, &common, &head));
                }
                if query.fields.revision {
                    info.hash = field(System::Git, "hash", commit(ctx, &common, &head))
                        .map(|id| short_hash(&id));
                    info.revision.clone_from(&info.hash);
                }
            }
        }

        if query.fields.status {
            let invocation = Invocation::new(
                "git",
                ["--no-optional-locks", "status", "--porcelain"],
                query.root,
            );
            info.status = field(
                System::Git,
                "status",
                run_tool(ctx, &invocation).map(|out| parse_porcelain(&out)),
            );
        }

        info
    }
}

/// Locates the git directory for a working tree.
fn git_dir(ctx: &ServiceContext, dir: &Path) -> Result<PathBuf, FieldError> {
    let dot = dir.join(".git");
    if ctx.fs.is_dir(&dot) {
        return Ok(dot);
    }
    if !ctx.fs.exists(&dot) {
        return Err(FieldError::Malformed { what: ".git marker" });
    }
    let content = read_trimmed(ctx, &dot)?;
    let target = content
        .strip_prefix("gitdir:")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(FieldError::Malformed { what: ".git file" })?;
    Ok(dir.join(target))
}

/// Linked worktrees keep shared refs in the directory named by `commondir`.
fn common_dir(ctx: &ServiceContext, git_dir: &Path) -> PathBuf {
    let pointer = git_dir.join("commondir");
    if !ctx.fs.exists(&pointer) {
        return git_dir.to_path_buf();
    }
    match read_trimmed(ctx, &pointer) {
        Ok(rel) if !rel.is_empty() => git_dir.join(rel),
        _ => git_dir.to_path_buf(),
    }
}

fn read_head(ctx: &ServiceContext, git_dir: &Path) -> Result<Head, FieldError> {
    let head = read_trimmed(ctx, &git_dir.join("HEAD"))?;
    if let Some(target) = head.strip_prefix("ref:") {
        return Ok(Head::Symbolic(target.trim().to_string()));
    }
    if head.len() >= 7 && head.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(Head::Detached(head));
    }
    Err(FieldError::Malformed { what: "HEAD" })
}

fn branch(ctx: &ServiceContext, common: &Path, head: &Head) -> Result<String, FieldError> {
    match head {
        Head::Symbolic(target) => Ok(target.strip_prefix("refs/heads/").unwrap_or(target).to_string()),
        Head::Detached(_) => {
            let heads = common.join("refs").join("heads");
            let mut entries = ctx.fs.list_dir(&heads).map_err(|e| FieldError::io(&heads, &e))?;
            // Nested branch names live in subdirectories; only plain refs count.
            entries.retain(|name| !ctx.fs.is_dir(&heads.join(name)));
            match entries.as_slice() {
                [only] => Ok(only.clone()),
                _ => Err(FieldError::Malformed { what: "detached HEAD" }),
            }
        }
    }
}

fn commit(ctx: &ServiceContext, common: &Path, head: &Head) -> Result<String, FieldError> {
    match head {
        Head::Detached(id) => Ok(id.clone()),
        Head::Symbolic(refname) => {
            let loose = common.join(refname);
            if ctx.fs.exists(&loose) {
                return read_trimmed(ctx, &loose);
            }
            let packed = common.join("packed-refs");
            let content = ctx.fs.read_to_string(&packed).map_err(|e| FieldError::io(&packed, &e))?;
            find_packed_ref(&content, refname).ok_or(FieldError::Malformed { what: "unresolved ref" })
        }
    }
}

fn find_packed_ref(packed: &str, refname: &str) -> Option<String> {
    packed
        .lines()
        .filter(|line| !line.starts_with('#') && !line.starts_with('^'))
        .filter_map(|line| line.split_once(' '))
        .find(|(_, name)| name.trim() == refname)
        .map(|(id, _)| id.to_string())
}

/// Parses `git status --porcelain`: the index column counts as staged,
/// the worktree column as modified.
fn parse_porcelain(output: &str) -> Status {
    let mut status = Status::default();
    for line in output.lines() {
        let mut cols = line.chars();
        let (Some(x), Some(y)) = (cols.next(), cols.next()) else {
            continue;
        };
        match (x, y) {
            ('?', '?') => status.insert('?', Change::Untracked),
            ('!', '!') => {}
            _ => {
                if x != ' ' {
                    status.insert(x, Change::Staged);
                }
                if y != ' ' {
                    status.insert(y, Change::Modified);
                }
            }
        }
    }
    status
}
