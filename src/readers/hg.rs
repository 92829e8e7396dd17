//! Mercurial: branch files, dirstate parents and the tip caches.

use std::path::Path;

use super::{field, read_trimmed, run_tool, DetectionQuery, Reader};
use crate::context::ServiceContext;
use crate::error::FieldError;
use crate::ports::Invocation;
use crate::repository::{short_hash, Change, RepositoryInfo, Status, System};

/// Reader for Mercurial working copies.
pub struct Mercurial;

/// Branch markers, in the order they are consulted.
const BRANCH_FILES: [&str; 3] = ["branch", "undo.branch", "bookmarks.current"];

/// Field order of a cache's first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TipLayout {
    /// `<node> <rev> [...]`, as in the branch-heads caches.
    NodeFirst,
    /// `<rev> <node> [...]`, as in the tags caches.
    RevFirst,
}

/// Caches whose first line names the tip. Branch-heads caches come first,
/// newest layout first, then the tags caches.
const TIP_CACHES: [(&str, TipLayout); 11] = [
    ("cache/branch3-served", TipLayout::NodeFirst),
    ("cache/branch3", TipLayout::NodeFirst),
    ("cache/branch2-served", TipLayout::NodeFirst),
    ("cache/branch2-visible", TipLayout::NodeFirst),
    ("cache/branch2", TipLayout::NodeFirst),
    ("cache/branchheads-served", TipLayout::NodeFirst),
    ("cache/branchheads", TipLayout::NodeFirst),
    ("branchheads.cache", TipLayout::NodeFirst),
    ("cache/tags2-visible", TipLayout::RevFirst),
    ("cache/tags2", TipLayout::RevFirst),
    ("tags.cache", TipLayout::RevFirst),
];

const DIRSTATE_V2_MARKER: &[u8] = b"dirstate-v2\n";
const NODE_LEN: usize = 20;
const NULL_NODE: &str = "0000000000000000000000000000000000000000";

/// A changeset: local revision number and full hex node.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Changeset {
    rev: String,
    node: String,
}

impl Reader for Mercurial {
    fn system(&self) -> System {
        System::Mercurial
    }

    fn detect(&self, ctx: &ServiceContext, dir: &Path) -> bool {
        branch_file(ctx, dir).is_some()
    }

    fn extract(&self, ctx: &ServiceContext, query: &DetectionQuery<'_>) -> RepositoryInfo {
        let mut info = query.info(System::Mercurial);
        let hg = query.root.join(".hg");

        if query.fields.branch {
            info.branch = branch_file(ctx, query.root)
                .and_then(|path| field(System::Mercurial, "branch", read_trimmed(ctx, &path)))
                .filter(|b| !b.is_empty());
        }

        if query.fields.revision {
            let (rev, node) = current_changeset(ctx, query.root, &hg);
            info.revision = rev;
            info.hash = node.map(|n| short_hash(&n));
        }

        if query.fields.status {
            let invocation =
                Invocation::new("hg", ["status"], query.root).env("HGPLAIN", "1");
            info.status = field(
                System::Mercurial,
                "status",
                run_tool(ctx, &invocation).map(|out| parse_status(&out)),
            );
        }

        info
    }
}

fn branch_file(ctx: &ServiceContext, dir: &Path) -> Option<std::path::PathBuf> {
    let hg = dir.join(".hg");
    BRANCH_FILES.iter().map(|name| hg.join(name)).find(|path| ctx.fs.exists(path))
}

/// Revision number and node of the working copy's parent, as far as they
/// can be determined.
fn current_changeset(
    ctx: &ServiceContext,
    root: &Path,
    hg: &Path,
) -> (Option<String>, Option<String>) {
    let parent = field(System::Mercurial, "dirstate", working_parent(ctx, hg));
    if parent.as_deref() == Some(NULL_NODE) {
        return (Some("-1".to_string()), parent);
    }

    let tip = cached_tip(ctx, hg);
    match (parent, tip) {
        (Some(node), Some(tip)) if tip.node == node => (Some(tip.rev), Some(node)),
        (Some(node), _) => {
            let rev = field(System::Mercurial, "revision", log_parent(ctx, root))
                .filter(|cs| cs.node == node)
                .map(|cs| cs.rev);
            (rev, Some(node))
        }
        // No readable dirstate: the cached tip is the best guess.
        (None, Some(tip)) => (Some(tip.rev), Some(tip.node)),
        (None, None) => match field(System::Mercurial, "revision", log_parent(ctx, root)) {
            Some(cs) => (Some(cs.rev), Some(cs.node)),
            None => (None, None),
        },
    }
}

/// First parent recorded in `.hg/dirstate` (v1 or v2).
fn working_parent(ctx: &ServiceContext, hg: &Path) -> Result<String, FieldError> {
    let path = hg.join("dirstate");
    let head = ctx
        .fs
        .read_head(&path, DIRSTATE_V2_MARKER.len() + NODE_LEN)
        .map_err(|e| FieldError::io(&path, &e))?;
    let nodes = head.strip_prefix(DIRSTATE_V2_MARKER).unwrap_or(&head);
    let node = nodes.get(..NODE_LEN).ok_or(FieldError::Malformed { what: "dirstate" })?;
    Ok(hex::encode(node))
}

fn cached_tip(ctx: &ServiceContext, hg: &Path) -> Option<Changeset> {
    TIP_CACHES
        .iter()
        .map(|&(name, layout)| (hg.join(name), layout))
        .filter(|(path, _)| ctx.fs.exists(path))
        .find_map(|(path, layout)| {
            let content = ctx.fs.read_to_string(&path).ok()?;
            parse_cache_tip(content.lines().next()?, layout)
        })
}

/// Parses a cache's first line in the given `layout`, or the `key=value`
/// form (`tip-node=<node> tip-rev=<rev>`) of `branch3`.
fn parse_cache_tip(line: &str, layout: TipLayout) -> Option<Changeset> {
    if line.contains('=') {
        let mut node = None;
        let mut rev = None;
        for pair in line.split_whitespace() {
            match pair.split_once('=') {
                Some(("tip-node", v)) => node = Some(v),
                Some(("tip-rev", v)) => rev = Some(v),
                _ => {}
            }
        }
        return changeset(node?, rev?);
    }
    let mut parts = line.split_whitespace();
    let (first, second) = (parts.next()?, parts.next()?);
    match layout {
        TipLayout::NodeFirst => changeset(first, second),
        TipLayout::RevFirst => changeset(second, first),
    }
}

fn changeset(node: &str, rev: &str) -> Option<Changeset> {
    let valid = node.len() == NODE_LEN * 2
        && node.chars().all(|c| c.is_ascii_hexdigit())
        && rev.parse::<i64>().is_ok();
    valid.then(|| Changeset { rev: rev.to_string(), node: node.to_ascii_lowercase() })
}

fn log_parent(ctx: &ServiceContext, root: &Path) -> Result<Changeset, FieldError> {
    let invocation = Invocation::new("hg", ["log", "-r", ".", "--template", "{node} {rev}"], root)
        .env("HGPLAIN", "1");
    let out = run_tool(ctx, &invocation)?;
    parse_cache_tip(out.trim(), TipLayout::NodeFirst).ok_or(FieldError::Malformed { what: "hg log output" })
}

/// Parses `hg status`: `A` is staged, `?` untracked, anything else a
/// modification of tracked content.
fn parse_status(output: &str) -> Status {
    let mut status = Status::default();
    for code in output.lines().filter_map(|line| line.chars().next()) {
        match code {
            '?' => status.insert('?', Change::Untracked),
            'A' => status.insert('A', Change::Staged),
            'M' | 'R' | '!' => status.insert(code, Change::Modified),
            _ => {}
        }
    }
    status
}
