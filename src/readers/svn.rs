//! Subversion: `svn info` for URL and revision, with a fallback to the
//! plain-text `entries` file of pre-1.7 working copies.

use std::path::Path;

use tracing::debug;

use super::{field, read_trimmed, run_tool, DetectionQuery, Reader};
use crate::context::ServiceContext;
use crate::error::FieldError;
use crate::ports::Invocation;
use crate::repository::{Change, RepositoryInfo, Status, System};

/// Reader for Subversion working copies.
pub struct Subversion;

/// The parts of `svn info` a prompt needs.
#[derive(Debug, Default, PartialEq, Eq)]
struct WorkingCopy {
    url: Option<String>,
    revision: Option<String>,
}

impl Reader for Subversion {
    fn system(&self) -> System {
        System::Subversion
    }

    fn detect(&self, ctx: &ServiceContext, dir: &Path) -> bool {
        ctx.fs.exists(&dir.join(".svn").join("entries"))
    }

    fn extract(&self, ctx: &ServiceContext, query: &DetectionQuery<'_>) -> RepositoryInfo {
        let mut info = query.info(System::Subversion);

        if query.fields.branch || query.fields.revision {
            let wc = svn_info(ctx, query.root).or_else(|err| {
                debug!(error = %err, "svn info unavailable, reading entries");
                legacy_entries(ctx, query.root)
            });
            if let Some(wc) = field(System::Subversion, "info", wc) {
                if query.fields.branch {
                    info.branch = wc.url.as_deref().and_then(branch_from_url);
                }
                info.hash.clone_from(&wc.revision);
                info.revision = wc.revision;
            }
        }

        if query.fields.status {
            let invocation = Invocation::new("svn", ["status", "--non-interactive"], query.root)
                .env("LC_ALL", "C");
            info.status = field(
                System::Subversion,
                "status",
                run_tool(ctx, &invocation).map(|out| parse_status(&out)),
            );
        }

        info
    }
}

fn svn_info(ctx: &ServiceContext, root: &Path) -> Result<WorkingCopy, FieldError> {
    // Labels are localized; force the untranslated ones.
    let invocation =
        Invocation::new("svn", ["info", "--non-interactive"], root).env("LC_ALL", "C");
    let out = run_tool(ctx, &invocation)?;
    let mut wc = WorkingCopy::default();
    for line in out.lines() {
        if let Some(url) = line.strip_prefix("URL:") {
            wc.url = Some(url.trim().to_string());
        } else if let Some(rev) = line.strip_prefix("Revision:") {
            wc.revision = Some(rev.trim().to_string());
        }
    }
    if wc.revision.is_none() {
        return Err(FieldError::Malformed { what: "svn info output" });
    }
    Ok(wc)
}

/// Pre-1.7 `entries`: format number, blank, `dir`, revision, URL.
/// From 1.7 on the file only holds the format number.
fn legacy_entries(ctx: &ServiceContext, root: &Path) -> Result<WorkingCopy, FieldError> {
    let content = read_trimmed(ctx, &root.join(".svn").join("entries"))?;
    let lines: Vec<&str> = content.lines().map(str::trim).collect();
    match lines.as_slice() {
        [_, _, "dir", revision, url, ..] if revision.parse::<u64>().is_ok() => Ok(WorkingCopy {
            url: Some((*url).to_string()).filter(|u| !u.is_empty()),
            revision: Some((*revision).to_string()),
        }),
        _ => Err(FieldError::Malformed { what: "svn entries" }),
    }
}

/// The deepest `trunk`, `branches/<name>` or `tags/<name>` in a URL.
fn branch_from_url(url: &str) -> Option<String> {
    let segments: Vec<&str> = url.split('/').collect();
    let mut found = None;
    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "trunk" => found = Some("trunk"),
            "branches" | "tags" => {
                if let Some(name) = segments.get(i + 1).filter(|n| !n.is_empty()) {
                    found = Some(name);
                }
            }
            _ => {}
        }
    }
    found.map(str::to_string)
}

/// Parses `svn status`: first column for content, second for properties.
fn parse_status(output: &str) -> Status {
    let mut status = Status::default();
    for line in output.lines() {
        let mut cols = line.chars();
        match (cols.next(), cols.next()) {
            (Some('?'), _) => status.insert('?', Change::Untracked),
            (Some('A'), _) => status.insert('A', Change::Staged),
            (Some(code @ ('M' | 'D' | 'R' | 'C' | '!' | '~')), _) => {
                status.insert(code, Change::Modified);
            }
            (Some(' '), Some(code @ ('M' | 'C'))) => status.insert(code, Change::Modified),
            _ => {}
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing;
    use crate::format::{render, Fields};
    use crate::options::Options;
    use crate::readers::query_at;

    fn fixture(entries: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".svn")).unwrap();
        std::fs::write(dir.path().join(".svn").join("entries"), entries).unwrap();
        dir
    }

    fn info_output(url: &str, revision: u32) -> String {
        format!(
            "Path: .\nWorking Copy Root Path: /w\nURL: {url}\nRepository Root: https://svn.example.org/repo\n\
             Revision: {revision}\nNode Kind: directory\nSchedule: normal\n"
        )
    }

    fn extract(ctx: &ServiceContext, root: &Path, fields: Fields, options: &Options) -> RepositoryInfo {
        Subversion.extract(ctx, &query_at(root, fields, options))
    }

    #[test]
    fn branch_and_revision_from_svn_info() {
        let wc = fixture("12\n");
        let ctx = testing::with_commands(vec![testing::stdout(&info_output(
            "https://svn.example.org/repo/branches/release-1.2/src",
            2,
        ))]);
        let info = extract(&ctx, wc.path(), Fields::ALL.without_status(), &Options::default());

        assert_eq!(render("%s:%b:r%r:%h", &info, &Options::default()), "svn:release-1.2:r2:2");
    }

    #[test]
    fn url_without_layout_has_unknown_branch() {
        let wc = fixture("12\n");
        let ctx = testing::with_commands(vec![testing::stdout(&info_output(
            "file:///tmp/repositories/svn",
            2,
        ))]);
        let options = Options { unknown_value: "UNKNOWN".into(), ..Options::default() };
        let info = extract(&ctx, wc.path(), Fields::ALL.without_status(), &options);

        assert_eq!(render("%s:%n:%b:%h", &info, &options), "svn:svn:UNKNOWN:2");
    }

    #[test]
    fn legacy_entries_are_read_without_svn() {
        let wc = fixture("10\n\ndir\n41\nhttps://svn.example.org/repo/trunk\nhttps://svn.example.org/repo\n");
        let ctx = testing::with_commands(vec![testing::not_found("svn")]);
        let info = extract(&ctx, wc.path(), Fields::ALL.without_status(), &Options::default());

        assert_eq!(info.branch.as_deref(), Some("trunk"));
        assert_eq!(info.revision.as_deref(), Some("41"));
        assert_eq!(info.hash.as_deref(), Some("41"));
    }

    #[test]
    fn modern_entries_without_svn_are_unknown() {
        let wc = fixture("12\n");
        let ctx = testing::with_commands(vec![testing::not_found("svn")]);
        let info = extract(&ctx, wc.path(), Fields::ALL.without_status(), &Options::default());

        assert_eq!(info.branch, None);
        assert_eq!(info.revision, None);
    }

    #[test]
    fn status_collapses_both_columns() {
        let wc = fixture("12\n");
        let ctx = testing::with_commands(vec![testing::stdout(
            "M       quotes.txt\n?       untracked_file\nA  +    copied.txt\n M      props.txt\nX       vendor\n",
        )]);
        let info = extract(&ctx, wc.path(), Fields { status: true, ..Fields::default() }, &Options::default());

        assert_eq!(render("%i %m%u%a", &info, &Options::default()), "?AM +?A");
    }

    #[test]
    fn branch_from_url_picks_deepest_marker() {
        assert_eq!(branch_from_url("https://h/repo/trunk").as_deref(), Some("trunk"));
        assert_eq!(branch_from_url("https://h/repo/tags/v1.0/docs").as_deref(), Some("v1.0"));
        assert_eq!(branch_from_url("https://h/trunk/sub/branches/x").as_deref(), Some("x"));
        assert_eq!(branch_from_url("https://h/repo/branches/").as_deref(), None);
        assert_eq!(branch_from_url("https://h/repo"), None);
    }
}
