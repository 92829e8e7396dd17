//! Bazaar: revision from `.bzr/branch/last-revision`, status from
//! `bzr status`.

use std::path::{Path, PathBuf};

use super::{field, read_trimmed, run_tool, DetectionQuery, Reader};
use crate::context::ServiceContext;
use crate::error::FieldError;
use crate::ports::Invocation;
use crate::repository::{Change, RepositoryInfo, Status, System};

/// Reader for Bazaar branches.
pub struct Bazaar;

impl Reader for Bazaar {
    fn system(&self) -> System {
        System::Bazaar
    }

    fn detect(&self, ctx: &ServiceContext, dir: &Path) -> bool {
        ctx.fs.exists(&last_revision_path(dir))
    }

    fn extract(&self, ctx: &ServiceContext, query: &DetectionQuery<'_>) -> RepositoryInfo {
        let mut info = query.info(System::Bazaar);

        // Bazaar names a branch after the directory holding it.
        if query.fields.branch {
            info.branch = query
                .root
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
        }

        if query.fields.revision {
            info.revision = field(System::Bazaar, "revision", revno(ctx, query.root));
            info.hash.clone_from(&info.revision);
        }

        if query.fields.status {
            let invocation = Invocation::new("bzr", ["status"], query.root).env("LC_ALL", "C");
            info.status = field(
                System::Bazaar,
                "status",
                run_tool(ctx, &invocation).map(|out| parse_status(&out)),
            );
        }

        info
    }
}

fn last_revision_path(dir: &Path) -> PathBuf {
    dir.join(".bzr").join("branch").join("last-revision")
}

/// `last-revision` reads `<revno> <revision-id>`.
fn revno(ctx: &ServiceContext, root: &Path) -> Result<String, FieldError> {
    let content = read_trimmed(ctx, &last_revision_path(root))?;
    content
        .split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or(FieldError::Malformed { what: "last-revision" })
}

/// `bzr status` groups files under headers like `modified:`.
fn parse_status(output: &str) -> Status {
    let mut status = Status::default();
    for line in output.lines() {
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        let change = match line.trim_end().trim_end_matches(':') {
            "added" => ('A', Change::Staged),
            "unknown" => ('?', Change::Untracked),
            "modified" => ('M', Change::Modified),
            "removed" => ('D', Change::Modified),
            "renamed" => ('R', Change::Modified),
            "kind changed" => ('K', Change::Modified),
            "missing" => ('!', Change::Modified),
            "conflicts" => ('C', Change::Modified),
            _ => continue,
        };
        status.insert(change.0, change.1);
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

    fn fixture(last_revision: &str) -> tempfile::TempDir {
        let dir = tempfile::Builder::new().prefix("trunk").tempdir().unwrap();
        let branch = dir.path().join(".bzr").join("branch");
        std::fs::create_dir_all(&branch).unwrap();
        std::fs::write(branch.join("last-revision"), last_revision).unwrap();
        dir
    }

    #[test]
    fn revision_and_directory_branch() {
        let repo = fixture("3 jane@example.org-20240101120000-k3j2h1g0f9e8d7c6\n");
        let options = Options::default();
        let info = Bazaar.extract(&testing::offline(), &query_at(repo.path(), Fields::ALL.without_status(), &options));

        let name = repo.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("trunk"));
        assert_eq!(render("%s:%n:%b:%r:%h", &info, &options), format!("bzr:bzr:{name}:3:3"));
    }

    #[test]
    fn empty_last_revision_is_unknown() {
        let repo = fixture("\n");
        let options = Options { unknown_value: "UNKNOWN".into(), ..Options::default() };
        let info = Bazaar.extract(&testing::offline(), &query_at(repo.path(), Fields::ALL.without_status(), &options));

        assert_eq!(render("%r", &info, &options), "UNKNOWN");
    }

    #[test]
    fn status_headers_map_to_codes() {
        let repo = fixture("1 rev-id\n");
        let ctx = testing::with_commands(vec![testing::stdout(
            "modified:\n  quotes.txt\nunknown:\n  new.txt\nadded:\n  other.txt\nkind changed:\n  link (file => symlink)\n",
        )]);
        let options = Options::default();
        let fields = Fields { status: true, ..Fields::default() };
        let info = Bazaar.extract(&ctx, &query_at(repo.path(), fields, &options));

        assert_eq!(render("%i %m%u%a", &info, &options), "?AKM +?A");
    }

    #[test]
    fn clean_tree_has_empty_status() {
        let repo = fixture("1 rev-id\n");
        let ctx = testing::with_commands(vec![testing::stdout("")]);
        let options = Options::default();
        let fields = Fields { status: true, ..Fields::default() };
        let info = Bazaar.extract(&ctx, &query_at(repo.path(), fields, &options));

        assert!(info.status.as_ref().is_some_and(Status::is_clean));
        assert_eq!(render("[%m%u]", &info, &options), "[]");
    }

    #[test]
    fn branch_dir_without_last_revision_is_not_claimed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".bzr").join("branch")).unwrap();
        assert!(!Bazaar.detect(&testing::offline(), dir.path()));
    }
}
