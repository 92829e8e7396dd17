//! The result of a successful detection.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Length of a displayed content hash.
pub const SHORT_HASH_LEN: usize = 7;

/// The version control systems vcprompt understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum System {
    /// Bazaar.
    Bazaar,
    /// CVS.
    Cvs,
    /// Darcs.
    Darcs,
    /// Fossil.
    Fossil,
    /// Git.
    Git,
    /// Mercurial.
    Mercurial,
    /// Subversion.
    Subversion,
}

impl System {
    /// The short lowercase identifier rendered by `%s`.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Bazaar => "bzr",
            Self::Cvs => "cvs",
            Self::Darcs => "darcs",
            Self::Fossil => "fossil",
            Self::Git => "git",
            Self::Mercurial => "hg",
            Self::Subversion => "svn",
        }
    }

    /// Character `%a` renders when no override is configured.
    #[must_use]
    pub fn default_staged_char(self) -> char {
        match self {
            Self::Git => '*',
            _ => 'A',
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Category of a working-tree change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A tracked file differs from the checked-out revision.
    Modified,
    /// A file is not under version control.
    Untracked,
    /// A change is scheduled for the next commit (staged or added).
    Staged,
}

/// Collapsed working-tree status.
///
/// Codes are kept sorted and deduplicated regardless of the order in which
/// the native tool reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    codes: BTreeSet<char>,
    modified: bool,
    untracked: bool,
    staged: bool,
}

impl Status {
    /// Records one reported change.
    pub fn insert(&mut self, code: char, change: Change) {
        self.codes.insert(code);
        match change {
            Change::Modified => self.modified = true,
            Change::Untracked => self.untracked = true,
            Change::Staged => self.staged = true,
        }
    }

    /// Whether any change of the given category was recorded.
    #[must_use]
    pub fn has(&self, change: Change) -> bool {
        match change {
            Change::Modified => self.modified,
            Change::Untracked => self.untracked,
            Change::Staged => self.staged,
        }
    }

    /// The collapsed one-letter codes, e.g. `"?AM"`.
    #[must_use]
    pub fn codes(&self) -> String {
        self.codes.iter().collect()
    }

    /// `true` when nothing was recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Everything one reader learned about a repository.
///
/// `None` marks a field the reader could not determine (or was not asked
/// for); the renderer substitutes the unknown placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    /// Which system claimed the directory.
    pub system: System,
    /// Branch (or closest equivalent).
    pub branch: Option<String>,
    /// System-local revision identifier.
    pub revision: Option<String>,
    /// Short content hash, or the revision for systems without one.
    pub hash: Option<String>,
    /// Working-tree status; `None` when unsupported or undetermined.
    pub status: Option<Status>,
    /// Directory where the repository was detected.
    pub root: PathBuf,
    /// Queried path relative to `root`; empty when they are equal.
    pub relative_path: PathBuf,
}

impl RepositoryInfo {
    /// Creates an info with no fields determined yet.
    #[must_use]
    pub fn new(system: System, root: &Path, target: &Path) -> Self {
        let relative_path = target.strip_prefix(root).map(Path::to_path_buf).unwrap_or_default();
        Self {
            system,
            branch: None,
            revision: None,
            hash: None,
            status: None,
            root: root.to_path_buf(),
            relative_path,
        }
    }
}

/// Truncates a content hash to [`SHORT_HASH_LEN`] characters.
#[must_use]
pub fn short_hash(hash: &str) -> String {
    hash.chars().take(SHORT_HASH_LEN).collect()
}
