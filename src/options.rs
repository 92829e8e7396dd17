//! Per-call configuration.

use std::time::Duration;

/// Placeholder rendered for fields that cannot be determined.
pub const DEFAULT_UNKNOWN: &str = "(unknown)";

/// Format used when the caller supplies none.
pub const DEFAULT_FORMAT: &str = "%s:%b";

/// Time allowed for each native VCS command. Python clients such as `hg`
/// and `bzr` need a few hundred milliseconds just to start.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(1);

/// Options threaded through one `vcprompt` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Text substituted for branch, revision or hash when unavailable.
    pub unknown_value: String,
    /// How many parent directories to ascend; `None` walks to the root and
    /// `Some(0)` checks only the starting directory.
    pub max_depth: Option<usize>,
    /// Rendered by `%m` when tracked files are modified.
    pub modified_char: char,
    /// Rendered by `%u` when untracked files exist.
    pub untracked_char: char,
    /// Rendered by `%a` when changes are staged or added; `None` uses the
    /// detected system's default.
    pub staged_char: Option<char>,
    /// Whether `VCPROMPT_FORMAT` / `VCPROMPT_UNKNOWN` may supply defaults.
    /// Only the CLI layer consults this.
    pub use_environment: bool,
    /// Time allowed for each native VCS command.
    pub command_timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            unknown_value: DEFAULT_UNKNOWN.to_string(),
            max_depth: None,
            modified_char: '+',
            untracked_char: '?',
            staged_char: None,
            use_environment: true,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}
