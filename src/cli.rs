//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

const TOKENS_HELP: &str = "\
Format tokens:
  %s, %n  version control system (bzr, cvs, darcs, fossil, git, hg, svn)
  %b      branch
  %r      revision
  %h      short hash
  %i      collapsed status codes
  %m      shown when tracked files are modified
  %u      shown when untracked files exist
  %a      shown when changes are staged
  %p      path relative to the repository root
  %P      repository root

Environment (ignored with --without-environment):
  VCPROMPT_FORMAT   default format
  VCPROMPT_UNKNOWN  default placeholder for unknown values";

/// Top-level CLI parser for `vcprompt`.
#[derive(Debug, Parser)]
#[command(
    name = "vcprompt",
    version,
    about = "Print version control information for a shell prompt",
    after_help = TOKENS_HELP
)]
pub struct Cli {
    /// Format string; defaults to "%s:%b".
    #[arg(value_name = "FORMAT", conflicts_with = "format_flag")]
    pub format: Option<String>,

    /// Format string, as an option.
    #[arg(long = "format", value_name = "FORMAT")]
    pub format_flag: Option<String>,

    /// Directory to start from.
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Maximum number of parent directories to search.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Placeholder for values that cannot be determined.
    #[arg(long, value_name = "STRING")]
    pub values: Option<String>,

    /// Ignore VCPROMPT_FORMAT and VCPROMPT_UNKNOWN.
    #[arg(long)]
    pub without_environment: bool,

    /// Character shown by %m.
    #[arg(long, value_name = "CHAR")]
    pub modified: Option<char>,

    /// Character shown by %u.
    #[arg(long, value_name = "CHAR")]
    pub untracked: Option<char>,

    /// Character shown by %a (default: '*' for git, 'A' otherwise).
    #[arg(long, value_name = "CHAR")]
    pub staged: Option<char>,

    /// Milliseconds to wait for a native client before giving up (default: 1000).
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,
}

impl Cli {
    /// The format given on the command line, positional or flag.
    #[must_use]
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref().or(self.format_flag.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn parses_positional_format() {
        let cli = Cli::parse_from(["vcprompt", "%s:%b"]);
        assert_eq!(cli.format(), Some("%s:%b"));
        assert!(!cli.without_environment);
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "vcprompt",
            "--format",
            "%b",
            "--path",
            "/src",
            "--max-depth",
            "2",
            "--values",
            "UNKNOWN",
            "--without-environment",
            "--staged",
            "#",
            "--timeout",
            "1000",
        ]);
        assert_eq!(cli.format(), Some("%b"));
        assert_eq!(cli.path.as_deref(), Some(std::path::Path::new("/src")));
        assert_eq!(cli.max_depth, Some(2));
        assert_eq!(cli.values.as_deref(), Some("UNKNOWN"));
        assert!(cli.without_environment);
        assert_eq!(cli.staged, Some('#'));
        assert_eq!(cli.timeout, Some(1000));
    }

    #[test]
    fn positional_and_flag_format_conflict() {
        assert!(Cli::try_parse_from(["vcprompt", "--format", "%b", "%s"]).is_err());
    }

    #[test]
    fn multi_character_marker_is_rejected() {
        assert!(Cli::try_parse_from(["vcprompt", "--modified", "++"]).is_err());
    }
}
