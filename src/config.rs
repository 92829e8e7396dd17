//! Resolves command-line flags and environment into call settings.
//!
//! Precedence for the format and the placeholder: explicit argument, then
//! environment (unless `--without-environment`), then the built-in default.
//! Empty environment values count as unset.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::options::{Options, DEFAULT_FORMAT};

/// Default format when no argument is given.
pub const FORMAT_VAR: &str = "VCPROMPT_FORMAT";
/// Default placeholder when `--values` is not given.
pub const UNKNOWN_VAR: &str = "VCPROMPT_UNKNOWN";
/// Records every filesystem read and command run to this cassette file.
pub const RECORD_VAR: &str = "VCPROMPT_RECORD";
/// Replays a cassette file instead of touching disk or running commands.
pub const REPLAY_VAR: &str = "VCPROMPT_REPLAY";

/// How the ports are wired for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Real filesystem and commands.
    Live,
    /// Live, writing a cassette to the path when done.
    Record(PathBuf),
    /// Served from the cassette at the path.
    Replay(PathBuf),
}

/// Everything one invocation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory to start from.
    pub path: PathBuf,
    /// Format string to render.
    pub format: String,
    /// Options for the call.
    pub options: Options,
    /// Port wiring.
    pub session: Session,
}

impl Settings {
    /// Merges `cli` with variables looked up through `env`.
    ///
    /// # Errors
    ///
    /// Returns an error if both [`RECORD_VAR`] and [`REPLAY_VAR`] are set.
    pub fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let use_environment = !cli.without_environment;
        let lookup = |name: &str| {
            if use_environment {
                non_empty(env(name))
            } else {
                None
            }
        };

        let defaults = Options::default();
        let options = Options {
            unknown_value: cli
                .values
                .clone()
                .or_else(|| lookup(UNKNOWN_VAR))
                .unwrap_or(defaults.unknown_value),
            max_depth: cli.max_depth,
            modified_char: cli.modified.unwrap_or(defaults.modified_char),
            untracked_char: cli.untracked.unwrap_or(defaults.untracked_char),
            staged_char: cli.staged,
            use_environment,
            command_timeout: cli
                .timeout
                .map_or(defaults.command_timeout, Duration::from_millis),
        };

        let format = cli
            .format()
            .map(str::to_string)
            .or_else(|| lookup(FORMAT_VAR))
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string());

        let session = match (non_empty(env(RECORD_VAR)), non_empty(env(REPLAY_VAR))) {
            (Some(_), Some(_)) => {
                return Err(format!("{RECORD_VAR} and {REPLAY_VAR} cannot both be set"));
            }
            (Some(path), None) => Session::Record(PathBuf::from(path)),
            (None, Some(path)) => Session::Replay(PathBuf::from(path)),
            (None, None) => Session::Live,
        };

        Ok(Self {
            path: cli.path.clone().unwrap_or_else(|| PathBuf::from(".")),
            format,
            options,
            session,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_UNKNOWN;
    use clap::Parser;
    use std::collections::HashMap;

    fn resolve(args: &[&str], vars: &[(&str, &str)]) -> Result<Settings, String> {
        let cli = Cli::parse_from(std::iter::once("vcprompt").chain(args.iter().copied()));
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        Settings::resolve(&cli, |name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_arguments_or_environment() {
        let settings = resolve(&[], &[]).unwrap();
        assert_eq!(settings.format, "%s:%b");
        assert_eq!(settings.path, PathBuf::from("."));
        assert_eq!(settings.options, Options::default());
        assert_eq!(settings.options.command_timeout, Duration::from_secs(1));
        assert_eq!(settings.session, Session::Live);
    }

    #[test]
    fn environment_supplies_defaults() {
        let settings = resolve(&[], &[(FORMAT_VAR, "[%b]"), (UNKNOWN_VAR, "?!")]).unwrap();
        assert_eq!(settings.format, "[%b]");
        assert_eq!(settings.options.unknown_value, "?!");
    }

    #[test]
    fn arguments_beat_environment() {
        let settings =
            resolve(&["--values", "UNKNOWN", "%h"], &[(FORMAT_VAR, "[%b]"), (UNKNOWN_VAR, "?!")]).unwrap();
        assert_eq!(settings.format, "%h");
        assert_eq!(settings.options.unknown_value, "UNKNOWN");
    }

    #[test]
    fn without_environment_ignores_variables() {
        let settings =
            resolve(&["--without-environment"], &[(FORMAT_VAR, "[%b]"), (UNKNOWN_VAR, "?!")]).unwrap();
        assert_eq!(settings.format, "%s:%b");
        assert_eq!(settings.options.unknown_value, DEFAULT_UNKNOWN);
        assert!(!settings.options.use_environment);
    }

    #[test]
    fn empty_variables_count_as_unset() {
        let settings = resolve(&[], &[(FORMAT_VAR, ""), (UNKNOWN_VAR, "")]).unwrap();
        assert_eq!(settings.format, "%s:%b");
        assert_eq!(settings.options.unknown_value, DEFAULT_UNKNOWN);
    }

    #[test]
    fn flags_become_options() {
        let settings = resolve(
            &["--max-depth", "0", "--modified", "!", "--untracked", "~", "--timeout", "2000"],
            &[],
        )
        .unwrap();
        assert_eq!(settings.options.max_depth, Some(0));
        assert_eq!(settings.options.modified_char, '!');
        assert_eq!(settings.options.untracked_char, '~');
        assert_eq!(settings.options.command_timeout, Duration::from_secs(2));
    }

    #[test]
    fn session_follows_record_and_replay_variables() {
        let record = resolve(&[], &[(RECORD_VAR, "/tmp/a.yaml")]).unwrap();
        assert_eq!(record.session, Session::Record(PathBuf::from("/tmp/a.yaml")));

        // Developer switches are not affected by --without-environment.
        let replay = resolve(&["--without-environment"], &[(REPLAY_VAR, "/tmp/b.yaml")]).unwrap();
        assert_eq!(replay.session, Session::Replay(PathBuf::from("/tmp/b.yaml")));

        assert!(resolve(&[], &[(RECORD_VAR, "a"), (REPLAY_VAR, "b")]).is_err());
    }
}
