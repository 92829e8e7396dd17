//! Version control information for shell prompts.
//!
//! [`vcprompt`] walks up from a directory until one of the supported
//! systems (Bazaar, CVS, Darcs, Fossil, Git, Mercurial, Subversion) claims
//! it, then renders a format string such as `"%s:%b"` against what that
//! system's metadata reveals.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod logging;
pub mod options;
pub mod ports;
pub mod prompt;
pub mod readers;
pub mod repository;
pub mod walker;

use std::io::Write;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;

pub use config::{Session, Settings};
pub use context::ServiceContext;
pub use error::PromptError;
pub use options::Options;
pub use prompt::{try_vcprompt, try_vcprompt_with, vcprompt};
pub use repository::{RepositoryInfo, System};

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails, the lookup fails
/// outright, or a cassette cannot be read or written.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string().trim_end().to_string()),
    };
    let settings = Settings::resolve(&cli, |name| std::env::var(name).ok())?;
    let output = execute(&settings)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| format!("cannot write output: {e}"))
}

/// Renders the prompt for resolved settings, wiring ports per
/// [`Settings::session`].
///
/// # Errors
///
/// Returns an error string if the lookup fails outright or a cassette
/// cannot be read or written.
pub fn execute(settings: &Settings) -> Result<String, String> {
    let timeout = settings.options.command_timeout;
    let ctx = match &settings.session {
        Session::Live => ServiceContext::live(timeout),
        Session::Record(path) => ServiceContext::recording(path, timeout),
        Session::Replay(path) => ServiceContext::replaying(path)?,
    };

    let result = try_vcprompt_with(&ctx, &settings.path, &settings.format, &settings.options);

    // Write the cassette even when the lookup failed.
    if let Some(path) = ctx.finish()? {
        debug!(path = %path.display(), "cassette written");
    }
    result.map_err(|e| e.to_string())
}
