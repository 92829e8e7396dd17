//! Entry points: walk, extract and render in one call.

use std::path::Path;

use tracing::debug;

use crate::context::ServiceContext;
use crate::error::PromptError;
use crate::format::FormatSpec;
use crate::options::Options;
use crate::walker;

/// Renders `format` for the repository containing `path`, or returns an
/// empty string when there is none or the lookup failed outright.
#[must_use]
pub fn vcprompt(path: &Path, format: &str, options: &Options) -> String {
    try_vcprompt(path, format, options).unwrap_or_default()
}

/// Like [`vcprompt`], but reports hard failures.
///
/// # Errors
///
/// See [`try_vcprompt_with`].
pub fn try_vcprompt(path: &Path, format: &str, options: &Options) -> Result<String, PromptError> {
    try_vcprompt_with(&ServiceContext::live(options.command_timeout), path, format, options)
}

/// Renders `format` using the ports in `ctx`.
///
/// A path outside any repository yields `Ok("")`, as does a start path
/// that does not exist and has no repository above it.
///
/// # Errors
///
/// Returns [`PromptError::CurrentDir`] if a relative `path` cannot be
/// resolved, and [`PromptError::Inaccessible`] if the existence of the
/// start path cannot be checked.
pub fn try_vcprompt_with(
    ctx: &ServiceContext,
    path: &Path,
    format: &str,
    options: &Options,
) -> Result<String, PromptError> {
    let start = walker::normalize(path)?;
    match ctx.fs.try_exists(&start) {
        Ok(true) => {}
        Ok(false) => debug!(path = %start.display(), "start path does not exist"),
        Err(err) => {
            return Err(PromptError::Inaccessible { path: start, message: err.to_string() });
        }
    }

    let spec = FormatSpec::parse(format);
    let rendered = walker::detect(ctx, &start, spec.fields(), options)
        .map(|info| spec.render(&info, options))
        .unwrap_or_default();
    Ok(rendered)
}
