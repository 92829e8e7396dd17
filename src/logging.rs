//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `VCPROMPT_LOG=debug`.
pub const LOG_VAR: &str = "VCPROMPT_LOG";

/// Installs a stderr subscriber filtered by [`LOG_VAR`].
///
/// Logging is off unless the variable is set, so a prompt never prints
/// anything but its result. Calling this twice is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
