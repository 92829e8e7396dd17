//! Binary entrypoint for the `vcprompt` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    vcprompt::logging::init();
    // Recording and replay are selected in vcprompt::execute via
    // VCPROMPT_RECORD=<file> / VCPROMPT_REPLAY=<file>.
    match vcprompt::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
