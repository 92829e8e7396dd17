//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the prompt core and the
//! outside world (the filesystem and native VCS clients).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod shell;

pub use filesystem::FileSystem;
pub use shell::{Invocation, ShellError, ShellExecutor, ShellOutput};
