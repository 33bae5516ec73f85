use nix::errno::Errno;
use rustyline::error::ReadlineError;
use std::ffi::NulError;
use std::io;
use thiserror::Error;

/// Failures the shell reports to the user.
///
/// Every message is a short tag naming the failing operation followed by the
/// platform description, in the spirit of `perror`.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The input stream failed for a reason other than end-of-input.
    #[error("read error: {0}")]
    Input(#[source] io::Error),

    /// The line editor failed for a reason other than end-of-input.
    #[error("read error: {0}")]
    Editor(#[from] ReadlineError),

    /// The prompt could not be written or flushed.
    #[error("prompt error: {0}")]
    Prompt(#[source] io::Error),

    /// Pending output could not be flushed before starting a child.
    #[error("write error: {0}")]
    Output(#[source] io::Error),

    /// The operating system refused to create a new process.
    #[error("fork error: {}", .0.desc())]
    Spawn(Errno),

    /// The child could not replace its image with the requested program.
    #[error("exec error: {}", .0.desc())]
    Exec(Errno),

    /// An argument cannot be passed to `execvp` because it contains a NUL byte.
    #[error("exec error: {0}")]
    Argument(#[from] NulError),

    /// Collecting the status of the child failed.
    #[error("wait error: {}", .0.desc())]
    Wait(Errno),
}
