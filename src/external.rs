use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use crate::lexer::ArgumentVector;
use anyhow::Result;
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{self, ForkResult, Pid};
use std::ffi::{CString, OsString};
use std::io::Write;
use std::os::unix::ffi::OsStrExt;

/// Status the child reports when its program could not be started.
const EXEC_FAILURE: i32 = 1;

/// Prefix of the message the child writes when `execvp` fails.
const EXEC_TAG: &str = "exec error: ";

/// Command that is not a builtin.
///
/// The program is looked up through `PATH` by `execvp` in the child, so creating an
/// `ExternalCommand` never fails; a missing program shows up as an `exec error`.
pub struct ExternalCommand {
    argv: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(argv: Vec<OsString>) -> Self {
        Self { argv }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(&self, argv: &ArgumentVector<'_>) -> Option<Box<dyn ExecutableCommand>> {
        argv.command()?;
        Some(Box::new(ExternalCommand::new(
            argv.iter().map(ToOwned::to_owned).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        let status = self.run(stdout)?;
        Ok(status.code())
    }
}

impl ExternalCommand {
    /// Fork, replace the child's image with the program and block until it terminates.
    ///
    /// Arguments are handed to `execvp` byte for byte. If pending output cannot be
    /// flushed, nothing is spawned.
    pub fn run(&self, stdout: &mut dyn Write) -> Result<ExitStatus, ShellError> {
        let argv = self
            .argv
            .iter()
            .map(|arg| CString::new(arg.as_bytes()))
            .collect::<Result<Vec<_>, _>>()?;
        if argv.is_empty() {
            return Ok(ExitStatus::Exited(0));
        }

        // Anything still buffered would otherwise be written twice or after the child.
        stdout.flush().map_err(ShellError::Output)?;
        std::io::stdout().flush().map_err(ShellError::Output)?;

        let child = spawn(&argv)?;
        tracing::debug!(pid = child.as_raw(), program = ?self.argv[0], "spawned child");
        let status = wait_for(child)?;
        tracing::debug!(pid = child.as_raw(), ?status, "child terminated");
        Ok(status)
    }
}

fn spawn(argv: &[CString]) -> Result<Pid, ShellError> {
    // SAFETY: the argument array is built before forking. The child does not allocate
    // or take locks: it only calls execvp, write and _exit, and never returns into the
    // caller.
    match unsafe { unistd::fork() }.map_err(ShellError::Spawn)? {
        ForkResult::Parent { child } => Ok(child),
        ForkResult::Child => replace_image(argv),
    }
}

/// Runs in the child. Never returns: either the program takes over or the child exits.
fn replace_image(argv: &[CString]) -> ! {
    let errno = match unistd::execvp(&argv[0], argv) {
        Ok(never) => match never {},
        Err(errno) => errno,
    };
    report_exec_failure(errno);
    // SAFETY: _exit only ends the calling process; the forked copy of the parent's
    // buffers and atexit handlers must not run here.
    unsafe { nix::libc::_exit(EXEC_FAILURE) }
}

/// Write `exec error: <description>` to fd 2 from static pieces only.
///
/// The text matches the `Display` of [`ShellError::Exec`]. Write errors are ignored:
/// the child is about to exit and has nowhere else to report them.
fn report_exec_failure(errno: Errno) {
    let stderr = std::io::stderr();
    for part in [EXEC_TAG, errno.desc(), "\n"] {
        let _ = unistd::write(&stderr, part.as_bytes());
    }
}

fn wait_for(child: Pid) -> Result<ExitStatus, ShellError> {
    let status = waitpid(child, None).map_err(ShellError::Wait)?;
    Ok(ExitStatus::from(status))
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Normal termination with the given code.
    Exited(i32),
    /// Killed by a signal.
    Signaled { signal: Signal, core_dumped: bool },
    /// Any status `waitpid` reports that is neither of the above.
    Other,
}

impl ExitStatus {
    /// Shell-style exit code: the exit code itself, or `128 + signal`.
    pub fn code(self) -> ExitCode {
        match self {
            ExitStatus::Exited(code) => code,
            ExitStatus::Signaled { signal, .. } => 128 + signal as i32,
            ExitStatus::Other => -1,
        }
    }

    pub fn success(self) -> bool {
        self == ExitStatus::Exited(0)
    }
}

impl From<WaitStatus> for ExitStatus {
    fn from(status: WaitStatus) -> Self {
        match status {
            WaitStatus::Exited(_, code) => ExitStatus::Exited(code),
            WaitStatus::Signaled(_, signal, core_dumped) => ExitStatus::Signaled {
                signal,
                core_dumped,
            },
            _ => ExitStatus::Other,
        }
    }
}
