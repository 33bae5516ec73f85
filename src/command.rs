use crate::env::Environment;
use crate::lexer::ArgumentVector;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Children killed by a signal are reported as `128 + signal`, like POSIX shells do.
pub type ExitCode = i32;

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Run the command to completion.
    ///
    /// Built-ins write their output to `stdout`. External programs inherit the real
    /// standard streams; `stdout` is only flushed before they start.
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

/// Factory that tries to create a command from an argument vector.
///
/// Returns `None` when the factory doesn't recognize the command name.
pub trait CommandFactory {
    fn try_create(&self, argv: &ArgumentVector<'_>) -> Option<Box<dyn ExecutableCommand>>;
}
