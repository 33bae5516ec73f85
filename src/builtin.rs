use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::interpreter::Factory;
use crate::lexer::ArgumentVector;
use anyhow::Result;
use std::io::Write;

/// Message printed by `exit` right before the session ends.
pub const EXIT_FAREWELL: &str = "Exiting simple_shell.";

/// Fixed usage text printed by `help`.
pub const HELP_TEXT: &str = "\
--- Simple Shell Help ---
Available built-in commands:
  help   : Display this help message.
  exit   : Terminate the shell.

Other commands are executed via the system's PATH.
Examples:
  ls -l
  echo Hello World
-------------------------
";

/// Built-in commands known to the shell at compile time.
///
/// Builtins are dispatched on the command name alone and executed directly in-process
/// without spawning a child process. Whatever follows the name is ignored.
pub(crate) trait BuiltinCommand: Sized + Default {
    /// Canonical name of the command, e.g. "help" or "exit".
    fn name() -> &'static str;

    /// Executes the command, writing any output to `stdout`.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        match T::execute(*self, stdout, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(stdout, "{}: {}", T::name(), e)?;
                Ok(1)
            }
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(&self, argv: &ArgumentVector<'_>) -> Option<Box<dyn ExecutableCommand>> {
        if argv.command()? != T::name() {
            return None;
        }
        if !argv.args().is_empty() {
            tracing::trace!(command = T::name(), ignored = argv.args().len(), "arguments ignored");
        }
        Some(Box::new(T::default()))
    }
}

/// Terminate the shell. The session always ends with status 0.
#[derive(Debug, Default)]
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        writeln!(stdout, "{EXIT_FAREWELL}")?;
        env.should_exit = true;
        Ok(0)
    }
}

/// Display the list of built-in commands.
#[derive(Debug, Default)]
pub struct Help;

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn execute(self, stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        stdout.write_all(HELP_TEXT.as_bytes())?;
        Ok(0)
    }
}
