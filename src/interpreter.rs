use crate::command::{CommandFactory, ExitCode};
use crate::config::ShellConfig;
use crate::env::Environment;
use crate::lexer::{ArgumentVector, split_into_tokens};
use crate::reader::LineSource;
use anyhow::Result;
use std::io::Write;

/// Message printed when the input runs out.
pub const EOF_FAREWELL: &str = "Exiting shell...";

/// Factory allows creating instances of ExecutableCommand.
///
/// Implemented for the built-ins and for [`ExternalCommand`](crate::external::ExternalCommand).
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal interactive command interpreter.
///
/// The interpreter owns the loop state ([`Environment`]) and an ordered list of
/// [`CommandFactory`] objects. The first factory that recognizes a command name wins,
/// so built-ins must come before the external launcher. See [`Default`] for the
/// factories included out of the box.
///
/// Example
/// ```
/// use simple_shell::{Interpreter, split_into_tokens};
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// sh.execute(&split_into_tokens("help", 10), &mut out).unwrap();
/// assert!(String::from_utf8(out).unwrap().contains("exit"));
/// ```
pub struct Interpreter {
    config: ShellConfig,
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom configuration and set of command factories.
    pub fn new(config: ShellConfig, commands: Vec<Box<dyn CommandFactory>>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            env: Environment::new(),
            commands,
        })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// True once the `exit` built-in has run.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Exit code of the last command that ran, if any.
    pub fn last_status(&self) -> Option<ExitCode> {
        self.env.last_status
    }

    /// Run one tokenized command line to completion.
    ///
    /// An empty vector is a no-op. Built-in output goes to `stdout`; an external
    /// program runs with the real standard streams and this call blocks until it has
    /// terminated. Spawn and wait failures are returned, never retried.
    pub fn execute(&mut self, argv: &ArgumentVector<'_>, stdout: &mut dyn Write) -> Result<()> {
        let Some(name) = argv.command() else {
            return Ok(());
        };
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(argv) {
                let code = cmd.execute(stdout, &mut self.env)?;
                self.env.record_status(code);
                tracing::debug!(command = ?name, code, "command finished");
                return Ok(());
            }
        }
        Err(anyhow::anyhow!("command not found: {}", name.to_string_lossy()))
    }

    /// Read, tokenize and execute lines until input ends or `exit` runs.
    ///
    /// Command errors are written to `stderr` and the loop goes on. A read failure is
    /// written to `stderr` and ends the loop, like end-of-input does. Only failures to
    /// write to `stdout`/`stderr` themselves are returned.
    pub fn repl<S: LineSource + ?Sized>(
        &mut self,
        source: &mut S,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<()> {
        while !self.env.should_exit {
            let line = match source.read_line(&self.config.prompt, self.config.line_capacity) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    writeln!(stdout, "\n{EOF_FAREWELL}")?;
                    break;
                }
                Err(err) => {
                    tracing::debug!(error = %err, "input failed, leaving the loop");
                    writeln!(stderr, "{err}")?;
                    break;
                }
            };

            let argv = split_into_tokens(&line, self.config.max_args);
            if argv.dropped() > 0 {
                tracing::debug!(dropped = argv.dropped(), "argument bound reached");
            }
            if let Err(err) = self.execute(&argv, stdout) {
                writeln!(stderr, "{err}")?;
            }
        }
        stdout.flush()?;
        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default configuration and commands:
    /// - built-ins: `exit`, `help`
    /// - external command launcher
    fn default() -> Self {
        use crate::builtin::*;
        use crate::external::ExternalCommand;
        Self {
            config: ShellConfig::default(),
            env: Environment::new(),
            commands: vec![
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<Help>::default()),
                Box::new(Factory::<ExternalCommand>::default()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{HELP_TEXT, Help};
    use crate::command::ExecutableCommand;
    use crate::error::ShellError;
    use crate::reader::StreamReader;
    use nix::errno::Errno;
    use std::io::{self, BufReader, Cursor, Read};

    /// Recognizes `x` and fails the way a launcher would when the OS refuses.
    struct FailingLauncher {
        error: fn() -> ShellError,
    }

    struct FailingCommand {
        error: fn() -> ShellError,
    }

    impl CommandFactory for FailingLauncher {
        fn try_create(&self, argv: &ArgumentVector<'_>) -> Option<Box<dyn ExecutableCommand>> {
            if argv.command()? != "x" {
                return None;
            }
            Some(Box::new(FailingCommand { error: self.error }))
        }
    }

    impl ExecutableCommand for FailingCommand {
        fn execute(self: Box<Self>, _stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
            Err((self.error)().into())
        }
    }

    fn failing_session(error: fn() -> ShellError) -> (Interpreter, String, String) {
        let mut sh = Interpreter::new(
            ShellConfig::default(),
            vec![
                Box::new(FailingLauncher { error }),
                Box::new(Factory::<Help>::default()),
            ],
        )
        .unwrap();
        let mut source = StreamReader::new(Cursor::new(b"x\nhelp\n".to_vec()), Vec::new());
        let mut out = Vec::new();
        let mut err = Vec::new();
        sh.repl(&mut source, &mut out, &mut err).unwrap();
        (
            sh,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn session(input: &str) -> (Interpreter, String, String) {
        let mut sh = Interpreter::default();
        let mut source = StreamReader::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let mut out = Vec::new();
        let mut err = Vec::new();
        sh.repl(&mut source, &mut out, &mut err).unwrap();
        let (_, prompts) = source.into_inner();
        let mut stdout = String::from_utf8(prompts).unwrap();
        stdout.push_str(&String::from_utf8(out).unwrap());
        (sh, stdout, String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_empty_command_is_a_noop() {
        let mut sh = Interpreter::default();
        let mut out = Vec::new();
        sh.execute(&split_into_tokens("    ", 10), &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(sh.last_status(), None);
        assert!(!sh.should_exit());
    }

    #[test]
    fn test_help_returns_control() {
        let mut sh = Interpreter::default();
        let mut out = Vec::new();
        sh.execute(&split_into_tokens("help", 10), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("help"));
        assert!(text.contains("exit"));
        assert!(!sh.should_exit());
        assert_eq!(sh.last_status(), Some(0));
    }

    #[test]
    fn test_exit_requests_termination() {
        let mut sh = Interpreter::default();
        let mut out = Vec::new();
        sh.execute(&split_into_tokens("exit", 10), &mut out).unwrap();
        assert!(sh.should_exit());
        assert_eq!(out, b"Exiting simple_shell.\n");
    }

    #[test]
    fn test_external_status_is_recorded() {
        let mut sh = Interpreter::default();
        sh.execute(&split_into_tokens("false", 10), &mut Vec::new()).unwrap();
        assert_eq!(sh.last_status(), Some(1));
        sh.execute(&split_into_tokens("true", 10), &mut Vec::new()).unwrap();
        assert_eq!(sh.last_status(), Some(0));
    }

    #[test]
    fn test_missing_program_does_not_stop_the_parent() {
        let mut sh = Interpreter::default();
        sh.execute(&split_into_tokens("nonexistent_binary_xyz", 10), &mut Vec::new())
            .unwrap();
        assert_eq!(sh.last_status(), Some(1));
        assert!(!sh.should_exit());
    }

    #[test]
    fn test_fork_failure_is_reported_and_loop_continues() {
        let (sh, stdout, stderr) = failing_session(|| ShellError::Spawn(Errno::EAGAIN));
        assert_eq!(stderr, format!("fork error: {}\n", Errno::EAGAIN.desc()));
        assert_eq!(stdout, format!("{HELP_TEXT}\n{EOF_FAREWELL}\n"));
        assert_eq!(sh.last_status(), Some(0));
    }

    #[test]
    fn test_wait_failure_is_reported_and_loop_continues() {
        let (sh, stdout, stderr) = failing_session(|| ShellError::Wait(Errno::EINTR));
        assert_eq!(stderr, "wait error: Interrupted system call\n");
        assert!(stdout.starts_with(HELP_TEXT));
        assert!(!sh.should_exit());
    }

    #[test]
    fn test_option_like_arguments_do_not_block_exit() {
        let (sh, stdout, stderr) = session("exit --help\nhelp\n");
        assert!(sh.should_exit());
        assert_eq!(stdout, "simple_shell> Exiting simple_shell.\n");
        assert!(stderr.is_empty());
    }

    #[test]
    fn test_without_launcher_unknown_commands_are_errors() {
        let mut sh = Interpreter::new(
            ShellConfig::default(),
            vec![Box::new(Factory::<Help>::default())],
        )
        .unwrap();
        let err = sh
            .execute(&split_into_tokens("ls", 10), &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "command not found: ls");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ShellConfig {
            max_args: 0,
            ..ShellConfig::default()
        };
        assert!(Interpreter::new(config, Vec::new()).is_err());
    }

    #[test]
    fn test_help_then_exit_session() {
        let (sh, stdout, stderr) = session("help\nexit\n");
        assert_eq!(
            stdout,
            format!("simple_shell> simple_shell> {HELP_TEXT}Exiting simple_shell.\n")
        );
        assert!(stderr.is_empty());
        assert!(sh.should_exit());
    }

    #[test]
    fn test_nothing_runs_after_exit() {
        let (_, stdout, _) = session("exit\nhelp\n");
        assert_eq!(stdout.matches("simple_shell> ").count(), 1);
        assert!(!stdout.contains("Simple Shell Help"));
    }

    #[test]
    fn test_end_of_input_says_goodbye() {
        let (sh, stdout, stderr) = session("\n   \n");
        assert_eq!(
            stdout,
            "simple_shell> simple_shell> simple_shell> \nExiting shell...\n"
        );
        assert!(stderr.is_empty());
        assert_eq!(sh.last_status(), None);
    }

    #[test]
    fn test_read_failure_ends_session_with_message() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("stream broke"))
            }
        }

        let mut source = StreamReader::new(BufReader::new(Broken), Vec::new());
        let mut sh = Interpreter::default();
        let mut out = Vec::new();
        let mut err = Vec::new();
        sh.repl(&mut source, &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(err).unwrap(), "read error: stream broke\n");
        assert!(out.is_empty());
    }

    #[test]
    fn test_custom_bound_truncates_arguments() {
        use crate::builtin::Exit;
        let config = ShellConfig {
            prompt: "$ ".to_string(),
            max_args: 2,
            ..ShellConfig::default()
        };
        let mut sh = Interpreter::new(
            config,
            vec![
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<Help>::default()),
            ],
        )
        .unwrap();
        // With room for a single token `help me` is plain `help`.
        let mut source = StreamReader::new(Cursor::new(b"help me\n".to_vec()), Vec::new());
        let mut out = Vec::new();
        sh.repl(&mut source, &mut out, &mut Vec::new()).unwrap();
        assert_eq!(sh.last_status(), Some(0));
        let (_, prompts) = source.into_inner();
        assert_eq!(prompts, b"$ $ ");
    }
}
