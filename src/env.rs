use crate::command::ExitCode;

/// State carried by the read-execute loop from one command to the next.
///
/// Nothing here is process-wide: the loop owns one `Environment` and hands it to each
/// command it runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Set by the `exit` built-in; the loop stops before the next prompt.
    pub should_exit: bool,
    /// Exit code of the most recent command, if any has run.
    ///
    /// Kept for inspection and logging only. It never changes the shell's own exit code.
    pub last_status: Option<ExitCode>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_status(&mut self, code: ExitCode) {
        self.last_status = Some(code);
    }
}
