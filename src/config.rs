//! Static knobs of the shell.
//!
//! There are no configuration files and no command-line flags: the binary always runs
//! with [`ShellConfig::default`]. Tests and embedders can build other values.

use anyhow::{Result, bail};

/// Prompt written before every read.
pub const DEFAULT_PROMPT: &str = "simple_shell> ";
/// Capacity of the line buffer in bytes, one of which is reserved like a C terminator.
pub const DEFAULT_LINE_CAPACITY: usize = 256;
/// Capacity of the argument vector, one slot of which is reserved for the absence marker.
pub const DEFAULT_MAX_ARGS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Text written (and flushed) before each line is read.
    pub prompt: String,
    /// A single read consumes at most `line_capacity - 1` bytes.
    pub line_capacity: usize,
    /// A command line keeps at most `max_args - 1` tokens.
    pub max_args: usize,
}

impl ShellConfig {
    /// Reject bounds that could never hold a command.
    pub fn validate(&self) -> Result<()> {
        if self.line_capacity < 2 {
            bail!("line capacity must be at least 2, got {}", self.line_capacity);
        }
        if self.max_args < 2 {
            bail!("argument bound must be at least 2, got {}", self.max_args);
        }
        Ok(())
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            line_capacity: DEFAULT_LINE_CAPACITY,
            max_args: DEFAULT_MAX_ARGS,
        }
    }
}
