//! A minimal interactive command interpreter.
//!
//! Each turn of the loop reads one line ([`reader`]), splits it on spaces into a
//! bounded argument vector ([`lexer`]) and either runs a built-in (`help`, `exit`) or
//! forks a child that replaces itself with the named program, found through `PATH`.
//! The parent blocks until that child has terminated before prompting again.
//!
//! There are no pipelines, redirections, quoting, variables, background jobs or
//! history. The main entry point is [`Interpreter`].

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod external;
mod interpreter;
pub mod lexer;
pub mod reader;

pub use builtin::{EXIT_FAREWELL, HELP_TEXT};
pub use config::ShellConfig;
pub use error::ShellError;
pub use external::{ExitStatus, ExternalCommand};
pub use interpreter::{EOF_FAREWELL, Interpreter};
pub use lexer::{ArgumentVector, split_into_tokens};
pub use reader::{EditorReader, LineSource, StreamReader};
