//! Sources of command lines.
//!
//! A [`LineSource`] prints the prompt and hands back one line per call. Two are
//! provided: [`StreamReader`] for pipes, files and tests, and [`EditorReader`] which
//! wraps `rustyline` when a human sits at a terminal.

use crate::error::ShellError;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::ffi::OsString;
use std::io::{BufRead, Read, Write};
use std::os::unix::ffi::OsStringExt;

/// Anything the interpreter can pull command lines from.
pub trait LineSource {
    /// Show `prompt`, then read one line of at most `capacity - 1` bytes.
    ///
    /// The trailing newline, if any, is stripped; nothing else is, and the bytes are
    /// not required to be UTF-8. `Ok(None)` means the input is exhausted and the
    /// session should end.
    fn read_line(&mut self, prompt: &str, capacity: usize) -> Result<Option<OsString>, ShellError>;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn read_line(&mut self, prompt: &str, capacity: usize) -> Result<Option<OsString>, ShellError> {
        (**self).read_line(prompt, capacity)
    }
}

/// Line source over a buffered byte stream, with the prompt going to `output`.
///
/// Reads are bounded like `fgets`: a line longer than `capacity - 1` bytes is returned
/// in pieces, the remainder staying in the stream for the next call.
pub struct StreamReader<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StreamReader<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> LineSource for StreamReader<R, W> {
    fn read_line(&mut self, prompt: &str, capacity: usize) -> Result<Option<OsString>, ShellError> {
        self.output
            .write_all(prompt.as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(ShellError::Prompt)?;

        let limit = capacity.saturating_sub(1) as u64;
        let mut buf = Vec::with_capacity(capacity);
        let read = (&mut self.input)
            .take(limit)
            .read_until(b'\n', &mut buf)
            .map_err(ShellError::Input)?;
        if read == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        tracing::trace!(bytes = read, line = %String::from_utf8_lossy(&buf), "read command line");
        Ok(Some(OsString::from_vec(buf)))
    }
}

/// Interactive line source backed by a `rustyline` editor.
///
/// No history is recorded. Ctrl-D and Ctrl-C at the prompt both end the session.
pub struct EditorReader {
    editor: DefaultEditor,
}

impl EditorReader {
    pub fn new() -> Result<Self, ShellError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorReader {
    fn read_line(&mut self, prompt: &str, capacity: usize) -> Result<Option<OsString>, ShellError> {
        match self.editor.readline(prompt) {
            Ok(mut line) => {
                truncate_to_boundary(&mut line, capacity.saturating_sub(1));
                tracing::trace!(line = %line, "read command line");
                Ok(Some(OsString::from(line)))
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
            Err(err) => Err(ShellError::Editor(err)),
        }
    }
}

/// Cut `line` to at most `max` bytes without splitting a character.
///
/// The editor owns the whole line, so unlike [`StreamReader`] the excess is discarded.
fn truncate_to_boundary(line: &mut String, max: usize) {
    if line.len() <= max {
        return;
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    line.truncate(end);
}
