//! Splitting a command line into an argument vector.
//!
//! The rules are deliberately tiny: tokens are separated by runs of the space
//! character and nothing else. Tabs, quotes, backslashes and `$` are ordinary
//! characters. There is no escaping and no substitution.
//!
//! Lines are bytes, not text: a token is an [`OsStr`] slice of the line, so bytes that
//! are not valid UTF-8 reach the launched program unchanged.

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

/// Bounded, ordered list of tokens borrowed from a command line.
///
/// The vector holds at most `max_tokens - 1` tokens; the last slot is reserved for the
/// absence marker, which is modelled as `None` from [`ArgumentVector::get`]. Tokens are
/// never empty. Because every token is a view into the line it came from, the vector
/// cannot outlive that line, and a fresh one has to be built for each new line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentVector<'a> {
    tokens: Vec<&'a OsStr>,
    dropped: usize,
}

impl<'a> ArgumentVector<'a> {
    /// Token at `index`, or `None` once the end of the vector is reached.
    pub fn get(&self, index: usize) -> Option<&'a OsStr> {
        self.tokens.get(index).copied()
    }

    /// The command name (slot 0), or `None` for an empty line.
    pub fn command(&self) -> Option<&'a OsStr> {
        self.get(0)
    }

    /// Every token after the command name.
    pub fn args(&self) -> &[&'a OsStr] {
        self.tokens.get(1..).unwrap_or_default()
    }

    /// Every token, command name included.
    pub fn as_slice(&self) -> &[&'a OsStr] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a OsStr> + '_ {
        self.tokens.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens the bound discarded.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Split `line` on runs of spaces into at most `max_tokens - 1` tokens.
///
/// Tokens past the bound are discarded without an error; [`ArgumentVector::dropped`]
/// tells how many. An empty line, or one made only of spaces, gives an empty vector.
pub fn split_into_tokens<S>(line: &S, max_tokens: usize) -> ArgumentVector<'_>
where
    S: AsRef<OsStr> + ?Sized,
{
    let limit = max_tokens.saturating_sub(1);
    let mut words = line
        .as_ref()
        .as_bytes()
        .split(|&byte| byte == b' ')
        .filter(|word| !word.is_empty())
        .map(OsStr::from_bytes);
    let tokens: Vec<&OsStr> = words.by_ref().take(limit).collect();
    let dropped = words.count();
    ArgumentVector { tokens, dropped }
}
