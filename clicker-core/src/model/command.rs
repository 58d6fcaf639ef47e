use std::collections::BTreeSet;
use std::fmt;

pub const SIGNAL_NEXT: &str = "signal-1";
pub const SIGNAL_PREVIOUS: &str = "signal-2";

/// Discrete remote-control command produced by the input classifiers.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Command {
    /// `signal-1`: advance.
    Next,
    /// `signal-2`: go back.
    Previous,
}

impl Command {
    pub fn signal_name(self) -> &'static str {
        match self {
            Command::Next => SIGNAL_NEXT,
            Command::Previous => SIGNAL_PREVIOUS,
        }
    }

    pub fn from_signal_name(name: &str) -> Option<Self> {
        match name {
            SIGNAL_NEXT => Some(Command::Next),
            SIGNAL_PREVIOUS => Some(Command::Previous),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signal_name())
    }
}

/// Set of signal names the relay agrees to forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    names: BTreeSet<String>,
}

impl Vocabulary {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new([SIGNAL_NEXT, SIGNAL_PREVIOUS])
    }
}
