use std::ffi::{OsStr, OsString};
use std::slice;

use crate::{imp, Result};

/// A command line split into arguments the way `CommandLineToArgvW` does it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CommandLine {
    args: Vec<OsString>,
}

impl CommandLine {
    /// The arguments this process was started with, program name first.
    pub fn current() -> Result<Self> {
        Ok(Self {
            args: imp::current_command_line()?,
        })
    }

    /// Split `line`.
    ///
    /// The first token is always taken as the program name, so `"/help"` yields
    /// the single argument `/help`. An empty line yields one argument, the
    /// path of the running executable.
    pub fn parse<S: AsRef<OsStr>>(line: S) -> Result<Self> {
        Ok(Self {
            args: imp::parse_command_line(line.as_ref())?,
        })
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, OsString> {
        self.args.iter()
    }

    pub fn get(&self, index: usize) -> Option<&OsStr> {
        self.args.get(index).map(OsString::as_os_str)
    }
}

impl<'a> IntoIterator for &'a CommandLine {
    type Item = &'a OsString;
    type IntoIter = slice::Iter<'a, OsString>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<CommandLine> for Vec<OsString> {
    fn from(line: CommandLine) -> Vec<OsString> {
        line.args
    }
}
