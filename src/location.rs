use std::fmt;
use std::panic::Location;

/// A source location captured at the call site, rendered as `file(line):`.
///
/// Any function marked `#[track_caller]` that constructs a `Here` records its
/// own caller instead, so errors point at the check that failed rather than at
/// this crate's internals.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Here(&'static Location<'static>);

impl Here {
    #[track_caller]
    pub fn new() -> Self {
        Here(Location::caller())
    }

    pub fn file(&self) -> &'static str {
        self.0.file()
    }

    pub fn line(&self) -> u32 {
        self.0.line()
    }
}

impl Default for Here {
    #[track_caller]
    fn default() -> Self {
        Here::new()
    }
}

impl fmt::Display for Here {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({}):", self.file(), self.line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn forwarded() -> Here {
        Here::new()
    }

    #[test]
    fn renders_file_and_line() {
        let here = Here::new();
        assert_eq!(here.to_string(), format!("{}({}):", file!(), line!() - 1));
    }

    #[test]
    fn track_caller_reports_the_outer_site() {
        let line = line!() + 1;
        let here = forwarded();
        assert_eq!(here.line(), line);
    }
}
