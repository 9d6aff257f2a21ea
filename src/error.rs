use std::io;

use thiserror::Error;

use crate::location::Here;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// A numeric value could not be represented in the requested type.
    ///
    /// Nothing was truncated or wrapped; the caller may recover.
    #[error("{location} value out of range for the target type")]
    Overflow { location: Here },
    /// A platform call failed with something other than the expected
    /// "buffer too small" signal.
    ///
    /// `code` is the raw OS error code (`GetLastError` on Windows, `errno`
    /// elsewhere). These are never retried.
    #[error("{location} platform call failed: {}", describe(.code))]
    Platform { code: i32, location: Here },
}

impl Error {
    #[track_caller]
    pub fn overflow() -> Self {
        Error::Overflow {
            location: Here::new(),
        }
    }

    #[track_caller]
    pub fn platform(code: i32) -> Self {
        let location = Here::new();
        tracing::debug!(code, %location, "platform call failed");
        Error::Platform { code, location }
    }

    /// Capture the calling thread's last OS error.
    #[track_caller]
    pub fn last_os_error() -> Self {
        Self::platform(io::Error::last_os_error().raw_os_error().unwrap_or_default())
    }

    /// The raw OS error code, if this is a platform failure.
    pub fn code(&self) -> Option<i32> {
        match *self {
            Error::Platform { code, .. } => Some(code),
            Error::Overflow { .. } => None,
        }
    }

    /// Where the failing check was made.
    pub fn location(&self) -> Here {
        match *self {
            Error::Overflow { location } | Error::Platform { location, .. } => location,
        }
    }
}

fn describe(code: &i32) -> io::Error {
    io::Error::from_raw_os_error(*code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_message_names_the_call_site() {
        let line = line!() + 1;
        let err = Error::overflow();

        assert_eq!(err.location().line(), line);
        assert!(err.location().file().ends_with("error.rs"));
        assert_eq!(
            err.to_string(),
            format!("{}({}): value out of range for the target type", file!(), line)
        );
        assert_eq!(err.code(), None);
    }

    #[test]
    fn platform_error_keeps_its_code() {
        let err = Error::platform(2);

        assert_eq!(err.code(), Some(2));
        assert!(err.to_string().contains("platform call failed"));
        assert_ne!(err, Error::platform(3));
    }
}
