use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::os::unix::ffi::{OsStrExt, OsStringExt};

use crate::retrieve::{SizedQuery, TruncatingQuery};
use crate::{DebugOutput, Error, Result};

// No platform ties these to anything; they match the Windows defaults where
// that makes sense so the same tests straddle the same boundaries.
const ENVIRONMENT_INITIAL: usize = 7;
const MODULE_PATH_STEP: usize = 256;
const DEBUG_SINK_CAPACITY: usize = 4096;

pub(crate) type Unit = u8;

pub(crate) fn os_string_from_units(units: Vec<Unit>) -> OsString {
    OsString::from_vec(units)
}

/// Environment lookup with the same contract as `GetEnvironmentVariable`.
pub(crate) struct EnvQuery {
    name: OsString,
}

impl EnvQuery {
    pub(crate) fn new(name: &OsStr) -> Result<Self> {
        Ok(Self {
            name: name.to_owned(),
        })
    }
}

impl SizedQuery for EnvQuery {
    type Unit = Unit;

    fn query(&mut self, buf: &mut [u8]) -> Result<usize> {
        let value = match std::env::var_os(&self.name) {
            Some(value) => value,
            None => return Ok(0),
        };
        let value = value.as_bytes();

        if value.len() < buf.len() {
            buf[..value.len()].copy_from_slice(value);
            buf[value.len()] = 0;
            Ok(value.len())
        } else {
            // {value}\0
            Ok(value.len() + 1)
        }
    }
}

/// The running executable's path, read the way `readlink` hands it out.
pub(crate) struct ModuleQuery(());

impl ModuleQuery {
    pub(crate) fn current() -> Result<Self> {
        Ok(ModuleQuery(()))
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl TruncatingQuery for ModuleQuery {
    type Unit = Unit;

    fn query(&mut self, buf: &mut [u8]) -> Result<usize> {
        const SELF_EXE: &[u8] = b"/proc/self/exe\0";

        let written = unsafe {
            libc::readlink(
                SELF_EXE.as_ptr().cast::<libc::c_char>(),
                buf.as_mut_ptr().cast::<libc::c_char>(),
                buf.len(),
            )
        };

        if written < 0 {
            return Err(Error::last_os_error());
        }

        crate::narrow(written)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
impl TruncatingQuery for ModuleQuery {
    type Unit = Unit;

    fn query(&mut self, buf: &mut [u8]) -> Result<usize> {
        let exe = std::env::current_exe()
            .map_err(|e| Error::platform(e.raw_os_error().unwrap_or_default()))?;
        let exe = exe.as_os_str().as_bytes();

        let n = exe.len().min(buf.len());
        buf[..n].copy_from_slice(&exe[..n]);
        Ok(n)
    }
}

/// Writes debug output to standard error.
#[derive(Debug, Default)]
pub struct SystemDebugger(());

impl DebugOutput for SystemDebugger {
    fn output(&mut self, text: &str) -> io::Result<()> {
        io::stderr().lock().write_all(text.as_bytes())
    }
}

pub(crate) fn current_command_line() -> Result<Vec<OsString>> {
    Ok(std::env::args_os().collect())
}

pub(crate) fn parse_command_line(line: &OsStr) -> Result<Vec<OsString>> {
    // An empty line names the running program, as CommandLineToArgvW does.
    if line.is_empty() {
        return Ok(vec![crate::module::current_file_path()?.into_os_string()]);
    }

    Ok(split_command_line(line.as_bytes())
        .into_iter()
        .map(OsString::from_vec)
        .collect())
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

// Splits a line with CommandLineToArgvW's rules. The program name is taken
// verbatim up to whitespace, or between quotes if it starts with one; the
// remaining arguments follow the backslash/quote rules.
fn split_command_line(line: &[u8]) -> Vec<Vec<u8>> {
    let mut args = Vec::new();

    let rest = if let Some((&b'"', tail)) = line.split_first() {
        let end = tail.iter().position(|&b| b == b'"').unwrap_or(tail.len());
        args.push(tail[..end].to_vec());
        tail.get(end + 1..).unwrap_or_default()
    } else {
        let end = line.iter().position(|&b| is_blank(b)).unwrap_or(line.len());
        args.push(line[..end].to_vec());
        &line[end..]
    };

    let mut current: Option<Vec<u8>> = None;
    let mut quoted = false;
    let mut i = 0;

    while i < rest.len() {
        match rest[i] {
            b if is_blank(b) && !quoted => {
                args.extend(current.take());
                i += 1;
            }
            b'\\' => {
                let run = rest[i..].iter().take_while(|&&b| b == b'\\').count();
                let arg = current.get_or_insert_with(Vec::new);

                if rest.get(i + run) == Some(&b'"') {
                    arg.extend(std::iter::repeat(b'\\').take(run / 2));
                    if run % 2 == 1 {
                        arg.push(b'"');
                        i += run + 1;
                    } else {
                        // the quote is a delimiter, handled next time round
                        i += run;
                    }
                } else {
                    arg.extend(std::iter::repeat(b'\\').take(run));
                    i += run;
                }
            }
            b'"' => {
                let arg = current.get_or_insert_with(Vec::new);

                if quoted && rest.get(i + 1) == Some(&b'"') {
                    arg.push(b'"');
                    i += 2;
                } else {
                    quoted = !quoted;
                    i += 1;
                }
            }
            b => {
                current.get_or_insert_with(Vec::new).push(b);
                i += 1;
            }
        }
    }

    args.extend(current);
    args
}

pub(crate) fn to_wide(text: &[u8]) -> Result<Vec<u16>> {
    Ok(String::from_utf8_lossy(text).encode_utf16().collect())
}

pub(crate) fn to_multibyte(text: &[u16]) -> Result<Vec<u8>> {
    Ok(String::from_utf16_lossy(text).into_bytes())
}

impl Default for crate::BufferSizes {
    fn default() -> Self {
        Self {
            environment: ENVIRONMENT_INITIAL,
            module_path: NonZeroUsize::new(MODULE_PATH_STEP).unwrap(),
            debug_sink: NonZeroUsize::new(DEBUG_SINK_CAPACITY).unwrap(),
        }
    }
}
