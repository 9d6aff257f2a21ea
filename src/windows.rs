use std::ffi::{OsStr, OsString};
use std::io;
use std::num::NonZeroUsize;
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::ptr;

use windows_sys::Win32::Foundation::{
    GetLastError, LocalFree, SetLastError, ERROR_ENVVAR_NOT_FOUND, ERROR_INSUFFICIENT_BUFFER,
    HMODULE, NO_ERROR,
};
use windows_sys::Win32::Globalization::{MultiByteToWideChar, WideCharToMultiByte, CP_THREAD_ACP};
use windows_sys::Win32::System::Diagnostics::Debug::OutputDebugStringW;
use windows_sys::Win32::System::Environment::{GetCommandLineW, GetEnvironmentVariableW};
use windows_sys::Win32::System::LibraryLoader::{
    GetModuleFileNameW, GetModuleHandleExW, GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS,
    GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
};
use windows_sys::Win32::UI::Shell::CommandLineToArgvW;

use crate::retrieve::{SizedQuery, TruncatingQuery};
use crate::{narrow, DebugOutput, Error, Result};

// The inline capacity of a UTF-16 small string; values of 6, 7 and 8 units
// land either side of it.
const ENVIRONMENT_INITIAL: usize = 7;
// MAX_PATH
const MODULE_PATH_STEP: usize = 260;
const DEBUG_SINK_CAPACITY: usize = 4096;

pub(crate) type Unit = u16;

pub(crate) fn os_string_from_units(units: Vec<Unit>) -> OsString {
    OsString::from_wide(&units)
}

fn to_wide_nul(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

// GetLastError hands out a DWORD; std stores the same bits in an i32.
#[track_caller]
fn last_error() -> Error {
    Error::platform(unsafe { GetLastError() } as i32)
}

/// `GetEnvironmentVariableW` for one name.
pub(crate) struct EnvQuery {
    name: Vec<u16>,
}

impl EnvQuery {
    pub(crate) fn new(name: &OsStr) -> Result<Self> {
        Ok(Self {
            name: to_wide_nul(name),
        })
    }
}

impl SizedQuery for EnvQuery {
    type Unit = Unit;

    fn query(&mut self, buf: &mut [u16]) -> Result<usize> {
        let size: u32 = narrow(buf.len())?;
        let out = if buf.is_empty() {
            ptr::null_mut()
        } else {
            buf.as_mut_ptr()
        };

        // An empty value also returns 0, so the error slot must start clean.
        let n = unsafe {
            SetLastError(NO_ERROR);
            GetEnvironmentVariableW(self.name.as_ptr(), out, size)
        };

        if n == 0 {
            return match unsafe { GetLastError() } {
                NO_ERROR | ERROR_ENVVAR_NOT_FOUND => Ok(0),
                _ => Err(last_error()),
            };
        }

        narrow(n)
    }
}

/// `GetModuleFileNameW` for the module containing this crate, which need not
/// be the executable.
pub(crate) struct ModuleQuery {
    module: HMODULE,
}

impl ModuleQuery {
    pub(crate) fn current() -> Result<Self> {
        let mut module: HMODULE = ptr::null_mut();
        let anchor = Self::current as *const () as *const u16;

        let found = unsafe {
            GetModuleHandleExW(
                GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS | GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
                anchor,
                &mut module,
            )
        };

        if found == 0 {
            return Err(last_error());
        }

        Ok(Self { module })
    }
}

impl TruncatingQuery for ModuleQuery {
    type Unit = Unit;

    fn query(&mut self, buf: &mut [u16]) -> Result<usize> {
        let size: u32 = narrow(buf.len())?;
        let n = unsafe { GetModuleFileNameW(self.module, buf.as_mut_ptr(), size) };

        if n == 0 {
            return Err(last_error());
        }

        if n == size {
            // Truncated: the count is the buffer size, not the size needed, and
            // the call leaves ERROR_INSUFFICIENT_BUFFER behind.
            debug_assert_eq!(unsafe { GetLastError() }, ERROR_INSUFFICIENT_BUFFER);
            unsafe { SetLastError(NO_ERROR) };
        }

        narrow(n)
    }
}

/// Sends debug output to an attached debugger with `OutputDebugStringW`.
#[derive(Debug, Default)]
pub struct SystemDebugger {
    wide: Vec<u16>,
}

impl DebugOutput for SystemDebugger {
    fn output(&mut self, text: &str) -> io::Result<()> {
        self.wide.clear();
        self.wide.extend(text.encode_utf16());
        self.wide.push(0);

        unsafe { OutputDebugStringW(self.wide.as_ptr()) };
        Ok(())
    }
}

pub(crate) fn current_command_line() -> Result<Vec<OsString>> {
    let line = unsafe { GetCommandLineW() };
    unsafe { split_command_line(line) }
}

pub(crate) fn parse_command_line(line: &OsStr) -> Result<Vec<OsString>> {
    let line = to_wide_nul(line);
    unsafe { split_command_line(line.as_ptr()) }
}

/// # Safety
///
/// `line` must point to a NUL-terminated UTF-16 string.
unsafe fn split_command_line(line: *const u16) -> Result<Vec<OsString>> {
    let mut count = 0i32;
    let argv = CommandLineToArgvW(line, &mut count);

    if argv.is_null() {
        return Err(last_error());
    }

    let count: Result<usize> = narrow(count);
    let args = count.map(|count| {
        (0..count)
            .map(|i| {
                let arg = *argv.add(i);
                let len = (0..).take_while(|&j| *arg.add(j) != 0).count();
                OsString::from_wide(std::slice::from_raw_parts(arg, len))
            })
            .collect()
    });

    LocalFree(argv.cast());
    args
}

pub(crate) fn to_wide(text: &[u8]) -> Result<Vec<u16>> {
    let len: i32 = narrow(text.len())?;

    let cch = unsafe { MultiByteToWideChar(CP_THREAD_ACP, 0, text.as_ptr(), len, ptr::null_mut(), 0) };
    if cch <= 0 {
        return Err(last_error());
    }

    let mut wide = vec![0u16; narrow(cch)?];
    let written = unsafe { MultiByteToWideChar(CP_THREAD_ACP, 0, text.as_ptr(), len, wide.as_mut_ptr(), cch) };
    if written <= 0 {
        return Err(last_error());
    }

    wide.truncate(narrow(written)?);
    Ok(wide)
}

pub(crate) fn to_multibyte(text: &[u16]) -> Result<Vec<u8>> {
    let len: i32 = narrow(text.len())?;

    let cb = unsafe {
        WideCharToMultiByte(
            CP_THREAD_ACP,
            0,
            text.as_ptr(),
            len,
            ptr::null_mut(),
            0,
            ptr::null(),
            ptr::null_mut(),
        )
    };
    if cb <= 0 {
        return Err(last_error());
    }

    let mut bytes = vec![0u8; narrow(cb)?];
    let written = unsafe {
        WideCharToMultiByte(
            CP_THREAD_ACP,
            0,
            text.as_ptr(),
            len,
            bytes.as_mut_ptr(),
            cb,
            ptr::null(),
            ptr::null_mut(),
        )
    };
    if written <= 0 {
        return Err(last_error());
    }

    bytes.truncate(narrow(written)?);
    Ok(bytes)
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
