//! Environment variable lookup.
//!
//! Both functions return an empty string for an unset variable and never return
//! a value cut short by an undersized buffer. They differ only in how they find
//! the size: [`var`] asks first, [`var_speculative`] guesses and retries.

use std::ffi::{OsStr, OsString};

use crate::{imp, retrieve, Result};

/// Look up `name`, probing for the value's size before reading it.
pub fn var<K: AsRef<OsStr>>(name: K) -> Result<OsString> {
    let mut query = imp::EnvQuery::new(name.as_ref())?;
    retrieve::probe_then_fill(&mut query).map(imp::os_string_from_units)
}

/// Look up `name` with an initial buffer of `initial` units, growing it if
/// the value turns out to be longer.
///
/// [`BufferSizes::environment`](crate::BufferSizes::environment) is a
/// reasonable default for `initial`.
pub fn var_speculative<K: AsRef<OsStr>>(name: K, initial: usize) -> Result<OsString> {
    let mut query = imp::EnvQuery::new(name.as_ref())?;
    retrieve::fill_with_retry(&mut query, initial).map(imp::os_string_from_units)
}
