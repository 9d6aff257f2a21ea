//! The file path of the module this crate is linked into.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::{imp, retrieve, BufferSizes, Result};

/// Resolve the module's absolute path, starting with a buffer of `step`
/// units and growing by `step` each time the path does not fit.
///
/// The result does not depend on `step`; a small one only costs extra calls.
pub fn file_path(step: NonZeroUsize) -> Result<PathBuf> {
    let mut query = imp::ModuleQuery::current()?;
    let units = retrieve::grow_by_step(&mut query, step)?;
    Ok(imp::os_string_from_units(units).into())
}

/// [`file_path`] with the platform's default step.
pub fn current_file_path() -> Result<PathBuf> {
    file_path(BufferSizes::default().module_path)
}
